use serde::Deserialize;

use crate::content::ItemKind;

/// Header of a frame-based vector animation document.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AnimationDescriptor {
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
    #[serde(rename = "fr")]
    pub frame_rate: f32,
    #[serde(rename = "ip")]
    pub in_point: f32,
    #[serde(rename = "op")]
    pub out_point: f32,
}

impl AnimationDescriptor {
    pub fn frame_span(&self) -> f32 {
        (self.out_point - self.in_point).max(0.0)
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.frame_rate.is_finite()
            && self.frame_rate > 0.0
            && self.in_point.is_finite()
            && self.out_point.is_finite()
            && self.out_point >= self.in_point
    }
}

/// Off-surface render target an animation draws into, sized to the animation's native size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffscreenTarget {
    pub width: u32,
    pub height: u32,
}

impl OffscreenTarget {
    pub fn for_descriptor(descriptor: &AnimationDescriptor) -> Self {
        Self {
            width: descriptor.width,
            height: descriptor.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPolicy {
    Loop,
    Once,
}

impl LoopPolicy {
    pub fn for_kind(kind: ItemKind) -> Self {
        if kind.is_fixed() {
            LoopPolicy::Loop
        } else {
            LoopPolicy::Once
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlayer {
    descriptor: AnimationDescriptor,
    policy: LoopPolicy,
    speed: f32,
    frame: f32,
    playing: bool,
    completed_cycles: u32,
}

impl AnimationPlayer {
    /// Starts stopped on the first frame.
    pub fn new(descriptor: AnimationDescriptor, policy: LoopPolicy, speed: f32) -> Self {
        Self {
            descriptor,
            policy,
            speed,
            frame: descriptor.in_point,
            playing: false,
            completed_cycles: 0,
        }
    }

    pub fn descriptor(&self) -> &AnimationDescriptor {
        &self.descriptor
    }

    pub fn policy(&self) -> LoopPolicy {
        self.policy
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn current_frame(&self) -> f32 {
        self.frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn go_to_and_stop(&mut self, frame: f32) {
        let last = self.descriptor.out_point.max(self.descriptor.in_point);
        self.frame = frame.max(self.descriptor.in_point).min(last);
        self.playing = false;
    }

    /// Returns `false` if already playing.
    pub fn play(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        true
    }

    /// Advances playback; returns `true` when a play-once run just finished.
    pub fn advance(&mut self, dt_seconds: f32) -> bool {
        if !self.playing || dt_seconds.is_nan() || dt_seconds <= 0.0 {
            return false;
        }

        let span = self.descriptor.frame_span();
        if span <= 0.0 {
            self.frame = self.descriptor.in_point;
            return self.finish_cycle();
        }

        self.frame += dt_seconds * self.descriptor.frame_rate * self.speed;
        if self.frame < self.descriptor.out_point {
            return false;
        }

        match self.policy {
            LoopPolicy::Loop => {
                let overshoot = (self.frame - self.descriptor.in_point) % span;
                self.frame = self.descriptor.in_point + overshoot;
                self.completed_cycles = self.completed_cycles.saturating_add(1);
                false
            }
            LoopPolicy::Once => self.finish_cycle(),
        }
    }

    fn finish_cycle(&mut self) -> bool {
        self.completed_cycles = self.completed_cycles.saturating_add(1);
        match self.policy {
            LoopPolicy::Loop => false,
            LoopPolicy::Once => {
                self.frame = self.descriptor.in_point;
                self.playing = false;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> AnimationDescriptor {
        AnimationDescriptor {
            width: 300,
            height: 200,
            frame_rate: 30.0,
            in_point: 0.0,
            out_point: 60.0,
        }
    }

    #[test]
    fn descriptor_parses_animation_header_fields() {
        let raw = r#"{"v":"5.7.4","fr":24,"ip":0,"op":48,"w":640,"h":360,"layers":[]}"#;
        let parsed: AnimationDescriptor = serde_json::from_str(raw).expect("descriptor");
        assert_eq!(parsed.width, 640);
        assert_eq!(parsed.height, 360);
        assert_eq!(parsed.frame_rate, 24.0);
        assert_eq!(parsed.frame_span(), 48.0);
        assert!(parsed.is_well_formed());
    }

    #[test]
    fn loop_policy_follows_kind() {
        assert_eq!(LoopPolicy::for_kind(ItemKind::Fixed), LoopPolicy::Loop);
        assert_eq!(LoopPolicy::for_kind(ItemKind::Generic), LoopPolicy::Once);
        assert_eq!(LoopPolicy::for_kind(ItemKind::Reserved), LoopPolicy::Once);
    }

    #[test]
    fn new_player_rests_on_first_frame() {
        let mut player = AnimationPlayer::new(descriptor(), LoopPolicy::Once, 1.0);
        assert!(!player.is_playing());
        assert_eq!(player.current_frame(), 0.0);
        assert!(!player.advance(1.0));
        assert_eq!(player.current_frame(), 0.0);
    }

    #[test]
    fn play_once_stops_on_first_frame_after_completion() {
        let mut player = AnimationPlayer::new(descriptor(), LoopPolicy::Once, 1.0);
        assert!(player.play());
        assert!(!player.play());
        assert!(!player.advance(1.0));
        assert_eq!(player.current_frame(), 30.0);
        assert!(player.advance(1.0));
        assert!(!player.is_playing());
        assert_eq!(player.current_frame(), 0.0);
        assert_eq!(player.completed_cycles(), 1);
    }

    #[test]
    fn loop_wraps_and_keeps_playing() {
        let mut player = AnimationPlayer::new(descriptor(), LoopPolicy::Loop, 1.0);
        player.play();
        assert!(!player.advance(2.5));
        assert!(player.is_playing());
        assert_eq!(player.current_frame(), 15.0);
        assert_eq!(player.completed_cycles(), 1);
    }

    #[test]
    fn speed_scales_frame_advance() {
        let mut player = AnimationPlayer::new(descriptor(), LoopPolicy::Once, 0.5);
        player.play();
        player.advance(1.0);
        assert_eq!(player.current_frame(), 15.0);
    }

    #[test]
    fn go_to_and_stop_clamps_into_range() {
        let mut player = AnimationPlayer::new(descriptor(), LoopPolicy::Loop, 1.0);
        player.play();
        player.go_to_and_stop(500.0);
        assert!(!player.is_playing());
        assert_eq!(player.current_frame(), 60.0);
    }
}
