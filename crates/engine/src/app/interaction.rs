use super::surface::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Pointer is down on an object; it becomes active if held past the delay.
    PendingSelect {
        target: ObjectId,
        remaining_seconds: f32,
    },
    Active {
        target: ObjectId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressRejection {
    Locked,
    ObjectActive,
    SelectionPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Armed,
    Rejected(PressRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Released before the select delay elapsed.
    Tap,
    Ignored,
}

/// Press/hold/select state machine for the whole surface. At most one object is active.
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    state: InteractionState,
    select_delay_seconds: f32,
}

impl InteractionMachine {
    pub fn new(select_delay_seconds: f32) -> Self {
        Self {
            state: InteractionState::Idle,
            select_delay_seconds: select_delay_seconds.max(0.0),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn active(&self) -> Option<ObjectId> {
        match self.state {
            InteractionState::Active { target } => Some(target),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<ObjectId> {
        match self.state {
            InteractionState::PendingSelect { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn press(&mut self, target: ObjectId, locked: bool) -> PressOutcome {
        if locked {
            return PressOutcome::Rejected(PressRejection::Locked);
        }
        match self.state {
            InteractionState::Active { .. } => PressOutcome::Rejected(PressRejection::ObjectActive),
            InteractionState::PendingSelect { .. } => {
                PressOutcome::Rejected(PressRejection::SelectionPending)
            }
            InteractionState::Idle => {
                self.state = InteractionState::PendingSelect {
                    target,
                    remaining_seconds: self.select_delay_seconds,
                };
                PressOutcome::Armed
            }
        }
    }

    pub fn release(&mut self, target: ObjectId) -> ReleaseOutcome {
        match self.state {
            InteractionState::PendingSelect { target: pending, .. } if pending == target => {
                self.state = InteractionState::Idle;
                ReleaseOutcome::Tap
            }
            _ => ReleaseOutcome::Ignored,
        }
    }

    /// Runs the select timer. Returns the object that just became active.
    pub fn advance(&mut self, dt_seconds: f32) -> Option<ObjectId> {
        let InteractionState::PendingSelect {
            target,
            remaining_seconds,
        } = self.state
        else {
            return None;
        };
        let remaining_seconds = remaining_seconds - dt_seconds.max(0.0);
        if remaining_seconds <= 0.0 {
            self.state = InteractionState::Active { target };
            return Some(target);
        }
        self.state = InteractionState::PendingSelect {
            target,
            remaining_seconds,
        };
        None
    }

    /// Programmatic selection. Cancels a pending press; refused while another object is active.
    pub fn activate(&mut self, target: ObjectId) -> bool {
        if self.active().is_some() {
            return false;
        }
        self.state = InteractionState::Active { target };
        true
    }

    pub fn deselect(&mut self, target: ObjectId) -> bool {
        if self.active() != Some(target) {
            return false;
        }
        self.state = InteractionState::Idle;
        true
    }

    /// Drops any state referring to `target`, e.g. after it is removed.
    pub fn forget(&mut self, target: ObjectId) {
        if self.active() == Some(target) || self.pending() == Some(target) {
            self.state = InteractionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ObjectId = ObjectId(1);
    const B: ObjectId = ObjectId(2);

    #[test]
    fn hold_past_delay_activates() {
        let mut machine = InteractionMachine::new(1.0);
        assert_eq!(machine.press(A, false), PressOutcome::Armed);
        assert_eq!(machine.advance(0.5), None);
        assert_eq!(machine.advance(0.5), Some(A));
        assert_eq!(machine.active(), Some(A));
        assert_eq!(machine.release(A), ReleaseOutcome::Ignored);
        assert_eq!(machine.active(), Some(A));
    }

    #[test]
    fn quick_release_is_a_tap_and_never_activates() {
        let mut machine = InteractionMachine::new(1.0);
        machine.press(A, false);
        machine.advance(0.9);
        assert_eq!(machine.release(A), ReleaseOutcome::Tap);
        assert_eq!(machine.state(), InteractionState::Idle);
        assert_eq!(machine.advance(5.0), None);
        assert_eq!(machine.active(), None);
    }

    #[test]
    fn locked_objects_cannot_be_pressed() {
        let mut machine = InteractionMachine::new(1.0);
        assert_eq!(
            machine.press(A, true),
            PressOutcome::Rejected(PressRejection::Locked)
        );
        assert_eq!(machine.state(), InteractionState::Idle);
    }

    #[test]
    fn presses_are_rejected_while_pending_or_active() {
        let mut machine = InteractionMachine::new(1.0);
        machine.press(A, false);
        assert_eq!(
            machine.press(B, false),
            PressOutcome::Rejected(PressRejection::SelectionPending)
        );
        machine.advance(1.0);
        assert_eq!(
            machine.press(B, false),
            PressOutcome::Rejected(PressRejection::ObjectActive)
        );
        assert_eq!(machine.active(), Some(A));
    }

    #[test]
    fn activate_refuses_second_object() {
        let mut machine = InteractionMachine::new(1.0);
        assert!(machine.activate(A));
        assert!(!machine.activate(B));
        assert_eq!(machine.active(), Some(A));
    }

    #[test]
    fn activate_cancels_pending_press() {
        let mut machine = InteractionMachine::new(1.0);
        machine.press(A, false);
        assert!(machine.activate(B));
        assert_eq!(machine.release(A), ReleaseOutcome::Ignored);
        assert_eq!(machine.active(), Some(B));
    }

    #[test]
    fn deselect_only_affects_active_target() {
        let mut machine = InteractionMachine::new(1.0);
        machine.activate(A);
        assert!(!machine.deselect(B));
        assert!(machine.deselect(A));
        assert_eq!(machine.state(), InteractionState::Idle);
        assert_eq!(machine.press(B, false), PressOutcome::Armed);
    }

    #[test]
    fn forget_clears_pending_and_active() {
        let mut machine = InteractionMachine::new(1.0);
        machine.press(A, false);
        machine.forget(A);
        assert_eq!(machine.state(), InteractionState::Idle);
        machine.activate(B);
        machine.forget(A);
        assert_eq!(machine.active(), Some(B));
        machine.forget(B);
        assert_eq!(machine.active(), None);
    }

    #[test]
    fn never_more_than_one_active_for_interleaved_events() {
        let mut machine = InteractionMachine::new(0.3);
        let script: &[(u8, ObjectId)] = &[
            (0, A),
            (2, B),
            (1, A),
            (0, B),
            (2, A),
            (2, B),
            (3, A),
            (4, B),
            (0, A),
            (1, A),
            (4, A),
        ];
        for (step, target) in script {
            match step {
                0 => {
                    machine.press(*target, false);
                }
                1 => {
                    machine.release(*target);
                }
                2 => {
                    machine.advance(0.2);
                }
                3 => {
                    machine.activate(*target);
                }
                _ => {
                    machine.deselect(*target);
                }
            }
            let active_count = [A, B]
                .iter()
                .filter(|id| machine.active() == Some(**id))
                .count();
            assert!(active_count <= 1);
        }
    }
}
