use crate::content::ItemKind;

use super::animation::{AnimationPlayer, OffscreenTarget};
use super::assets::DecodedImage;
use super::bounds::DragSample;
use super::geometry::{SurfaceSize, Vec2};
use super::handles::ControlHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Renderable content handed to the surface when an object is created.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPayload {
    Image(DecodedImage),
    Animation {
        target: OffscreenTarget,
        player: AnimationPlayer,
    },
}

impl ObjectPayload {
    /// Unscaled width and height.
    pub fn native_size(&self) -> (f32, f32) {
        match self {
            ObjectPayload::Image(image) => (image.width() as f32, image.height() as f32),
            ObjectPayload::Animation { target, .. } => (target.width as f32, target.height as f32),
        }
    }

    pub fn player(&self) -> Option<&AnimationPlayer> {
        match self {
            ObjectPayload::Animation { player, .. } => Some(player),
            ObjectPayload::Image(_) => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut AnimationPlayer> {
        match self {
            ObjectPayload::Animation { player, .. } => Some(player),
            ObjectPayload::Image(_) => None,
        }
    }
}

/// Identity of the placement an object renders, carried on the object itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTag {
    pub item_id: String,
    pub category_id: String,
    pub stack_index: u32,
    pub kind: ItemKind,
}

/// Visual emphasis applied to the active object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub background: Option<[u8; 4]>,
    pub corner_radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectEventKind {
    Pressed,
    Released,
    Deselected,
}

/// Input the surface reports back to the placement engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Pressed(ObjectId),
    Released(ObjectId),
    Moving {
        object: ObjectId,
        sample: DragSample,
    },
    Scaling {
        object: ObjectId,
        sample: DragSample,
        previous_scale: f32,
    },
    Deselected(ObjectId),
}

impl SurfaceEvent {
    pub fn object(&self) -> ObjectId {
        match *self {
            SurfaceEvent::Pressed(object)
            | SurfaceEvent::Released(object)
            | SurfaceEvent::Deselected(object)
            | SurfaceEvent::Moving { object, .. }
            | SurfaceEvent::Scaling { object, .. } => object,
        }
    }
}

/// Capabilities the placement engine needs from a drawing surface.
///
/// Mutators addressed at an unknown object are no-ops.
pub trait RenderSurface {
    fn size(&self) -> SurfaceSize;
    fn create_object(&mut self, payload: ObjectPayload, tag: ObjectTag) -> ObjectId;
    fn remove_object(&mut self, object: ObjectId) -> bool;
    fn subscribe(&mut self, object: ObjectId, events: &[ObjectEventKind]);
    fn bring_to_front(&mut self, object: ObjectId);
    fn set_active_object(&mut self, object: Option<ObjectId>);
    fn active_object(&self) -> Option<ObjectId>;
    fn set_position(&mut self, object: ObjectId, position: Vec2);
    fn set_scale(&mut self, object: ObjectId, scale: f32);
    fn set_handle_visible(&mut self, object: ObjectId, handle: ControlHandle, visible: bool);
    fn set_locked(&mut self, object: ObjectId, locked: bool);
    fn set_selectable(&mut self, object: ObjectId, selectable: bool);
    fn set_highlight(&mut self, object: ObjectId, highlight: Option<Highlight>);
    /// Starts the object's animation; `false` for static objects or if already playing.
    fn play_animation(&mut self, object: ObjectId) -> bool;
    fn advance_animations(&mut self, dt_seconds: f32);
}
