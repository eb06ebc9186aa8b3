use super::bounds::DragSample;
use super::geometry::{SurfaceSize, Vec2};
use super::handles::{ControlHandle, HandleVisibility};
use super::surface::{
    Highlight, ObjectEventKind, ObjectId, ObjectPayload, ObjectTag, RenderSurface, SurfaceEvent,
};

#[derive(Debug, Clone)]
pub struct SurfaceObject {
    pub id: ObjectId,
    pub tag: ObjectTag,
    pub payload: ObjectPayload,
    pub position: Vec2,
    pub scale: f32,
    pub locked: bool,
    pub selectable: bool,
    pub handles: HandleVisibility,
    pub highlight: Option<Highlight>,
    subscriptions: Vec<ObjectEventKind>,
}

impl SurfaceObject {
    pub fn native_size(&self) -> (f32, f32) {
        self.payload.native_size()
    }

    pub fn scaled_size(&self) -> (f32, f32) {
        let (width, height) = self.native_size();
        (width * self.scale, height * self.scale)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let (width, height) = self.scaled_size();
        point.x >= self.position.x
            && point.x <= self.position.x + width
            && point.y >= self.position.y
            && point.y <= self.position.y + height
    }

    pub fn is_subscribed(&self, event: ObjectEventKind) -> bool {
        self.subscriptions.contains(&event)
    }
}

#[derive(Debug, Default)]
pub struct ObjectIdAllocator {
    next: u64,
}

impl ObjectIdAllocator {
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Headless surface that keeps objects in draw order (back to front).
#[derive(Debug)]
pub struct MemorySurface {
    size: SurfaceSize,
    allocator: ObjectIdAllocator,
    objects: Vec<SurfaceObject>,
    active: Option<ObjectId>,
}

impl MemorySurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            allocator: ObjectIdAllocator::default(),
            objects: Vec::new(),
            active: None,
        }
    }

    pub fn objects(&self) -> &[SurfaceObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn find_object(&self, id: ObjectId) -> Option<&SurfaceObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    fn find_object_mut(&mut self, id: ObjectId) -> Option<&mut SurfaceObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn draw_order(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|object| object.id).collect()
    }

    /// Front-most object under `point` that listens for presses.
    pub fn pick_topmost_at(&self, point: Vec2) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|object| {
                object.is_subscribed(ObjectEventKind::Pressed) && object.contains_point(point)
            })
            .map(|object| object.id)
    }

    pub fn press_at(&self, point: Vec2) -> Option<SurfaceEvent> {
        self.pick_topmost_at(point).map(SurfaceEvent::Pressed)
    }

    pub fn release(&self, object: ObjectId) -> Option<SurfaceEvent> {
        self.find_object(object)
            .filter(|found| found.is_subscribed(ObjectEventKind::Released))
            .map(|found| SurfaceEvent::Released(found.id))
    }

    pub fn drag_sample(&self, object: ObjectId) -> Option<DragSample> {
        let found = self.find_object(object)?;
        let (width, height) = found.native_size();
        Some(DragSample {
            width: Some(width),
            height: Some(height),
            scale_x: Some(found.scale),
            left: Some(found.position.x),
            top: Some(found.position.y),
            surface: Some(self.size),
        })
    }

    /// Moves the active, unlocked object unchecked and reports the move.
    pub fn drag_to(&mut self, object: ObjectId, position: Vec2) -> Option<SurfaceEvent> {
        if self.active != Some(object) {
            return None;
        }
        let found = self.find_object_mut(object)?;
        if found.locked {
            return None;
        }
        found.position = position;
        let sample = self.drag_sample(object)?;
        Some(SurfaceEvent::Moving { object, sample })
    }

    /// Applies a resize-handle scale unchecked and reports it.
    pub fn scale_to(&mut self, object: ObjectId, scale: f32) -> Option<SurfaceEvent> {
        if self.active != Some(object) {
            return None;
        }
        let found = self.find_object_mut(object)?;
        if found.locked || !found.handles.is_visible(ControlHandle::BottomRight) {
            return None;
        }
        let previous_scale = found.scale;
        found.scale = scale;
        let sample = self.drag_sample(object)?;
        Some(SurfaceEvent::Scaling {
            object,
            sample,
            previous_scale,
        })
    }

    /// Clears the active object, as a click on empty surface does.
    pub fn discard_active(&mut self) -> Option<SurfaceEvent> {
        let object = self.active.take()?;
        self.find_object(object)
            .filter(|found| found.is_subscribed(ObjectEventKind::Deselected))
            .map(|found| SurfaceEvent::Deselected(found.id))
    }
}

impl RenderSurface for MemorySurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn create_object(&mut self, payload: ObjectPayload, tag: ObjectTag) -> ObjectId {
        let id = self.allocator.allocate();
        self.objects.push(SurfaceObject {
            id,
            tag,
            payload,
            position: Vec2::default(),
            scale: 1.0,
            locked: false,
            selectable: true,
            handles: HandleVisibility::default(),
            highlight: None,
            subscriptions: Vec::new(),
        });
        id
    }

    fn remove_object(&mut self, object: ObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|found| found.id != object);
        if self.active == Some(object) {
            self.active = None;
        }
        self.objects.len() != before
    }

    fn subscribe(&mut self, object: ObjectId, events: &[ObjectEventKind]) {
        if let Some(found) = self.find_object_mut(object) {
            for event in events {
                if !found.subscriptions.contains(event) {
                    found.subscriptions.push(*event);
                }
            }
        }
    }

    fn bring_to_front(&mut self, object: ObjectId) {
        if let Some(index) = self.objects.iter().position(|found| found.id == object) {
            let found = self.objects.remove(index);
            self.objects.push(found);
        }
    }

    fn set_active_object(&mut self, object: Option<ObjectId>) {
        self.active = object.filter(|id| self.objects.iter().any(|found| found.id == *id));
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    fn set_position(&mut self, object: ObjectId, position: Vec2) {
        if let Some(found) = self.find_object_mut(object) {
            found.position = position;
        }
    }

    fn set_scale(&mut self, object: ObjectId, scale: f32) {
        if let Some(found) = self.find_object_mut(object) {
            found.scale = scale;
        }
    }

    fn set_handle_visible(&mut self, object: ObjectId, handle: ControlHandle, visible: bool) {
        if let Some(found) = self.find_object_mut(object) {
            found.handles.set(handle, visible);
        }
    }

    fn set_locked(&mut self, object: ObjectId, locked: bool) {
        if let Some(found) = self.find_object_mut(object) {
            found.locked = locked;
        }
    }

    fn set_selectable(&mut self, object: ObjectId, selectable: bool) {
        if let Some(found) = self.find_object_mut(object) {
            found.selectable = selectable;
        }
    }

    fn set_highlight(&mut self, object: ObjectId, highlight: Option<Highlight>) {
        if let Some(found) = self.find_object_mut(object) {
            found.highlight = highlight;
        }
    }

    fn play_animation(&mut self, object: ObjectId) -> bool {
        self.find_object_mut(object)
            .and_then(|found| found.payload.player_mut())
            .is_some_and(|player| player.play())
    }

    fn advance_animations(&mut self, dt_seconds: f32) {
        for object in &mut self.objects {
            if let Some(player) = object.payload.player_mut() {
                player.advance(dt_seconds);
            }
        }
    }
}
