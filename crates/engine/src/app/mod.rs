mod adapter;
mod animation;
mod assets;
mod bounds;
mod config;
mod geometry;
mod handles;
mod interaction;
mod memory_surface;
mod occupancy;
mod placement;
mod placer;
mod surface;

pub use animation::{AnimationDescriptor, AnimationPlayer, LoopPolicy, OffscreenTarget};
pub use assets::{AssetLoadError, AssetLoader, DecodedImage, FsAssetLoader, StaticAssetLoader};
pub use bounds::{constrain_move, constrain_scale, DragSample, ScaleLimits};
pub use config::{CategoryRule, PlacementConfig, LARGE_SCENERY_CATEGORY_ID};
pub use geometry::{SurfaceSize, Vec2, DEFAULT_SURFACE};
pub use handles::{ControlHandle, HandleVisibility};
pub use interaction::{
    InteractionMachine, InteractionState, PressOutcome, PressRejection, ReleaseOutcome,
};
pub use memory_surface::{MemorySurface, SurfaceObject};
pub use occupancy::next_stack_index;
pub use placement::{
    Acquisition, BatchReport, PlacedObject, PlacementError, PlacementOutcome, PlacementRecord,
    SkipReason,
};
pub use placer::{EventOutcome, InfoPanel, ScenePlacer, TapOutcome};
pub use surface::{
    Highlight, ObjectEventKind, ObjectId, ObjectPayload, ObjectTag, RenderSurface, SurfaceEvent,
};
