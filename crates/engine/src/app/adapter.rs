use tracing::debug;

use crate::content::{AssetRef, CatalogItemView, PlacementRequest};

use super::animation::{AnimationPlayer, LoopPolicy, OffscreenTarget};
use super::assets::{AssetLoadError, AssetLoader};
use super::config::PlacementConfig;
use super::geometry::Vec2;
use super::handles::ControlHandle;
use super::surface::{ObjectEventKind, ObjectId, ObjectPayload, ObjectTag, RenderSurface};

const WIRED_EVENTS: [ObjectEventKind; 3] = [
    ObjectEventKind::Pressed,
    ObjectEventKind::Released,
    ObjectEventKind::Deselected,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RealizedObject {
    pub(crate) object: ObjectId,
    pub(crate) position: Vec2,
    pub(crate) scale: f32,
}

/// Turns a catalog item into a live, wired object on `surface`.
///
/// Identity and category rules come from `request`; `item` supplies what is drawn.
/// Returns `Ok(None)` when the item has no asset to render.
pub(crate) async fn realize_placement<S, L>(
    surface: &mut S,
    loader: &L,
    item: &CatalogItemView,
    request: &PlacementRequest,
    stack_index: u32,
    config: &PlacementConfig,
) -> Result<Option<RealizedObject>, AssetLoadError>
where
    S: RenderSurface + ?Sized,
    L: AssetLoader + ?Sized,
{
    let Some(asset) = item.asset.as_ref() else {
        debug!(item_id = %request.item_id, "placement_without_asset");
        return Ok(None);
    };

    let payload = match asset {
        AssetRef::Image(path) => ObjectPayload::Image(loader.load_image(path).await?),
        AssetRef::Animation(path) => {
            let descriptor = loader.load_animation(path).await?;
            let mut player = AnimationPlayer::new(
                descriptor,
                LoopPolicy::for_kind(item.kind),
                item.playback_speed,
            );
            player.go_to_and_stop(descriptor.in_point);
            ObjectPayload::Animation {
                target: OffscreenTarget::for_descriptor(&descriptor),
                player,
            }
        }
    };

    let (width, height) = payload.native_size();
    let surface_size = surface.size();
    let object = surface.create_object(
        payload,
        ObjectTag {
            item_id: request.item_id.clone(),
            category_id: request.category_id.clone(),
            stack_index,
            kind: item.kind,
        },
    );

    let scale = request
        .scale
        .unwrap_or_else(|| config.default_scale_for(&request.category_id));
    let mut position = Vec2::new(
        request.x.unwrap_or(0.0),
        request
            .y
            .unwrap_or_else(|| surface_size.centered_top(height)),
    );

    surface.set_scale(object, scale);
    surface.set_selectable(object, false);
    for handle in ControlHandle::ALL {
        surface.set_handle_visible(object, handle, handle == ControlHandle::BottomRight);
    }

    if item.kind.is_fixed() {
        surface.set_locked(object, true);
        position.x = surface_size.centered_left(width);
        surface.set_handle_visible(object, ControlHandle::BottomRight, false);
    }

    surface.set_position(object, position);
    surface.subscribe(object, &WIRED_EVENTS);

    if asset.is_animation() && LoopPolicy::for_kind(item.kind) == LoopPolicy::Loop {
        surface.play_animation(object);
    }

    Ok(Some(RealizedObject {
        object,
        position,
        scale,
    }))
}
