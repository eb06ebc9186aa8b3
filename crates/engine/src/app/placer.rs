use std::collections::{HashMap, VecDeque};

use tracing::{debug, info, warn};

use crate::content::{AnimalInfo, AssetRef, CatalogIndex, ItemKind, PlacementRequest};

use super::adapter::realize_placement;
use super::assets::AssetLoader;
use super::bounds::{constrain_move, constrain_scale};
use super::config::PlacementConfig;
use super::geometry::Vec2;
use super::interaction::{
    InteractionMachine, InteractionState, PressOutcome, PressRejection, ReleaseOutcome,
};
use super::occupancy::next_stack_index;
use super::placement::{
    Acquisition, BatchReport, PlacedObject, PlacementError, PlacementOutcome, PlacementRecord,
    SkipReason,
};
use super::surface::{ObjectId, RenderSurface, SurfaceEvent};

/// Side panel describing the animal behind a tapped item.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    pub item_id: String,
    pub category_id: String,
    pub name: String,
    pub info: AnimalInfo,
    /// Static items have no animation of their own, so the panel plays the animal's call.
    pub play_audio: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TapOutcome {
    pub played_animation: bool,
    pub opened_info_panel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    Ignored,
    SelectArmed(ObjectId),
    PressRejected(PressRejection),
    /// Presses are swallowed while the info panel is showing.
    PanelOpen,
    Tapped(TapOutcome),
    Moved(Vec2),
    Scaled(f32),
    Deselected(ObjectId),
}

/// Owns the scene: places catalog items on a surface and reacts to input on them.
pub struct ScenePlacer<S, L> {
    catalog: CatalogIndex,
    surface: S,
    loader: L,
    config: PlacementConfig,
    placements: Vec<PlacementRecord>,
    interaction: InteractionMachine,
    owned_counts: HashMap<(String, String), u32>,
    info_panel: Option<InfoPanel>,
}

impl<S, L> ScenePlacer<S, L>
where
    S: RenderSurface,
    L: AssetLoader,
{
    pub fn new(catalog: CatalogIndex, surface: S, loader: L, config: PlacementConfig) -> Self {
        let interaction = InteractionMachine::new(config.select_delay_seconds);
        Self {
            catalog,
            surface,
            loader,
            config,
            placements: Vec::new(),
            interaction,
            owned_counts: HashMap::new(),
            info_panel: None,
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Records back to front, matching the surface draw order.
    pub fn placements(&self) -> &[PlacementRecord] {
        &self.placements
    }

    pub fn record(&self, object: ObjectId) -> Option<&PlacementRecord> {
        self.placements.iter().find(|record| record.object == object)
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.interaction.active()
    }

    pub fn info_panel(&self) -> Option<&InfoPanel> {
        self.info_panel.as_ref()
    }

    pub fn close_info_panel(&mut self) -> Option<InfoPanel> {
        self.info_panel.take()
    }

    /// Copies of the item still in the player's inventory.
    pub fn owned_count(&self, category_id: &str, item_id: &str) -> Option<u32> {
        let key = (category_id.to_string(), item_id.to_string());
        if let Some(count) = self.owned_counts.get(&key) {
            return Some(*count);
        }
        self.catalog
            .item(category_id, item_id)
            .map(|item| item.owned_count)
    }

    /// Places `requests` strictly one after another. A load failure stops the batch.
    pub async fn place_batch(
        &mut self,
        requests: impl IntoIterator<Item = PlacementRequest>,
    ) -> Result<BatchReport, PlacementError> {
        let mut queue: VecDeque<PlacementRequest> = requests.into_iter().collect();
        info!(count = queue.len(), "batch_started");

        let mut report = BatchReport::default();
        while let Some(request) = queue.pop_front() {
            match self.place(&request).await {
                Ok(PlacementOutcome::Placed(placed)) => report.placed.push(placed),
                Ok(PlacementOutcome::Skipped(reason)) => report.skipped.push((request, reason)),
                Err(error) => {
                    warn!(
                        pending = queue.len(),
                        error = %error,
                        "batch_halted"
                    );
                    return Err(error);
                }
            }
        }

        info!(
            placed = report.placed.len(),
            skipped = report.skipped.len(),
            "batch_complete"
        );
        Ok(report)
    }

    /// Resolves one request through the catalog, occupancy counter and adapter.
    ///
    /// A request without `x` is a user add: the new object is selected right away and
    /// paid for from inventory when possible.
    pub async fn place(
        &mut self,
        request: &PlacementRequest,
    ) -> Result<PlacementOutcome, PlacementError> {
        if self.interaction.active().is_some() || self.surface.active_object().is_some() {
            return Ok(self.skip(request, SkipReason::ObjectActive));
        }
        let Some(item) = self
            .catalog
            .find_item(&request.category_id, &request.item_id)
        else {
            return Ok(self.skip(request, SkipReason::NotInCatalog));
        };
        if item.asset.is_none() {
            return Ok(self.skip(request, SkipReason::NoAsset));
        }
        if item.kind == ItemKind::Reserved {
            debug!(item_id = %request.item_id, "placing_reserved_kind_as_generic");
        }

        let kind = item.kind;
        let price = item.price;
        let stack_index = next_stack_index(&request.item_id, &self.placements);
        let realized = realize_placement(
            &mut self.surface,
            &self.loader,
            &item,
            request,
            stack_index,
            &self.config,
        )
        .await
        .map_err(|source| PlacementError::AssetLoad {
            item_id: request.item_id.clone(),
            category_id: request.category_id.clone(),
            source,
        })?;
        let Some(realized) = realized else {
            return Ok(self.skip(request, SkipReason::NoAsset));
        };

        self.placements.push(PlacementRecord {
            item_id: request.item_id.clone(),
            category_id: request.category_id.clone(),
            stack_index,
            kind,
            position: realized.position,
            scale: realized.scale,
            object: realized.object,
        });
        info!(
            item_id = %request.item_id,
            category_id = %request.category_id,
            stack_index,
            kind = kind.code(),
            x = realized.position.x,
            y = realized.position.y,
            scale = realized.scale,
            "placement_applied"
        );

        let mut acquisition = None;
        if request.x.is_none() {
            self.select(realized.object);
            acquisition = Some(self.acquire(&request.category_id, &request.item_id, price));
        }

        Ok(PlacementOutcome::Placed(PlacedObject {
            object: realized.object,
            stack_index,
            acquisition,
        }))
    }

    fn skip(&self, request: &PlacementRequest, reason: SkipReason) -> PlacementOutcome {
        info!(
            item_id = %request.item_id,
            category_id = %request.category_id,
            reason = reason.label(),
            "placement_skipped"
        );
        PlacementOutcome::Skipped(reason)
    }

    fn acquire(&mut self, category_id: &str, item_id: &str, price: u32) -> Acquisition {
        let owned = self.owned_count(category_id, item_id).unwrap_or(0);
        if owned == 0 {
            debug!(item_id, price, "acquisition_requires_purchase");
            return Acquisition::RequiresPurchase { price };
        }
        let remaining = owned - 1;
        self.owned_counts
            .insert((category_id.to_string(), item_id.to_string()), remaining);
        debug!(item_id, remaining, "acquisition_from_inventory");
        Acquisition::FromInventory { remaining }
    }

    /// Makes `object` the active object. Refused while another object is active.
    pub fn select(&mut self, object: ObjectId) -> bool {
        if self.record(object).is_none() || !self.interaction.activate(object) {
            return false;
        }
        self.apply_selection(object);
        true
    }

    fn apply_selection(&mut self, object: ObjectId) {
        let Some(index) = self
            .placements
            .iter()
            .position(|record| record.object == object)
        else {
            return;
        };
        let record = self.placements.remove(index);
        let highlight = self.config.highlight_for(record.kind.is_fixed());

        self.surface.bring_to_front(object);
        self.surface.set_active_object(Some(object));
        self.surface.set_selectable(object, true);
        self.surface.set_highlight(object, Some(highlight));
        info!(
            item_id = %record.item_id,
            stack_index = record.stack_index,
            "object_selected"
        );
        self.placements.push(record);
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) -> EventOutcome {
        let object = event.object();
        let Some(record) = self.record(object) else {
            debug!(object = object.0, "event_for_unknown_object");
            return EventOutcome::Ignored;
        };
        let locked = record.kind.is_fixed();
        let category_id = record.category_id.clone();

        match event {
            SurfaceEvent::Pressed(_) => {
                if self.info_panel.is_some() {
                    return EventOutcome::PanelOpen;
                }
                match self.interaction.press(object, locked) {
                    PressOutcome::Armed => {
                        debug!(object = object.0, "select_armed");
                        EventOutcome::SelectArmed(object)
                    }
                    PressOutcome::Rejected(reason) => {
                        debug!(object = object.0, ?reason, "press_rejected");
                        EventOutcome::PressRejected(reason)
                    }
                }
            }
            SurfaceEvent::Released(_) => match self.interaction.release(object) {
                ReleaseOutcome::Tap => EventOutcome::Tapped(self.tap(object)),
                ReleaseOutcome::Ignored => EventOutcome::Ignored,
            },
            SurfaceEvent::Moving { sample, .. } => {
                if self.interaction.active() != Some(object) {
                    return EventOutcome::Ignored;
                }
                let Some(position) = constrain_move(&sample) else {
                    return EventOutcome::Ignored;
                };
                self.surface.set_position(object, position);
                if let Some(record) = self.record_mut(object) {
                    record.position = position;
                }
                EventOutcome::Moved(position)
            }
            SurfaceEvent::Scaling {
                sample,
                previous_scale,
                ..
            } => {
                if self.interaction.active() != Some(object) {
                    return EventOutcome::Ignored;
                }
                let limits = self.config.scale_limits_for(&category_id);
                let Some(scale) = constrain_scale(&sample, previous_scale, limits) else {
                    return EventOutcome::Ignored;
                };
                self.surface.set_scale(object, scale);
                if let Some(record) = self.record_mut(object) {
                    record.scale = scale;
                }
                EventOutcome::Scaled(scale)
            }
            SurfaceEvent::Deselected(_) => {
                if !self.interaction.deselect(object) {
                    return EventOutcome::Ignored;
                }
                self.surface.set_highlight(object, None);
                self.surface.set_selectable(object, false);
                if self.surface.active_object() == Some(object) {
                    self.surface.set_active_object(None);
                }
                info!(object = object.0, "object_deselected");
                EventOutcome::Deselected(object)
            }
        }
    }

    fn tap(&mut self, object: ObjectId) -> TapOutcome {
        let Some(record) = self.record(object) else {
            return TapOutcome::default();
        };
        let Some(item) = self.catalog.item(&record.category_id, &record.item_id) else {
            return TapOutcome::default();
        };
        if item.kind.is_fixed() {
            return TapOutcome::default();
        }

        // Presses are swallowed while the panel is open, so no tap reaches here then.
        let mut outcome = TapOutcome::default();
        if matches!(item.asset, Some(AssetRef::Animation(_))) {
            outcome.played_animation = self.surface.play_animation(object);
        }
        if let Some(info) = item.animal_info.clone() {
            self.info_panel = Some(InfoPanel {
                item_id: item.item_id.clone(),
                category_id: item.category_id.clone(),
                name: item.name.clone(),
                info,
                play_audio: matches!(item.asset, Some(AssetRef::Image(_))),
            });
            outcome.opened_info_panel = true;
        }
        debug!(
            object = object.0,
            played_animation = outcome.played_animation,
            opened_info_panel = outcome.opened_info_panel,
            "object_tapped"
        );
        outcome
    }

    fn record_mut(&mut self, object: ObjectId) -> Option<&mut PlacementRecord> {
        self.placements
            .iter_mut()
            .find(|record| record.object == object)
    }

    /// Fixed-step tick: runs the select timer, then the animations.
    pub fn advance(&mut self, dt_seconds: f32) {
        if let Some(object) = self.interaction.advance(dt_seconds) {
            self.apply_selection(object);
        }
        self.surface.advance_animations(dt_seconds);
    }

    /// Deletes an instance. Surviving stack indices are left as they are.
    pub fn remove(&mut self, object: ObjectId) -> Option<PlacementRecord> {
        let index = self
            .placements
            .iter()
            .position(|record| record.object == object)?;
        let record = self.placements.remove(index);
        self.interaction.forget(object);
        self.surface.remove_object(object);
        info!(
            item_id = %record.item_id,
            stack_index = record.stack_index,
            "placement_removed"
        );
        Some(record)
    }
}
