use std::process::ExitCode;

use joyland_engine::{
    load_catalog, load_placement_requests, Acquisition, AssetLoader, ContentError, EventOutcome,
    FsAssetLoader, MemorySurface, ObjectId, PlacementError, PlacementRequest, RenderSurface,
    ScenePlacer, TapOutcome, Vec2,
};
use thiserror::Error;
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;

const TICK_SECONDS: f32 = 1.0 / 60.0;
const MAX_HOLD_TICKS: u32 = 600;
const SETTLE_SECONDS: f32 = 2.0;

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct ScriptSummary {
    pub(crate) placed: usize,
    pub(crate) skipped: usize,
    pub(crate) tap: Option<TapOutcome>,
    pub(crate) dragged_to: Option<Vec2>,
    pub(crate) acquisition: Option<Acquisition>,
}

type DemoPlacer<L> = ScenePlacer<MemorySurface, L>;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_session(app) {
        error!(error = %err, "session_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_session(app: AppWiring) -> Result<(), SessionError> {
    let catalog = load_catalog(&app.paths.catalog_path)?;
    let requests = load_placement_requests(&app.paths.placements_path)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(SessionError::Runtime)?;

    let surface = MemorySurface::new(app.config.surface);
    let loader = FsAssetLoader::new(app.paths.base_content_dir.clone());
    let mut placer = ScenePlacer::new(catalog, surface, loader, app.config);

    let summary = runtime.block_on(play_script(&mut placer, requests))?;
    info!(
        placed = summary.placed,
        skipped = summary.skipped,
        tapped = summary.tap.is_some(),
        dragged = summary.dragged_to.is_some(),
        "session_complete"
    );
    Ok(())
}

/// Seeds the scene, then walks through tap, hold-to-select, drag, deselect and add.
pub(crate) async fn play_script<L: AssetLoader>(
    placer: &mut DemoPlacer<L>,
    requests: Vec<PlacementRequest>,
) -> Result<ScriptSummary, SessionError> {
    let add_request = requests
        .first()
        .map(|request| PlacementRequest::new(&request.item_id, &request.category_id));

    let report = placer.place_batch(requests).await?;
    let mut summary = ScriptSummary {
        placed: report.placed.len(),
        skipped: report.skipped.len(),
        ..ScriptSummary::default()
    };

    if let Some(object) = first_movable(placer) {
        summary.tap = tap(placer, object);
        if let Some(panel) = placer.close_info_panel() {
            info!(name = %panel.name, habitat = %panel.info.habitat, "info_panel_closed");
        }
        summary.dragged_to = hold_and_drag(placer, object);
        deselect(placer);
    } else {
        warn!("no_movable_object_to_script");
    }

    if let Some(request) = add_request {
        let outcome = placer.place(&request).await?;
        summary.acquisition = outcome.placed().and_then(|placed| placed.acquisition);
        deselect(placer);
    }

    settle(placer, SETTLE_SECONDS);
    log_scene(placer);
    Ok(summary)
}

fn first_movable<L: AssetLoader>(placer: &DemoPlacer<L>) -> Option<ObjectId> {
    placer
        .placements()
        .iter()
        .find(|record| !record.kind.is_fixed())
        .map(|record| record.object)
}

fn center_of<L: AssetLoader>(placer: &DemoPlacer<L>, object: ObjectId) -> Option<Vec2> {
    let found = placer.surface().find_object(object)?;
    let (width, height) = found.scaled_size();
    Some(Vec2::new(
        found.position.x + width * 0.5,
        found.position.y + height * 0.5,
    ))
}

fn tap<L: AssetLoader>(placer: &mut DemoPlacer<L>, object: ObjectId) -> Option<TapOutcome> {
    let pressed = placer.surface().press_at(center_of(placer, object)?)?;
    placer.handle_event(pressed);
    placer.advance(TICK_SECONDS);
    let released = placer.surface().release(pressed.object())?;
    match placer.handle_event(released) {
        EventOutcome::Tapped(outcome) => {
            info!(
                played_animation = outcome.played_animation,
                opened_info_panel = outcome.opened_info_panel,
                "script_tap"
            );
            Some(outcome)
        }
        _ => None,
    }
}

fn hold_and_drag<L: AssetLoader>(placer: &mut DemoPlacer<L>, object: ObjectId) -> Option<Vec2> {
    let pressed = placer.surface().press_at(center_of(placer, object)?)?;
    let target = pressed.object();
    placer.handle_event(pressed);

    let mut ticks = 0;
    while placer.active_object() != Some(target) && ticks < MAX_HOLD_TICKS {
        placer.advance(TICK_SECONDS);
        ticks += 1;
    }
    if placer.active_object() != Some(target) {
        warn!(ticks, "hold_did_not_select");
        return None;
    }

    let off_surface = Vec2::new(-20.0, placer.surface().size().height_px());
    let moving = placer.surface_mut().drag_to(target, off_surface)?;
    match placer.handle_event(moving) {
        EventOutcome::Moved(position) => {
            info!(x = position.x, y = position.y, "script_drag_corrected");
            Some(position)
        }
        _ => None,
    }
}

fn deselect<L: AssetLoader>(placer: &mut DemoPlacer<L>) {
    if let Some(event) = placer.surface_mut().discard_active() {
        placer.handle_event(event);
    }
}

fn settle<L: AssetLoader>(placer: &mut DemoPlacer<L>, seconds: f32) {
    let mut elapsed = 0.0;
    while elapsed < seconds {
        placer.advance(TICK_SECONDS);
        elapsed += TICK_SECONDS;
    }
}

fn log_scene<L: AssetLoader>(placer: &DemoPlacer<L>) {
    for record in placer.placements() {
        info!(
            item_id = %record.item_id,
            stack_index = record.stack_index,
            kind = record.kind.code(),
            x = record.position.x,
            y = record.position.y,
            scale = record.scale,
            "scene_object"
        );
    }
}
