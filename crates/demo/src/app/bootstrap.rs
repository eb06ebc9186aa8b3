use joyland_engine::{resolve_app_paths, AppPaths, PlacementConfig, StartupError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SELECT_DELAY_ENV_VAR: &str = "JOYLAND_SELECT_DELAY_MS";

pub(crate) struct AppWiring {
    pub(crate) paths: AppPaths,
    pub(crate) config: PlacementConfig,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== Joyland Placement Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "project_root_resolved");

    let mut config = PlacementConfig::default();
    if let Some(delay) = select_delay_from_env() {
        config.select_delay_seconds = delay;
    }

    Ok(AppWiring { paths, config })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn select_delay_from_env() -> Option<f32> {
    let raw = std::env::var(SELECT_DELAY_ENV_VAR).ok()?;
    let parsed = parse_select_delay_ms(&raw);
    if parsed.is_none() {
        warn!(var = SELECT_DELAY_ENV_VAR, value = %raw, "ignoring_invalid_select_delay");
    }
    parsed
}

/// Milliseconds in, seconds out.
fn parse_select_delay_ms(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .map(|millis| millis as f32 / 1000.0)
}
