use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    constrain_move, constrain_scale, next_stack_index, Acquisition, AnimationDescriptor,
    AnimationPlayer, AssetLoadError, AssetLoader, BatchReport, CategoryRule, ControlHandle,
    DecodedImage, DragSample, EventOutcome, FsAssetLoader, HandleVisibility, Highlight,
    InfoPanel, InteractionMachine, InteractionState, LoopPolicy, MemorySurface, ObjectEventKind,
    ObjectId, ObjectPayload, ObjectTag, OffscreenTarget, PlacedObject, PlacementConfig,
    PlacementError, PlacementOutcome, PlacementRecord, PressOutcome, PressRejection,
    ReleaseOutcome, RenderSurface, ScaleLimits, ScenePlacer, SkipReason, StaticAssetLoader,
    SurfaceEvent, SurfaceObject, SurfaceSize, TapOutcome, Vec2, DEFAULT_SURFACE,
    LARGE_SCENERY_CATEGORY_ID,
};
pub use content::{
    load_catalog, load_placement_requests, parse_catalog, parse_placement_requests, AnimalInfo,
    AssetPathError, AssetRef, CatalogIndex, CatalogItem, CatalogItemView, Category, ContentError,
    ItemKind, PlacementRequest,
};

pub const ROOT_ENV_VAR: &str = "JOYLAND_ROOT";

pub const CATALOG_FILE: &str = "catalog.json";
pub const PLACEMENTS_FILE: &str = "placements.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub base_content_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub placements_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "JOYLAND_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and assets/base/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and assets/base/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/joyland\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    Ok(app_paths_for_root(root))
}

fn app_paths_for_root(root: PathBuf) -> AppPaths {
    let base_content_dir = root.join("assets").join("base");
    let catalog_path = base_content_dir.join(CATALOG_FILE);
    let placements_path = base_content_dir.join(PLACEMENTS_FILE);

    AppPaths {
        root,
        base_content_dir,
        catalog_path,
        placements_path,
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_content = path.join("assets").join("base").is_dir();

    cargo_toml && has_content
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
