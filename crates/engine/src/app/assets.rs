use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

use crate::content::{AssetPathError, AssetRef};

use super::animation::AnimationDescriptor;

/// Decoded static image, shared with the surface that draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pixels: Arc<RgbaImage>,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Transparent image of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbaImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("asset path '{path}' rejected: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: AssetPathError,
    },
    #[error("failed to read asset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    DecodeImage {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to parse animation descriptor {path}: {source}")]
    DecodeAnimation {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("asset {path} has unusable dimensions or timing")]
    InvalidDimensions { path: String },
    #[error("asset not available: {path}")]
    Missing { path: String },
}

/// Asynchronous asset fetchers. Loads run on the interaction thread, hence `?Send`.
#[async_trait(?Send)]
pub trait AssetLoader {
    async fn load_image(&self, path: &str) -> Result<DecodedImage, AssetLoadError>;
    async fn load_animation(&self, path: &str) -> Result<AnimationDescriptor, AssetLoadError>;
}

/// Loads assets from a content directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, AssetLoadError> {
        AssetRef::parse(path).map_err(|source| AssetLoadError::InvalidPath {
            path: path.to_string(),
            source,
        })?;
        let full_path = self.root.join(path);
        let bytes = tokio::fs::read(&full_path)
            .await
            .map_err(|source| AssetLoadError::Read {
                path: full_path.clone(),
                source,
            })?;
        debug!(path = %full_path.display(), bytes = bytes.len(), "asset_read");
        Ok(bytes)
    }
}

#[async_trait(?Send)]
impl AssetLoader for FsAssetLoader {
    async fn load_image(&self, path: &str) -> Result<DecodedImage, AssetLoadError> {
        let bytes = self.read(path).await?;
        let decoded =
            image::load_from_memory(&bytes).map_err(|source| AssetLoadError::DecodeImage {
                path: path.to_string(),
                source,
            })?;
        let image = DecodedImage::new(decoded.to_rgba8());
        if image.width() == 0 || image.height() == 0 {
            return Err(AssetLoadError::InvalidDimensions {
                path: path.to_string(),
            });
        }
        Ok(image)
    }

    async fn load_animation(&self, path: &str) -> Result<AnimationDescriptor, AssetLoadError> {
        let bytes = self.read(path).await?;
        let descriptor: AnimationDescriptor =
            serde_json::from_slice(&bytes).map_err(|source| AssetLoadError::DecodeAnimation {
                path: path.to_string(),
                source,
            })?;
        if !descriptor.is_well_formed() {
            return Err(AssetLoadError::InvalidDimensions {
                path: path.to_string(),
            });
        }
        Ok(descriptor)
    }
}

/// In-memory loader with injectable failures. Records every request in order.
#[derive(Debug, Default)]
pub struct StaticAssetLoader {
    images: HashMap<String, (u32, u32)>,
    animations: HashMap<String, AnimationDescriptor>,
    failing: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl StaticAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, path: impl Into<String>, width: u32, height: u32) -> Self {
        self.images.insert(path.into(), (width, height));
        self
    }

    pub fn with_animation(
        mut self,
        path: impl Into<String>,
        descriptor: AnimationDescriptor,
    ) -> Self {
        self.animations.insert(path.into(), descriptor);
        self
    }

    pub fn with_failure(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn record(&self, path: &str) -> Result<(), AssetLoadError> {
        self.requests.borrow_mut().push(path.to_string());
        if self.failing.contains(path) {
            return Err(AssetLoadError::Read {
                path: PathBuf::from(path),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "injected failure"),
            });
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl AssetLoader for StaticAssetLoader {
    async fn load_image(&self, path: &str) -> Result<DecodedImage, AssetLoadError> {
        self.record(path)?;
        let (width, height) = self
            .images
            .get(path)
            .copied()
            .ok_or_else(|| AssetLoadError::Missing {
                path: path.to_string(),
            })?;
        Ok(DecodedImage::blank(width, height))
    }

    async fn load_animation(&self, path: &str) -> Result<AnimationDescriptor, AssetLoadError> {
        self.record(path)?;
        self.animations
            .get(path)
            .copied()
            .ok_or_else(|| AssetLoadError::Missing {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_png(path: &std::path::Path, width: u32, height: u32) {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        image.save(path).expect("save png");
    }

    #[tokio::test]
    async fn fs_loader_decodes_png_dimensions() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("items")).expect("mkdir");
        write_png(&dir.path().join("items/bin.png"), 12, 7);

        let loader = FsAssetLoader::new(dir.path());
        let image = loader.load_image("items/bin.png").await.expect("image");
        assert_eq!((image.width(), image.height()), (12, 7));
    }

    #[tokio::test]
    async fn fs_loader_parses_animation_descriptor() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("wheel.json"),
            r#"{"fr":30,"ip":0,"op":90,"w":320,"h":240,"layers":[]}"#,
        )
        .expect("write");

        let loader = FsAssetLoader::new(dir.path());
        let descriptor = loader.load_animation("wheel.json").await.expect("descriptor");
        assert_eq!((descriptor.width, descriptor.height), (320, 240));
        assert_eq!(descriptor.out_point, 90.0);
    }

    #[tokio::test]
    async fn fs_loader_rejects_zero_sized_animation() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("empty.json"),
            r#"{"fr":30,"ip":0,"op":90,"w":0,"h":240}"#,
        )
        .expect("write");

        let loader = FsAssetLoader::new(dir.path());
        let error = loader.load_animation("empty.json").await.expect_err("must fail");
        assert!(matches!(error, AssetLoadError::InvalidDimensions { .. }));
    }

    #[tokio::test]
    async fn fs_loader_rejects_traversal_before_touching_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loader = FsAssetLoader::new(dir.path());
        let error = loader.load_image("../secret.png").await.expect_err("must fail");
        assert!(matches!(
            error,
            AssetLoadError::InvalidPath {
                source: AssetPathError::BadSegment { segment: 0 },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn fs_loader_rejects_uppercase_path_even_when_file_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(&dir.path().join("Bin.png"), 2, 2);

        let loader = FsAssetLoader::new(dir.path());
        let error = loader.load_image("Bin.png").await.expect_err("must fail");
        assert!(matches!(
            error,
            AssetLoadError::InvalidPath {
                source: AssetPathError::InvalidCharacter {
                    character: 'B',
                    offset: 0
                },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn fs_loader_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loader = FsAssetLoader::new(dir.path());
        let error = loader.load_image("missing.png").await.expect_err("must fail");
        assert!(matches!(error, AssetLoadError::Read { .. }));
    }

    #[tokio::test]
    async fn fs_loader_reports_corrupt_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.png"), b"not a png").expect("write");
        let loader = FsAssetLoader::new(dir.path());
        let error = loader.load_image("broken.png").await.expect_err("must fail");
        assert!(matches!(error, AssetLoadError::DecodeImage { .. }));
    }

    #[tokio::test]
    async fn static_loader_records_requests_and_injects_failures() {
        let loader = StaticAssetLoader::new()
            .with_image("a.png", 10, 20)
            .with_failure("b.png");

        let image = loader.load_image("a.png").await.expect("image");
        assert_eq!((image.width(), image.height()), (10, 20));
        assert!(loader.load_image("b.png").await.is_err());
        assert!(matches!(
            loader.load_animation("c.json").await,
            Err(AssetLoadError::Missing { .. })
        ));
        assert_eq!(loader.requests(), vec!["a.png", "b.png", "c.json"]);
    }
}
