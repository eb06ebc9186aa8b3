use super::geometry::{SurfaceSize, Vec2};

/// Geometry reported by the surface for an object that is being moved or scaled.
///
/// Every field is optional because surfaces report partially-initialized objects
/// while assets are still settling; constraint checks ignore such samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSample {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale_x: Option<f32>,
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub surface: Option<SurfaceSize>,
}

struct ResolvedSample {
    width: f32,
    height: f32,
    scale: f32,
    left: f32,
    top: f32,
    surface: SurfaceSize,
}

impl DragSample {
    fn resolve(&self) -> Option<ResolvedSample> {
        let resolved = ResolvedSample {
            width: self.width?,
            height: self.height?,
            scale: self.scale_x?,
            left: self.left?,
            top: self.top?,
            surface: self.surface?,
        };
        let finite = [
            resolved.width,
            resolved.height,
            resolved.scale,
            resolved.left,
            resolved.top,
        ]
        .iter()
        .all(|value| value.is_finite());
        finite.then_some(resolved)
    }
}

/// Corrects the reference (top-left) corner so the scaled box stays on the surface.
///
/// Both axes use the horizontal scale. The lower edge is checked first, then the
/// upper edge, so an object larger than the surface ends up pinned by the upper
/// clamp. Returns `None` when the sample is incomplete.
pub fn constrain_move(sample: &DragSample) -> Option<Vec2> {
    let resolved = sample.resolve()?;
    let scaled_width = resolved.width * resolved.scale;
    let scaled_height = resolved.height * resolved.scale;
    let limit_right = resolved.surface.width_px() - scaled_width;
    let limit_bottom = resolved.surface.height_px() - scaled_height;

    let mut left = resolved.left;
    let mut top = resolved.top;

    if top < 0.0 || left < 0.0 {
        top = top.max(0.0);
        left = left.max(0.0);
    }
    if top + scaled_height > resolved.surface.height_px()
        || left + scaled_width > resolved.surface.width_px()
    {
        top = top.min(limit_bottom);
        left = left.min(limit_right);
    }

    Some(Vec2::new(left, top))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    pub min: f32,
    pub max: f32,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self { min: 0.5, max: 1.5 }
    }
}

impl ScaleLimits {
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max.max(self.min))
    }
}

/// Accepts or corrects a scale requested through the resize handle.
///
/// The requested value is clamped to `limits`; if the clamped scale would push the box
/// past the right or bottom edge, the previous scale is kept instead.
pub fn constrain_scale(
    sample: &DragSample,
    previous_scale: f32,
    limits: ScaleLimits,
) -> Option<f32> {
    let resolved = sample.resolve()?;
    let scale = limits.clamp(resolved.scale);
    let overflows = resolved.top + resolved.height * scale > resolved.surface.height_px()
        || resolved.left + resolved.width * scale > resolved.surface.width_px();
    if overflows {
        return Some(previous_scale);
    }
    Some(scale)
}
