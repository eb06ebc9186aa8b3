#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the placement surface. Origin is the top-left corner, y grows down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

pub const DEFAULT_SURFACE: SurfaceSize = SurfaceSize {
    width: 1262,
    height: 454,
};

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_px(&self) -> f32 {
        self.width as f32
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32
    }

    /// Left coordinate that centers an object of `width` horizontally.
    pub fn centered_left(&self, width: f32) -> f32 {
        self.width_px() * 0.5 - width * 0.5
    }

    /// Top coordinate that centers an object of `height` vertically.
    pub fn centered_top(&self, height: f32) -> f32 {
        self.height_px() * 0.5 - height * 0.5
    }

    pub fn contains_box(&self, left: f32, top: f32, width: f32, height: f32) -> bool {
        left >= 0.0
            && top >= 0.0
            && left + width <= self.width_px()
            && top + height <= self.height_px()
    }
}
