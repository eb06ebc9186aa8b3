use super::bounds::ScaleLimits;
use super::geometry::{SurfaceSize, DEFAULT_SURFACE};
use super::surface::Highlight;

/// Category holding large scenery pieces that are placed bigger by default.
pub const LARGE_SCENERY_CATEGORY_ID: &str = "JC-23012602050000000";

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub category_id: String,
    /// Used when a placement request carries no scale.
    pub default_scale: Option<f32>,
    pub max_scale: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub surface: SurfaceSize,
    pub select_delay_seconds: f32,
    pub scale_limits: ScaleLimits,
    pub category_rules: Vec<CategoryRule>,
    pub highlight: Highlight,
    pub fixed_highlight: Highlight,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            surface: DEFAULT_SURFACE,
            select_delay_seconds: 1.0,
            scale_limits: ScaleLimits::default(),
            category_rules: vec![CategoryRule {
                category_id: LARGE_SCENERY_CATEGORY_ID.to_string(),
                default_scale: Some(1.5),
                max_scale: Some(2.0),
            }],
            highlight: Highlight {
                background: Some([0x00, 0x00, 0x00, 0x70]),
                corner_radius: 50.0,
            },
            fixed_highlight: Highlight {
                background: None,
                corner_radius: 50.0,
            },
        }
    }
}

impl PlacementConfig {
    fn rule_for(&self, category_id: &str) -> Option<&CategoryRule> {
        self.category_rules
            .iter()
            .find(|rule| rule.category_id == category_id)
    }

    pub fn default_scale_for(&self, category_id: &str) -> f32 {
        self.rule_for(category_id)
            .and_then(|rule| rule.default_scale)
            .unwrap_or(1.0)
    }

    pub fn scale_limits_for(&self, category_id: &str) -> ScaleLimits {
        match self.rule_for(category_id).and_then(|rule| rule.max_scale) {
            Some(max) => ScaleLimits {
                max,
                ..self.scale_limits
            },
            None => self.scale_limits,
        }
    }

    pub fn highlight_for(&self, fixed: bool) -> Highlight {
        if fixed {
            self.fixed_highlight
        } else {
            self.highlight
        }
    }
}
