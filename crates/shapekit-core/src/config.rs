//! Editor configuration surface.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Default grid spacing in scene units.
pub const DEFAULT_GRID_SPACING: f64 = 8.0;
/// Default minimum element size.
pub const DEFAULT_MIN_SIZE: Size = Size::new(5.0, 5.0);
/// Default large-nudge jump in scene units.
pub const DEFAULT_NUDGE_JUMP: f64 = 10.0;

/// Tunable behavior of the editor controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Grid spacing for snapping. Always >= 1.
    grid_spacing: f64,
    /// Snap moving edges and points to the grid.
    pub snap_to_grid: bool,
    /// Preserve width/height ratio during resize.
    pub lock_aspect: bool,
    /// Keep shapes inside the scene's canvas.
    pub constrain_to_bounds: bool,
    /// Minimum committed element size on each axis.
    pub min_size: Size,
    /// Nudge distance when the jump modifier is held, and for size nudges.
    pub nudge_jump: f64,
    /// When false, rubber bands do not select; they report a creation region.
    pub selection_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_spacing: DEFAULT_GRID_SPACING,
            snap_to_grid: false,
            lock_aspect: false,
            constrain_to_bounds: true,
            min_size: DEFAULT_MIN_SIZE,
            nudge_jump: DEFAULT_NUDGE_JUMP,
            selection_enabled: true,
        }
    }
}

impl EditorConfig {
    /// Current grid spacing.
    pub fn grid_spacing(&self) -> f64 {
        self.grid_spacing
    }

    /// Set the grid spacing, clamped to >= 1.
    pub fn set_grid_spacing(&mut self, spacing: f64) {
        self.grid_spacing = spacing.max(1.0);
    }

    /// Grid spacing if snapping is enabled, else `None`.
    pub fn snap_spacing(&self) -> Option<f64> {
        self.snap_to_grid.then_some(self.grid_spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spacing_clamped() {
        let mut config = EditorConfig::default();
        config.set_grid_spacing(0.25);
        assert!((config.grid_spacing() - 1.0).abs() < f64::EPSILON);

        config.set_grid_spacing(16.0);
        assert!((config.grid_spacing() - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_spacing_gated() {
        let mut config = EditorConfig::default();
        assert!(config.snap_spacing().is_none());

        config.snap_to_grid = true;
        assert_eq!(config.snap_spacing(), Some(DEFAULT_GRID_SPACING));
    }
}
