//! Host-provided settings, read-only to the engine core.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

/// Editor settings supplied by the host UI. The engine never mutates
/// these on its own; the host pushes changes through
/// [`Settings::apply`].
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// W/A/S/D adjacent-insert shortcuts are active.
    pub fast_mode: bool,
    /// Dragged items snap to neighboring items' edges and centers.
    pub auto_snap: bool,
    /// Un-snapped drag axes and keyboard nudges round to the grid.
    pub snap_to_grid: bool,
    /// Grid spacing in world units; `<= 0` disables the grid entirely.
    pub grid_size: f64,
    /// Draw the `box_code` label.
    pub show_box_code: bool,
    /// Draw the `equip_id` label.
    pub show_equip_id: bool,
    /// Draw the `box_name` label.
    pub show_box_name: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fast_mode: false,
            auto_snap: true,
            snap_to_grid: false,
            grid_size: 50.0,
            show_box_code: false,
            show_equip_id: false,
            show_box_name: false,
        }
    }
}

/// Sparse settings update. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fast_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auto_snap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snap_to_grid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grid_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_box_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_equip_id: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_box_name: Option<bool>,
}

impl Settings {
    /// Merge a sparse update. A non-finite grid size is ignored.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.fast_mode {
            self.fast_mode = v;
        }
        if let Some(v) = patch.auto_snap {
            self.auto_snap = v;
        }
        if let Some(v) = patch.snap_to_grid {
            self.snap_to_grid = v;
        }
        if let Some(v) = patch.grid_size
            && v.is_finite()
        {
            self.grid_size = v;
        }
        if let Some(v) = patch.show_box_code {
            self.show_box_code = v;
        }
        if let Some(v) = patch.show_equip_id {
            self.show_equip_id = v;
        }
        if let Some(v) = patch.show_box_name {
            self.show_box_name = v;
        }
    }
}
