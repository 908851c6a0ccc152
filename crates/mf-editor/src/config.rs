//! Editor tunables.
//!
//! Hosts may pass a partial JSON object; every missing field keeps its
//! default.

use kurbo::Size;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Detail popup box, used for edge clamping.
    pub popup_width: f64,
    pub popup_height: f64,
    /// Minimum distance between the popup and the container edges.
    pub popup_margin: f64,
    /// Node context menu box, clamped with no margin.
    pub menu_width: f64,
    pub menu_height: f64,
    /// Two taps on one node closer than this count as a double-tap.
    pub double_tap_ms: f64,
    /// Viewports narrower than this place catalog taps at the canvas center.
    pub touch_breakpoint: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            popup_width: 280.0,
            popup_height: 160.0,
            popup_margin: 10.0,
            menu_width: 150.0,
            menu_height: 90.0,
            double_tap_ms: 400.0,
            touch_breakpoint: 768.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid editor config: {e}"))
    }

    pub fn popup_size(&self) -> Size {
        Size::new(self.popup_width, self.popup_height)
    }

    pub fn menu_size(&self) -> Size {
        Size::new(self.menu_width, self.menu_height)
    }

    /// Whether a viewport of `width` pixels uses the touch placement path.
    pub fn is_small_viewport(&self, width: f64) -> bool {
        width < self.touch_breakpoint
    }
}
