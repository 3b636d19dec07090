// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use serde::{Deserialize, Serialize};

/// Top-level rendering configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub dropzone: DropzoneConfig,
}

impl Config {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Geometry of the rendered diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Left margin where the first column of gates starts.
    pub start_x: f64,
    /// y coordinate of the first wire.
    pub start_y: f64,
    pub gate_height: f64,
    pub gate_padding: f64,
    pub min_gate_width: f64,
    pub label_padding: f64,
    pub label_font_size: f64,
    pub args_font_size: f64,
    /// Average glyph width as a fraction of the font size, used to estimate label widths.
    pub char_width_ratio: f64,
    /// Vertical distance between a qubit's wire block and the next qubit's wire.
    pub register_height: f64,
    pub classical_register_height: f64,
    pub group_box_padding: f64,
    /// Amount the group padding shrinks per nesting level.
    pub nested_group_padding: f64,
    pub control_btn_offset: f64,
    pub control_btn_radius: f64,
    pub control_dot_radius: f64,
    pub oplus_radius: f64,
    /// x coordinate where wire lines start.
    pub reg_line_start: f64,
    pub input_label_x: f64,
    /// Largest difference in qubit rows for two targets to be drawn in the same box.
    pub max_target_gap: usize,
}

const START_X: f64 = 80.0;
const START_Y: f64 = 40.0;
const GATE_HEIGHT: f64 = 40.0;
const GATE_PADDING: f64 = 10.0;
const MIN_GATE_WIDTH: f64 = 40.0;
const LABEL_PADDING: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const ARGS_FONT_SIZE: f64 = 12.0;
const CHAR_WIDTH_RATIO: f64 = 0.6;
const REGISTER_HEIGHT: f64 = GATE_HEIGHT + 2.0 * GATE_PADDING;
const CLASSICAL_REGISTER_HEIGHT: f64 = GATE_HEIGHT / 2.0;
const GROUP_BOX_PADDING: f64 = GATE_PADDING;
const NESTED_GROUP_PADDING: f64 = 2.0;
const CONTROL_BTN_OFFSET: f64 = 40.0;
const CONTROL_BTN_RADIUS: f64 = 7.0;
const CONTROL_DOT_RADIUS: f64 = 5.0;
const OPLUS_RADIUS: f64 = 15.0;
const REG_LINE_START: f64 = 40.0;
const INPUT_LABEL_X: f64 = 20.0;
const MAX_TARGET_GAP: usize = 1;

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: START_X,
            start_y: START_Y,
            gate_height: GATE_HEIGHT,
            gate_padding: GATE_PADDING,
            min_gate_width: MIN_GATE_WIDTH,
            label_padding: LABEL_PADDING,
            label_font_size: LABEL_FONT_SIZE,
            args_font_size: ARGS_FONT_SIZE,
            char_width_ratio: CHAR_WIDTH_RATIO,
            register_height: REGISTER_HEIGHT,
            classical_register_height: CLASSICAL_REGISTER_HEIGHT,
            group_box_padding: GROUP_BOX_PADDING,
            nested_group_padding: NESTED_GROUP_PADDING,
            control_btn_offset: CONTROL_BTN_OFFSET,
            control_btn_radius: CONTROL_BTN_RADIUS,
            control_dot_radius: CONTROL_DOT_RADIUS,
            oplus_radius: OPLUS_RADIUS,
            reg_line_start: REG_LINE_START,
            input_label_x: INPUT_LABEL_X,
            max_target_gap: MAX_TARGET_GAP,
        }
    }
}

impl LayoutConfig {
    /// Padding between a group box and its children at the given nesting depth.
    /// Shrinks with depth and never goes negative.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn group_padding(&self, depth: usize) -> f64 {
        (self.group_box_padding - depth as f64 * self.nested_group_padding).max(0.0)
    }

    /// Estimated rendered width of `text` at the given font size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.char_width_ratio
    }
}

/// Geometry of the drop targets synthesized over a rendered diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropzoneConfig {
    /// Half the height of a dropzone, measured from its wire.
    pub padding_y: f64,
    /// x coordinate where the first dropzone on every wire begins.
    pub prefix_x: f64,
}

impl Default for DropzoneConfig {
    fn default() -> Self {
        Self {
            padding_y: 20.0,
            prefix_x: REG_LINE_START,
        }
    }
}
