//! Histogram configuration: one record holding canvas geometry, style,
//! visibility and label state, addressable through the closed [`ConfigKey`]
//! set.
//!
//! - [`Config::apply`] is the bulk entry point (flat key -> value map).
//! - [`Config::get`] reads any key back as a JSON value.
//! - Validation lives in [`rules`]; setters on [`crate::Histogram`] reuse it.

pub mod keys;
pub mod rules;

pub use keys::ConfigKey;

use crate::error::ValidationError;
use log::warn;
use serde_json::{Map, Value, json};

pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Explicitly requested plotarea parts. Anything left `None` is derived from
/// the canvas size and frame ratios at render time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotAreaSpec {
    pub offset: Option<(i32, i32)>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background_color: Option<String>,
}

/// Which layers the draw pipeline emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFlags {
    pub bar: bool,
    pub grid: bool,
    pub grid_values: bool,
    pub axis: bool,
    pub frequency_polygon: bool,
    pub crf_polygon: bool,
    pub frequency: bool,
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self {
            bar: true,
            grid: true,
            grid_values: true,
            axis: true,
            frequency_polygon: false,
            crf_polygon: false,
            frequency: false,
        }
    }
}

/// A text element with a pixel offset from its computed position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub text: Option<String>,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Label {
    /// Text, if set and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Resolved configuration. Fields are crate-private so every value outside
/// the defaults arrives through [`Config::apply`] or a validated setter;
/// read them back with [`Config::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub(crate) canvas_width: u32,
    pub(crate) canvas_height: u32,
    pub(crate) canvas_background_color: Option<String>,
    pub(crate) frame_x_ratio: f64,
    pub(crate) frame_y_ratio: f64,
    pub(crate) plotarea: PlotAreaSpec,
    pub(crate) axis_color: Option<String>,
    pub(crate) axis_width: u32,
    pub(crate) grid_color: Option<String>,
    pub(crate) grid_width: u32,
    pub(crate) grid_height_pitch: f64,
    pub(crate) bar_background_color: Option<String>,
    pub(crate) bar_border_color: Option<String>,
    pub(crate) bar_border_width: u32,
    pub(crate) frequency_polygon_color: Option<String>,
    pub(crate) frequency_polygon_width: u32,
    pub(crate) crf_polygon_color: Option<String>,
    pub(crate) crf_polygon_width: u32,
    pub(crate) font_path: String,
    pub(crate) font_size: u32,
    pub(crate) font_color: Option<String>,
    pub(crate) show: VisibilityFlags,
    pub(crate) label_x: Label,
    pub(crate) label_y: Label,
    pub(crate) caption: Label,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 400,
            canvas_height: 300,
            canvas_background_color: Some("#ffffff".into()),
            frame_x_ratio: 0.8,
            frame_y_ratio: 0.7,
            plotarea: PlotAreaSpec::default(),
            axis_color: Some("#666666".into()),
            axis_width: 2,
            grid_color: Some("#333333".into()),
            grid_width: 1,
            grid_height_pitch: 1.0,
            bar_background_color: Some("#0000ff".into()),
            bar_border_color: Some("#9999ff".into()),
            bar_border_width: 1,
            frequency_polygon_color: Some("#ff0000".into()),
            frequency_polygon_width: 2,
            crf_polygon_color: Some("#33ff66".into()),
            crf_polygon_width: 2,
            font_path: DEFAULT_FONT_PATH.into(),
            font_size: 16,
            font_color: Some("#333333".into()),
            show: VisibilityFlags::default(),
            label_x: Label::default(),
            label_y: Label::default(),
            caption: Label::default(),
        }
    }
}

impl Config {
    /// Validate every recognized key in `map`, then apply them all.
    ///
    /// Unknown keys are skipped. The first invalid value fails the call and
    /// nothing is applied.
    pub fn apply(&mut self, map: &Map<String, Value>) -> Result<(), ValidationError> {
        let mut accepted = Vec::with_capacity(map.len());
        for (name, value) in map {
            let Ok(key) = name.parse::<ConfigKey>() else {
                warn!("ignoring unknown config key {name:?}");
                continue;
            };
            rules::validate(key, value)?;
            accepted.push((key, value));
        }
        for (key, value) in accepted {
            self.set(key, value);
        }
        Ok(())
    }

    /// Current value of `key` in its config-map form.
    pub fn get(&self, key: ConfigKey) -> Value {
        use ConfigKey::*;
        match key {
            CanvasWidth => json!(self.canvas_width),
            CanvasHeight => json!(self.canvas_height),
            CanvasBackgroundColor => json!(self.canvas_background_color),
            FrameXRatio => json!(self.frame_x_ratio),
            FrameYRatio => json!(self.frame_y_ratio),
            Plotarea => {
                let mut obj = Map::new();
                if let Some((x, y)) = self.plotarea.offset {
                    obj.insert("offset".into(), json!([x, y]));
                }
                if let Some(w) = self.plotarea.width {
                    obj.insert("width".into(), json!(w));
                }
                if let Some(h) = self.plotarea.height {
                    obj.insert("height".into(), json!(h));
                }
                obj.insert(
                    "backgroundColor".into(),
                    json!(self.plotarea.background_color),
                );
                Value::Object(obj)
            }
            AxisColor => json!(self.axis_color),
            AxisWidth => json!(self.axis_width),
            GridColor => json!(self.grid_color),
            GridWidth => json!(self.grid_width),
            GridHeightPitch => json!(self.grid_height_pitch),
            BarBackgroundColor => json!(self.bar_background_color),
            BarBorderColor => json!(self.bar_border_color),
            BarBorderWidth => json!(self.bar_border_width),
            FrequencyPolygonColor => json!(self.frequency_polygon_color),
            FrequencyPolygonWidth => json!(self.frequency_polygon_width),
            CrfPolygonColor => json!(self.crf_polygon_color),
            CrfPolygonWidth => json!(self.crf_polygon_width),
            FontPath => json!(self.font_path),
            FontSize => json!(self.font_size),
            FontColor => json!(self.font_color),
            ShowBar => json!(self.show.bar),
            ShowGrid => json!(self.show.grid),
            ShowGridValues => json!(self.show.grid_values),
            ShowAxis => json!(self.show.axis),
            ShowFrequencyPolygon => json!(self.show.frequency_polygon),
            ShowCrfPolygon => json!(self.show.crf_polygon),
            ShowFrequency => json!(self.show.frequency),
            LabelX => json!(self.label_x.text),
            LabelXOffsetX => json!(self.label_x.offset_x),
            LabelXOffsetY => json!(self.label_x.offset_y),
            LabelY => json!(self.label_y.text),
            LabelYOffsetX => json!(self.label_y.offset_x),
            LabelYOffsetY => json!(self.label_y.offset_y),
            Caption => json!(self.caption.text),
            CaptionOffsetX => json!(self.caption.offset_x),
            CaptionOffsetY => json!(self.caption.offset_y),
        }
    }

    /// Every key with its current value.
    pub fn snapshot(&self) -> Map<String, Value> {
        ConfigKey::ALL
            .iter()
            .map(|k| (k.name().to_string(), self.get(*k)))
            .collect()
    }

    /// Store an already validated value.
    fn set(&mut self, key: ConfigKey, value: &Value) {
        use ConfigKey::*;
        match key {
            CanvasWidth => self.canvas_width = to_u32(value),
            CanvasHeight => self.canvas_height = to_u32(value),
            CanvasBackgroundColor => self.canvas_background_color = to_color(value),
            FrameXRatio => self.frame_x_ratio = value.as_f64().unwrap_or(self.frame_x_ratio),
            FrameYRatio => self.frame_y_ratio = value.as_f64().unwrap_or(self.frame_y_ratio),
            Plotarea => self.plotarea = to_plotarea(value),
            AxisColor => self.axis_color = to_color(value),
            AxisWidth => self.axis_width = to_u32(value),
            GridColor => self.grid_color = to_color(value),
            GridWidth => self.grid_width = to_u32(value),
            GridHeightPitch => {
                self.grid_height_pitch = value.as_f64().unwrap_or(self.grid_height_pitch)
            }
            BarBackgroundColor => self.bar_background_color = to_color(value),
            BarBorderColor => self.bar_border_color = to_color(value),
            BarBorderWidth => self.bar_border_width = to_u32(value),
            FrequencyPolygonColor => self.frequency_polygon_color = to_color(value),
            FrequencyPolygonWidth => self.frequency_polygon_width = to_u32(value),
            CrfPolygonColor => self.crf_polygon_color = to_color(value),
            CrfPolygonWidth => self.crf_polygon_width = to_u32(value),
            FontPath => {
                if let Some(p) = value.as_str() {
                    self.font_path = p.to_string();
                }
            }
            FontSize => self.font_size = to_u32(value),
            FontColor => self.font_color = to_color(value),
            ShowBar => self.show.bar = value.as_bool().unwrap_or(self.show.bar),
            ShowGrid => self.show.grid = value.as_bool().unwrap_or(self.show.grid),
            ShowGridValues => {
                self.show.grid_values = value.as_bool().unwrap_or(self.show.grid_values)
            }
            ShowAxis => self.show.axis = value.as_bool().unwrap_or(self.show.axis),
            ShowFrequencyPolygon => {
                self.show.frequency_polygon =
                    value.as_bool().unwrap_or(self.show.frequency_polygon)
            }
            ShowCrfPolygon => {
                self.show.crf_polygon = value.as_bool().unwrap_or(self.show.crf_polygon)
            }
            ShowFrequency => self.show.frequency = value.as_bool().unwrap_or(self.show.frequency),
            LabelX => self.label_x.text = value.as_str().map(str::to_string),
            LabelXOffsetX => self.label_x.offset_x = to_i32(value),
            LabelXOffsetY => self.label_x.offset_y = to_i32(value),
            LabelY => self.label_y.text = value.as_str().map(str::to_string),
            LabelYOffsetX => self.label_y.offset_x = to_i32(value),
            LabelYOffsetY => self.label_y.offset_y = to_i32(value),
            Caption => self.caption.text = value.as_str().map(str::to_string),
            CaptionOffsetX => self.caption.offset_x = to_i32(value),
            CaptionOffsetY => self.caption.offset_y = to_i32(value),
        }
    }
}

fn to_u32(value: &Value) -> u32 {
    value
        .as_u64()
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

fn to_i32(value: &Value) -> i32 {
    value
        .as_i64()
        .map(|n| n.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        .unwrap_or(0)
}

fn to_color(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn to_plotarea(value: &Value) -> PlotAreaSpec {
    let offset = value.get("offset").and_then(Value::as_array).and_then(|a| {
        match (a.first().map(to_i32), a.get(1).map(to_i32)) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    });
    PlotAreaSpec {
        offset,
        width: value.get("width").map(to_u32),
        height: value.get("height").map(to_u32),
        background_color: value.get("backgroundColor").and_then(to_color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn snapshot_covers_every_key() {
        let snap = Config::default().snapshot();
        assert_eq!(snap.len(), ConfigKey::ALL.len());
        assert_eq!(snap["frameXRatio"], json!(0.8));
        assert_eq!(snap["showFrequencyPolygon"], json!(false));
        assert_eq!(snap["labelX"], Value::Null);
    }

    #[test]
    fn apply_sets_recognized_keys_and_skips_unknown() {
        let mut cfg = Config::default();
        cfg.apply(&map(json!({
            "canvasWidth": 600,
            "canvasBackgroundColor": null,
            "frameYRatio": 0.6,
            "showFrequency": true,
            "caption": "Items",
            "captionOffsetY": -4,
            "plotarea": {"offset": [120, 80], "width": 360},
            "imageDriver": "gd"
        })))
        .unwrap();
        assert_eq!(cfg.canvas_width, 600);
        assert_eq!(cfg.canvas_background_color, None);
        assert_eq!(cfg.frame_y_ratio, 0.6);
        assert!(cfg.show.frequency);
        assert_eq!(cfg.caption.text(), Some("Items"));
        assert_eq!(cfg.caption.offset_y, -4);
        assert_eq!(cfg.plotarea.offset, Some((120, 80)));
        assert_eq!(cfg.plotarea.width, Some(360));
        assert_eq!(cfg.plotarea.height, None);
    }

    #[test]
    fn apply_is_atomic() {
        let mut cfg = Config::default();
        let before = cfg.clone();
        let err = cfg
            .apply(&map(json!({
                "axisWidth": 5,
                "barBackgroundColor": "#abcdef",
                "axisColor": "#12x456"
            })))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "axisColor: expected colorCode|null",
        );
        assert_eq!(cfg, before);
    }

    #[test]
    fn plotarea_reads_back_as_object() {
        let mut cfg = Config::default();
        cfg.apply(&map(json!({"plotarea": {"height": 240, "backgroundColor": "#eee"}})))
            .unwrap();
        assert_eq!(
            cfg.get(ConfigKey::Plotarea),
            json!({"height": 240, "backgroundColor": "#eee"})
        );
    }
}
