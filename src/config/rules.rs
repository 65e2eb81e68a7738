//! Per-key validation rules for configuration values.
//!
//! Each [`ConfigKey`] has one [`Rule`]: a union of accepted value kinds plus
//! an optional range constraint on numeric values. Both bulk config and the
//! single-property setters go through this table.

use super::keys::ConfigKey;
use crate::color::is_color_code_value;
use crate::error::ValidationError;
use serde_json::Value;
use std::path::Path;

pub const CANVAS_WIDTH_LIMIT_LOWER: u32 = 50;
pub const CANVAS_HEIGHT_LIMIT_LOWER: u32 = 50;
pub const FONT_SIZE_LIMIT_LOWER: u32 = 6;

/// Accepted kind of a config value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Float,
    String,
    Bool,
    Object,
    Null,
    ColorCode,
    TtfFile,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::Object => "object",
            Kind::Null => "null",
            Kind::ColorCode => "colorCode",
            Kind::TtfFile => "ttfFile",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Int => value.is_i64() || value.is_u64(),
            Kind::Float => value.is_f64(),
            Kind::String => value.is_string(),
            Kind::Bool => value.is_boolean(),
            Kind::Object => value.is_object(),
            Kind::Null => value.is_null(),
            Kind::ColorCode => is_color_code_value(value),
            Kind::TtfFile => value.as_str().is_some_and(|p| is_ttf_file(Path::new(p))),
        }
    }
}

/// Constraint applied on top of the kind check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Range {
    Any,
    /// Integer `>= n`.
    AtLeast(i64),
    /// Number in `(0, 1]`.
    Ratio,
    /// Number `> 0`.
    Positive,
    /// Object shaped like `{offset: [x, y], width, height, backgroundColor}`.
    PlotArea,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub kinds: &'static [Kind],
    pub range: Range,
}

impl Rule {
    const fn new(kinds: &'static [Kind], range: Range) -> Self {
        Self { kinds, range }
    }

    /// Human-readable expectation, e.g. `colorCode|null` or `int (>= 50)`.
    pub fn expected(&self) -> String {
        let kinds = self
            .kinds
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join("|");
        match self.range {
            Range::Any => kinds,
            Range::AtLeast(n) => format!("{kinds} (>= {n})"),
            Range::Ratio => format!("{kinds} (0.0 < v <= 1.0)"),
            Range::Positive => format!("{kinds} (> 0)"),
            Range::PlotArea => {
                "object {offset: [int, int], width: int, height: int, backgroundColor: colorCode|null}"
                    .to_string()
            }
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        if !self.kinds.iter().any(|k| k.matches(value)) {
            return false;
        }
        if value.is_null() {
            return true;
        }
        match self.range {
            Range::Any => true,
            Range::AtLeast(n) => value.as_i64().is_some_and(|v| v >= n),
            Range::Ratio => value.as_f64().is_some_and(|v| v > 0.0 && v <= 1.0),
            Range::Positive => value.as_f64().is_some_and(|v| v > 0.0),
            Range::PlotArea => is_plotarea_object(value),
        }
    }
}

const INT: &[Kind] = &[Kind::Int];
const NUMBER: &[Kind] = &[Kind::Int, Kind::Float];
const COLOR: &[Kind] = &[Kind::ColorCode, Kind::Null];
const BOOL: &[Kind] = &[Kind::Bool];
const STRING: &[Kind] = &[Kind::String];

/// The rule table.
pub fn rule(key: ConfigKey) -> Rule {
    use ConfigKey::*;
    match key {
        CanvasWidth => Rule::new(INT, Range::AtLeast(CANVAS_WIDTH_LIMIT_LOWER as i64)),
        CanvasHeight => Rule::new(INT, Range::AtLeast(CANVAS_HEIGHT_LIMIT_LOWER as i64)),
        FrameXRatio | FrameYRatio => Rule::new(NUMBER, Range::Ratio),
        Plotarea => Rule::new(&[Kind::Object], Range::PlotArea),
        CanvasBackgroundColor | AxisColor | GridColor | BarBackgroundColor | BarBorderColor
        | FrequencyPolygonColor | CrfPolygonColor | FontColor => Rule::new(COLOR, Range::Any),
        AxisWidth | GridWidth | BarBorderWidth | FrequencyPolygonWidth | CrfPolygonWidth => {
            Rule::new(INT, Range::AtLeast(1))
        }
        GridHeightPitch => Rule::new(NUMBER, Range::Positive),
        FontPath => Rule::new(&[Kind::TtfFile], Range::Any),
        FontSize => Rule::new(INT, Range::AtLeast(FONT_SIZE_LIMIT_LOWER as i64)),
        ShowBar | ShowGrid | ShowGridValues | ShowAxis | ShowFrequencyPolygon | ShowCrfPolygon
        | ShowFrequency => Rule::new(BOOL, Range::Any),
        LabelX | LabelY | Caption => Rule::new(STRING, Range::Any),
        LabelXOffsetX | LabelXOffsetY | LabelYOffsetX | LabelYOffsetY | CaptionOffsetX
        | CaptionOffsetY => Rule::new(INT, Range::Any),
    }
}

/// Check one value against its key's rule.
pub fn validate(key: ConfigKey, value: &Value) -> Result<(), ValidationError> {
    let rule = rule(key);
    if rule.accepts(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            key: key.name().to_string(),
            expected: rule.expected(),
        })
    }
}

/// An existing file whose extension is `ttf` (any case).
pub fn is_ttf_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf"))
}

fn is_plotarea_object(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.iter().all(|(k, v)| match k.as_str() {
        "offset" => v
            .as_array()
            .is_some_and(|a| a.len() == 2 && a.iter().all(|c| c.is_i64() || c.is_u64())),
        "width" | "height" => v.as_i64().is_some_and(|n| n > 0),
        "backgroundColor" => v.is_null() || is_color_code_value(v),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn kinds_are_exact() {
        assert!(Kind::Int.matches(&json!(3)));
        assert!(!Kind::Int.matches(&json!(3.0)));
        assert!(Kind::Float.matches(&json!(0.5)));
        assert!(!Kind::Float.matches(&json!(1)));
        assert!(!Kind::String.matches(&json!(null)));
        assert!(Kind::Object.matches(&json!({"width": 1})));
        assert!(!Kind::Object.matches(&json!([1, 2])));
    }

    #[test]
    fn color_rule_names_its_union() {
        let err = validate(ConfigKey::AxisColor, &json!("#12x456")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidValue {
                key: "axisColor".into(),
                expected: "colorCode|null".into()
            }
        );
        assert!(validate(ConfigKey::AxisColor, &json!(null)).is_ok());
        assert!(validate(ConfigKey::AxisColor, &json!("#abc")).is_ok());
    }

    #[test]
    fn ranges_apply_to_numbers() {
        assert!(validate(ConfigKey::CanvasWidth, &json!(50)).is_ok());
        assert!(validate(ConfigKey::CanvasWidth, &json!(49)).is_err());
        assert!(validate(ConfigKey::FrameXRatio, &json!(1)).is_ok());
        assert!(validate(ConfigKey::FrameXRatio, &json!(1.01)).is_err());
        assert!(validate(ConfigKey::FrameYRatio, &json!(0.0)).is_err());
        assert!(validate(ConfigKey::AxisWidth, &json!(0)).is_err());
        assert!(validate(ConfigKey::GridHeightPitch, &json!(0.5)).is_ok());
        assert!(validate(ConfigKey::FontSize, &json!(5)).is_err());
        assert!(validate(ConfigKey::LabelXOffsetY, &json!(-12)).is_ok());
    }

    #[test]
    fn plotarea_shape_is_checked() {
        let ok = json!({"offset": [120, 80], "width": 360, "height": 240, "backgroundColor": null});
        assert!(validate(ConfigKey::Plotarea, &ok).is_ok());
        assert!(validate(ConfigKey::Plotarea, &json!({"offset": [1]})).is_err());
        assert!(validate(ConfigKey::Plotarea, &json!({"width": 0})).is_err());
        assert!(validate(ConfigKey::Plotarea, &json!({"depth": 3})).is_err());
    }

    #[test]
    fn font_path_must_be_existing_ttf() {
        let dir = tempdir().unwrap();
        let ttf = dir.path().join("Face.TTF");
        let otf = dir.path().join("face.otf");
        File::create(&ttf).unwrap();
        File::create(&otf).unwrap();
        assert!(is_ttf_file(&ttf));
        assert!(!is_ttf_file(&otf));
        assert!(!is_ttf_file(&dir.path().join("missing.ttf")));
        let err = validate(ConfigKey::FontPath, &json!(otf.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().starts_with("fontPath: expected ttfFile"));
    }
}
