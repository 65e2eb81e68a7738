//! The user-facing histogram handle: frequency model + configuration,
//! validated builder-style setters, and `create` to write the image.

use crate::color::is_color_code;
use crate::config::rules::{
    CANVAS_HEIGHT_LIMIT_LOWER, CANVAS_WIDTH_LIMIT_LOWER, FONT_SIZE_LIMIT_LOWER, is_ttf_file,
};
use crate::config::{Config, ConfigKey, PlotAreaSpec};
use crate::error::{ConfigError, Result, ValidationError};
use crate::frequency::{FrequencyModel, FrequencyTable};
use crate::viz::{DrawPipeline, Scene};
use log::info;
use serde_json::{Map, Value};
use std::path::Path;

fn check_color(code: &str) -> Result<(), ValidationError> {
    if is_color_code(code) {
        Ok(())
    } else {
        Err(ValidationError::ColorCode(code.to_string()))
    }
}

fn check_width(width: u32, what: &'static str) -> Result<(), ValidationError> {
    if width == 0 {
        return Err(ValidationError::NonPositiveWidth(what));
    }
    Ok(())
}

fn check_ratio(ratio: f64) -> Result<(), ValidationError> {
    if ratio > 0.0 && ratio <= 1.0 {
        Ok(())
    } else {
        Err(ValidationError::Ratio(ratio))
    }
}

/// Validates a `(width, optional color)` pair, then stores both. A `None`
/// color keeps the current one.
fn set_stroke(
    width: u32,
    color: Option<&str>,
    what: &'static str,
    width_slot: &mut u32,
    color_slot: &mut Option<String>,
) -> Result<(), ValidationError> {
    check_width(width, what)?;
    if let Some(color) = color {
        check_color(color)?;
    }
    *width_slot = width;
    if let Some(color) = color {
        *color_slot = Some(color.to_string());
    }
    Ok(())
}

/// Histogram renderer over any [`FrequencyModel`].
///
/// ```no_run
/// use freqplot::Histogram;
///
/// let mut hist = Histogram::new();
/// hist.ft.set_class_range(10.0)?.set_values(&[12.0, 25.0, 31.0, 38.0, 47.0])?;
/// hist.resize(600, 400)?
///     .fp(2, Some("#cc3333"))?
///     .fp_on()
///     .caption("Scores")
///     .create("scores.png")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Histogram<M: FrequencyModel = FrequencyTable> {
    /// Data source; mutate it freely between renders.
    pub ft: M,
    config: Config,
}

impl Histogram<FrequencyTable> {
    pub fn new() -> Self {
        Self::with_model(FrequencyTable::new())
    }
}

impl Default for Histogram<FrequencyTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FrequencyModel> Histogram<M> {
    pub fn with_model(model: M) -> Self {
        Self::with_config(model, Config::default())
    }

    /// Start from an already resolved configuration.
    pub fn with_config(model: M, config: Config) -> Self {
        Self { ft: model, config }
    }

    pub fn settings(&self) -> &Config {
        &self.config
    }

    /// Canvas `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.canvas_width, self.config.canvas_height)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<&mut Self, ValidationError> {
        if width < CANVAS_WIDTH_LIMIT_LOWER {
            return Err(ValidationError::BelowLimit {
                dimension: "width",
                limit: CANVAS_WIDTH_LIMIT_LOWER,
            });
        }
        if height < CANVAS_HEIGHT_LIMIT_LOWER {
            return Err(ValidationError::BelowLimit {
                dimension: "height",
                limit: CANVAS_HEIGHT_LIMIT_LOWER,
            });
        }
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        Ok(self)
    }

    /// Plotarea share of the canvas, each in `(0, 1]`.
    pub fn frame(&mut self, x_ratio: f64, y_ratio: f64) -> Result<&mut Self, ValidationError> {
        check_ratio(x_ratio)?;
        check_ratio(y_ratio)?;
        self.config.frame_x_ratio = x_ratio;
        self.config.frame_y_ratio = y_ratio;
        Ok(self)
    }

    pub fn bgcolor(&mut self, color: &str) -> Result<&mut Self, ValidationError> {
        check_color(color)?;
        self.config.canvas_background_color = Some(color.to_string());
        Ok(self)
    }

    /// No canvas fill; uncovered pixels stay transparent.
    pub fn transparent(&mut self) -> &mut Self {
        self.config.canvas_background_color = None;
        self
    }

    pub fn axis(&mut self, width: u32, color: Option<&str>) -> Result<&mut Self, ValidationError> {
        let cfg = &mut self.config;
        set_stroke(width, color, "axis width", &mut cfg.axis_width, &mut cfg.axis_color)?;
        Ok(self)
    }

    pub fn grid(&mut self, width: u32, color: Option<&str>) -> Result<&mut Self, ValidationError> {
        let cfg = &mut self.config;
        set_stroke(width, color, "grid width", &mut cfg.grid_width, &mut cfg.grid_color)?;
        Ok(self)
    }

    /// Bar fill color.
    pub fn color(&mut self, color: &str) -> Result<&mut Self, ValidationError> {
        check_color(color)?;
        self.config.bar_background_color = Some(color.to_string());
        Ok(self)
    }

    /// Bar border.
    pub fn border(&mut self, width: u32, color: Option<&str>) -> Result<&mut Self, ValidationError> {
        let cfg = &mut self.config;
        set_stroke(
            width,
            color,
            "border width",
            &mut cfg.bar_border_width,
            &mut cfg.bar_border_color,
        )?;
        Ok(self)
    }

    /// Frequency polygon stroke.
    pub fn fp(&mut self, width: u32, color: Option<&str>) -> Result<&mut Self, ValidationError> {
        let cfg = &mut self.config;
        set_stroke(
            width,
            color,
            "frequency polygon width",
            &mut cfg.frequency_polygon_width,
            &mut cfg.frequency_polygon_color,
        )?;
        Ok(self)
    }

    /// Cumulative relative frequency polygon stroke.
    pub fn crfp(&mut self, width: u32, color: Option<&str>) -> Result<&mut Self, ValidationError> {
        let cfg = &mut self.config;
        set_stroke(
            width,
            color,
            "cumulative relative frequency polygon width",
            &mut cfg.crf_polygon_width,
            &mut cfg.crf_polygon_color,
        )?;
        Ok(self)
    }

    pub fn font_path(&mut self, path: &str) -> Result<&mut Self, ValidationError> {
        let p = Path::new(path);
        if !p.is_file() {
            return Err(ValidationError::FontNotFound(path.to_string()));
        }
        if !is_ttf_file(p) {
            return Err(ValidationError::FontExtension(path.to_string()));
        }
        self.config.font_path = path.to_string();
        Ok(self)
    }

    pub fn font_size(&mut self, size: u32) -> Result<&mut Self, ValidationError> {
        if size < FONT_SIZE_LIMIT_LOWER {
            return Err(ValidationError::FontSize {
                min: FONT_SIZE_LIMIT_LOWER,
                got: size,
            });
        }
        self.config.font_size = size;
        Ok(self)
    }

    pub fn font_color(&mut self, color: &str) -> Result<&mut Self, ValidationError> {
        check_color(color)?;
        self.config.font_color = Some(color.to_string());
        Ok(self)
    }

    /// Explicit plotarea geometry; parts left `None` keep following the frame ratios.
    pub fn plotarea(&mut self, spec: PlotAreaSpec) -> Result<&mut Self, ValidationError> {
        if spec.width == Some(0) {
            return Err(ValidationError::NonPositiveWidth("plotarea width"));
        }
        if spec.height == Some(0) {
            return Err(ValidationError::NonPositiveWidth("plotarea height"));
        }
        if let Some(color) = spec.background_color.as_deref() {
            check_color(color)?;
        }
        self.config.plotarea = spec;
        Ok(self)
    }

    pub fn label_x(&mut self, text: impl Into<String>) -> &mut Self {
        self.config.label_x.text = Some(text.into());
        self
    }

    pub fn label_x_offset(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.config.label_x.offset_x = dx;
        self.config.label_x.offset_y = dy;
        self
    }

    pub fn label_y(&mut self, text: impl Into<String>) -> &mut Self {
        self.config.label_y.text = Some(text.into());
        self
    }

    pub fn label_y_offset(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.config.label_y.offset_x = dx;
        self.config.label_y.offset_y = dy;
        self
    }

    pub fn caption(&mut self, text: impl Into<String>) -> &mut Self {
        self.config.caption.text = Some(text.into());
        self
    }

    pub fn caption_offset(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.config.caption.offset_x = dx;
        self.config.caption.offset_y = dy;
        self
    }

    pub fn bar_on(&mut self) -> &mut Self {
        self.config.show.bar = true;
        self
    }

    pub fn bar_off(&mut self) -> &mut Self {
        self.config.show.bar = false;
        self
    }

    pub fn fp_on(&mut self) -> &mut Self {
        self.config.show.frequency_polygon = true;
        self
    }

    pub fn fp_off(&mut self) -> &mut Self {
        self.config.show.frequency_polygon = false;
        self
    }

    pub fn crfp_on(&mut self) -> &mut Self {
        self.config.show.crf_polygon = true;
        self
    }

    pub fn crfp_off(&mut self) -> &mut Self {
        self.config.show.crf_polygon = false;
        self
    }

    pub fn frequency_on(&mut self) -> &mut Self {
        self.config.show.frequency = true;
        self
    }

    pub fn frequency_off(&mut self) -> &mut Self {
        self.config.show.frequency = false;
        self
    }

    pub fn grid_on(&mut self) -> &mut Self {
        self.config.show.grid = true;
        self
    }

    pub fn grid_off(&mut self) -> &mut Self {
        self.config.show.grid = false;
        self
    }

    pub fn grid_values_on(&mut self) -> &mut Self {
        self.config.show.grid_values = true;
        self
    }

    pub fn grid_values_off(&mut self) -> &mut Self {
        self.config.show.grid_values = false;
        self
    }

    pub fn axis_on(&mut self) -> &mut Self {
        self.config.show.axis = true;
        self
    }

    pub fn axis_off(&mut self) -> &mut Self {
        self.config.show.axis = false;
        self
    }

    /// Bulk apply; see [`Config::apply`]. Either every recognized key is
    /// applied or none is.
    pub fn config(&mut self, map: &Map<String, Value>) -> Result<&mut Self, ValidationError> {
        self.config.apply(map)?;
        Ok(self)
    }

    /// Load a flat JSON object from `path` and bulk apply it.
    pub fn config_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: shown.clone(),
            reason: e.to_string(),
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| ConfigError::File {
            path: shown.clone(),
            reason: e.to_string(),
        })?;
        let Value::Object(map) = value else {
            return Err(ConfigError::NotAnObject(shown).into());
        };
        self.config.apply(&map)?;
        Ok(self)
    }

    /// Current value of one config key.
    pub fn get_config(&self, key: &str) -> Result<Value, ConfigError> {
        let key: ConfigKey = key.parse()?;
        Ok(self.config.get(key))
    }

    /// Every config key with its current value.
    pub fn config_snapshot(&self) -> Map<String, Value> {
        self.config.snapshot()
    }

    /// Run the draw pipeline into a recorded scene without persisting it.
    pub fn render(&self) -> Result<Scene> {
        DrawPipeline::new(&self.ft, &self.config)?.render::<Scene>()
    }

    /// Render and write the image to `path` (`.svg` for SVG, otherwise PNG).
    /// Nothing is written when any step fails.
    pub fn create<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyOutputPath.into());
        }
        let scene = self.render()?;
        scene.save(path)?;
        info!("Wrote histogram to {}", path.display());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DataError, HistogramError};
    use crate::viz::Layer;
    use serde_json::json;

    fn sample() -> Histogram {
        let mut hist = Histogram::new();
        hist.ft
            .set_class_range(5.0)
            .unwrap()
            .set_values(&[1.0, 3.0, 6.0, 7.0, 8.0, 9.0, 9.5, 11.0, 12.0, 14.0])
            .unwrap();
        hist
    }

    #[test]
    fn resize_round_trips_and_names_the_limit() {
        let mut hist = Histogram::new();
        hist.resize(50, 640).unwrap();
        assert_eq!(hist.size(), (50, 640));
        let err = hist.resize(49, 300).unwrap_err();
        assert_eq!(err.to_string(), "width is below the lower limit 50");
        let err = hist.resize(300, 10).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::BelowLimit { dimension: "height", limit: 50 }
        ));
        assert_eq!(hist.size(), (50, 640));
    }

    #[test]
    fn frame_rejects_out_of_range_without_mutation() {
        let mut hist = Histogram::new();
        hist.frame(1.0, 0.25).unwrap();
        assert_eq!(hist.get_config("frameXRatio").unwrap(), json!(1.0));
        assert_eq!(hist.get_config("frameYRatio").unwrap(), json!(0.25));
        for (x, y) in [(0.0, 0.5), (0.5, 1.5), (-0.1, 0.5)] {
            assert!(matches!(hist.frame(x, y), Err(ValidationError::Ratio(_))));
        }
        assert_eq!(hist.settings().frame_x_ratio, 1.0);
        assert_eq!(hist.settings().frame_y_ratio, 0.25);
    }

    #[test]
    fn stroke_setters_keep_color_when_omitted() {
        let mut hist = Histogram::new();
        hist.axis(3, None).unwrap().grid(2, Some("#abc")).unwrap();
        assert_eq!(hist.settings().axis_width, 3);
        assert_eq!(hist.settings().axis_color.as_deref(), Some("#666666"));
        assert_eq!(hist.settings().grid_color.as_deref(), Some("#abc"));
        assert!(matches!(
            hist.border(0, None),
            Err(ValidationError::NonPositiveWidth(_))
        ));
        assert!(matches!(
            hist.fp(2, Some("red")),
            Err(ValidationError::ColorCode(_))
        ));
        assert_eq!(hist.settings().frequency_polygon_color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn font_setters_validate() {
        let mut hist = Histogram::new();
        assert!(matches!(
            hist.font_path("/nonexistent/face.ttf"),
            Err(ValidationError::FontNotFound(_))
        ));
        assert!(matches!(
            hist.font_size(5),
            Err(ValidationError::FontSize { min: 6, got: 5 })
        ));
        hist.font_size(6).unwrap().font_color("#000").unwrap();
        assert_eq!(hist.get_config("fontSize").unwrap(), json!(6));
    }

    #[test]
    fn unknown_keys_are_typed_errors() {
        let hist = Histogram::new();
        assert_eq!(
            hist.get_config("imageDriver"),
            Err(ConfigError::UnknownKey("imageDriver".into()))
        );
        assert_eq!(hist.config_snapshot().len(), ConfigKey::ALL.len());
    }

    #[test]
    fn bulk_config_failure_names_key_and_type() {
        let mut hist = Histogram::new();
        let map = json!({"axisColor": "#12x456"}).as_object().cloned().unwrap();
        let err = hist.config(&map).unwrap_err();
        assert!(err.to_string().contains("axisColor"));
        assert!(err.to_string().contains("colorCode|null"));
    }

    #[test]
    fn render_without_data_fails() {
        let hist = Histogram::new();
        assert!(matches!(
            hist.render(),
            Err(HistogramError::Data(DataError::MissingClasses))
        ));
    }

    #[test]
    fn empty_output_path_is_rejected() {
        let mut hist = sample();
        assert!(matches!(
            hist.create(""),
            Err(HistogramError::Validation(ValidationError::EmptyOutputPath))
        ));
    }

    #[test]
    fn toggles_flow_into_the_scene() {
        let mut hist = sample();
        hist.bar_off().fp_on().crfp_on().frequency_on();
        let scene = hist.render().unwrap();
        assert_eq!(scene.layer_ops(Layer::Bars).count(), 0);
        assert_eq!(scene.layer_ops(Layer::FrequencyPolygon).count(), 2);
        assert_eq!(scene.layer_ops(Layer::CrfPolygon).count(), 3);
        assert_eq!(scene.layer_ops(Layer::FrequencyValues).count(), 3);
    }
}
