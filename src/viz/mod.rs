//! Histogram draw pipeline.
//!
//! [`DrawPipeline`] turns one frequency table plus one [`Config`] snapshot
//! into draw calls on any [`Canvas`], in a fixed layer order:
//!
//! - background and plotarea fill
//! - grid lines, then grid values
//! - bars, then axis
//! - frequency polygon and cumulative relative frequency polygon
//! - class boundary labels and frequency values
//! - x label, rotated y label, caption
//!
//! Every layer is skipped when its flag is off or its text is unset. The
//! canvas is only persisted by the caller after the whole pipeline succeeded.

pub mod canvas;
pub mod fonts;
mod raster;

pub use canvas::{Anchor, Canvas, DrawOp, FontSpec, HAlign, Layer, Scene, TaggedOp, VAlign};

use crate::color::parse_opt;
use crate::config::{Config, Label};
use crate::error::{DataError, Result};
use crate::frequency::FrequencyModel;
use crate::layout::Layout;
use crate::models::Parsed;
use crate::transform::Transformer;
use log::debug;

/// Geometry and data for one render call.
pub struct DrawPipeline<'a, M: FrequencyModel + ?Sized> {
    model: &'a M,
    config: &'a Config,
    parsed: Parsed,
    layout: Layout,
    transformer: Transformer,
}

impl<'a, M: FrequencyModel + ?Sized> DrawPipeline<'a, M> {
    /// Parse the model and derive all geometry. Fails on missing data or a
    /// degenerate viewport before anything is drawn.
    pub fn new(model: &'a M, config: &'a Config) -> Result<Self> {
        let parsed = model.parse();
        let layout = Layout::compute(&parsed, config)?;
        let transformer = Transformer::new(layout.viewport, &layout.plotarea)?;
        debug!(
            "layout: {} classes, plotarea {:?}, bar width {:.2}, grid pitch {}",
            parsed.classes.len(),
            layout.plotarea,
            layout.bar_width,
            layout.grid_height_pitch
        );
        Ok(Self {
            model,
            config,
            parsed,
            layout,
            transformer,
        })
    }

    /// Run every enabled layer on a fresh canvas of the configured size.
    pub fn render<C: Canvas>(&self) -> Result<C> {
        let mut canvas = C::create(self.layout.canvas_width, self.layout.canvas_height);
        let show = self.config.show;

        // ---- 0) Background ----
        self.draw_background(&mut canvas);

        // ---- 1) Grid ----
        if show.grid {
            self.draw_grid(&mut canvas);
        }
        if show.grid_values {
            self.draw_grid_values(&mut canvas);
        }

        // ---- 2) Bars and axis ----
        if show.bar {
            self.draw_bars(&mut canvas);
        }
        if show.axis {
            self.draw_axis(&mut canvas);
        }

        // ---- 3) Polygons ----
        if show.frequency_polygon {
            self.draw_frequency_polygon(&mut canvas)?;
        }
        if show.crf_polygon {
            self.draw_crf_polygon(&mut canvas)?;
        }

        // ---- 4) Numeric labels ----
        self.draw_class_labels(&mut canvas);
        if show.frequency {
            self.draw_frequencies(&mut canvas);
        }

        // ---- 5) Text labels ----
        self.draw_label_x(&mut canvas);
        self.draw_label_y(&mut canvas);
        self.draw_caption(&mut canvas);

        Ok(canvas)
    }

    fn font(&self) -> FontSpec {
        FontSpec {
            path: self.config.font_path.clone(),
            size: self.config.font_size,
            color: parse_opt(self.config.font_color.as_deref()),
        }
    }

    fn font_size(&self) -> f64 {
        self.config.font_size as f64
    }

    /// Canvas point at bar-slot column `x` for data value `y`.
    ///
    /// Columns come from the bar slots rather than the class bounds, so the
    /// polygons stay on their bars even when classes differ in width.
    fn canvas_point(&self, x: i32, y: f64) -> (i32, i32) {
        let py = self.transformer.y(y).round() as i32;
        (x, self.layout.plotarea.offset_y + py)
    }

    fn draw_background<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_layer(Layer::Background);
        if let Some(bg) = parse_opt(self.config.canvas_background_color.as_deref()) {
            canvas.fill(bg);
        }
        if let Some(bg) = parse_opt(self.config.plotarea.background_color.as_deref()) {
            let area = &self.layout.plotarea;
            canvas.draw_rectangle(
                (area.left(), area.top()),
                (area.width, area.height),
                Some(bg),
                None,
                0,
            );
        }
    }

    fn draw_grid<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_layer(Layer::Grid);
        let color = parse_opt(self.config.grid_color.as_deref());
        let width = self.config.grid_width;
        let (left, right) = (self.layout.base_x, self.layout.plotarea.right());
        let steps = self.layout.grid_steps();
        for v in &steps {
            let y = self.layout.value_y(*v);
            canvas.draw_line((left, y), (right, y), width, color);
        }
        let top = self.layout.value_y(self.layout.bar_max_value as f64);
        for x in [left, right] {
            canvas.draw_line((x, top), (x, self.layout.base_y), width, color);
        }
        debug!("grid: {} horizontal lines", steps.len());
    }

    fn draw_grid_values<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_layer(Layer::GridValues);
        let font = self.font();
        let fs = self.font_size();
        let x = self.layout.base_x - (fs * 1.1).round() as i32;
        for v in self.layout.grid_steps() {
            let y = self.layout.value_y(v) + (fs * 0.4).round() as i32;
            canvas.draw_text(
                &format_number(v),
                (x, y),
                &font,
                HAlign::Center,
                VAlign::Bottom,
                0,
            );
        }
    }

    fn draw_bars<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_layer(Layer::Bars);
        let background = parse_opt(self.config.bar_background_color.as_deref());
        let border = parse_opt(self.config.bar_border_color.as_deref());
        for (i, frequency) in self.parsed.frequencies.iter().enumerate() {
            let (x0, y0, x1, y1) = self.layout.bar_rect(i, *frequency);
            canvas.draw_rectangle(
                (x0, y0),
                ((x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32),
                background,
                border,
                self.config.bar_border_width,
            );
        }
        debug!("bars: {}", self.parsed.frequencies.len());
    }

    fn draw_axis<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_layer(Layer::Axis);
        let color = parse_opt(self.config.axis_color.as_deref());
        let width = self.config.axis_width;
        let origin = (self.layout.base_x, self.layout.base_y);
        canvas.draw_line(origin, (self.layout.plotarea.right(), origin.1), width, color);
        canvas.draw_line(origin, (origin.0, self.layout.plotarea.top()), width, color);
    }

    fn require_classes(&self, layer: &'static str) -> Result<()> {
        let got = self.parsed.classes.len();
        if got < 2 {
            return Err(DataError::TooFewClasses { layer, got }.into());
        }
        Ok(())
    }

    fn draw_frequency_polygon<C: Canvas>(&self, canvas: &mut C) -> Result<()> {
        self.require_classes("frequency polygon")?;
        canvas.set_layer(Layer::FrequencyPolygon);
        let color = parse_opt(self.config.frequency_polygon_color.as_deref());
        let points: Vec<(i32, i32)> = self
            .parsed
            .frequencies
            .iter()
            .enumerate()
            .map(|(i, f)| self.canvas_point(self.layout.bar_center(i), *f as f64))
            .collect();
        for pair in points.windows(2) {
            canvas.draw_line(pair[0], pair[1], self.config.frequency_polygon_width, color);
        }
        debug!("frequency polygon: {} segments", points.len() - 1);
        Ok(())
    }

    fn draw_crf_polygon<C: Canvas>(&self, canvas: &mut C) -> Result<()> {
        self.require_classes("cumulative relative frequency polygon")?;
        canvas.set_layer(Layer::CrfPolygon);
        let color = parse_opt(self.config.crf_polygon_color.as_deref());
        let y_max = self.transformer.viewport().y_max;
        let frequencies = &self.parsed.frequencies;
        let mut previous = 0.0;
        for i in 0..self.parsed.classes.len() {
            let crf = self.model.cumulative_relative_frequency(frequencies, i);
            let from = self.canvas_point(self.layout.bar_edge(i), y_max * previous);
            let to = self.canvas_point(self.layout.bar_edge(i + 1), y_max * crf);
            canvas.draw_line(from, to, self.config.crf_polygon_width, color);
            previous = crf;
        }
        debug!(
            "cumulative relative frequency polygon: {} segments",
            self.parsed.classes.len()
        );
        Ok(())
    }

    fn draw_class_labels<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_layer(Layer::ClassLabels);
        let font = self.font();
        let y = self.layout.base_y + (self.font_size() * 1.2).round() as i32;
        let Some(first) = self.parsed.classes.first() else {
            return;
        };
        let boundaries =
            std::iter::once(first.bottom).chain(self.parsed.classes.iter().map(|c| c.top));
        for (i, value) in boundaries.enumerate() {
            canvas.draw_text(
                &format_number(value),
                (self.layout.bar_edge(i), y),
                &font,
                HAlign::Center,
                VAlign::Bottom,
                0,
            );
        }
    }

    fn draw_frequencies<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_layer(Layer::FrequencyValues);
        let font = self.font();
        let lift = (self.font_size() * 0.6).round() as i32;
        for (i, frequency) in self.parsed.frequencies.iter().enumerate() {
            let x = self.layout.bar_center(i);
            let y = self.layout.value_y(*frequency as f64) - lift;
            canvas.draw_text(
                &frequency.to_string(),
                (x, y),
                &font,
                HAlign::Center,
                VAlign::Bottom,
                0,
            );
        }
    }

    fn draw_label_x<C: Canvas>(&self, canvas: &mut C) {
        let label = &self.config.label_x;
        let Some(text) = label.text() else { return };
        canvas.set_layer(Layer::LabelX);
        let (_, _, _, bottom) = self.layout.margins();
        let pos = (
            self.layout.canvas_width as i32 / 2,
            self.layout.base_y + bottom * 2 / 3,
        );
        draw_label(canvas, text, pos, label, &self.font());
    }

    /// Drawn upright on a margin-sized sub-canvas, turned counter-clockwise
    /// and placed centered on the left edge.
    fn draw_label_y<C: Canvas>(&self, canvas: &mut C) {
        let label = &self.config.label_y;
        let Some(text) = label.text() else { return };
        canvas.set_layer(Layer::LabelY);
        let (left, _, _, _) = self.layout.margins();
        let width = self.layout.canvas_height;
        let height = (left * 2 / 3).max(1) as u32;
        let mut sub = C::create(width, height);
        sub.set_layer(Layer::LabelY);
        let pos = (
            width as i32 / 2,
            (height as i32 + self.config.font_size as i32) / 2,
        );
        sub.draw_text(text, pos, &self.font(), HAlign::Center, VAlign::Bottom, 0);
        sub.rotate_ccw();
        canvas.place(sub, Anchor::Left, (label.offset_x, label.offset_y));
    }

    fn draw_caption<C: Canvas>(&self, canvas: &mut C) {
        let label = &self.config.caption;
        let Some(text) = label.text() else { return };
        canvas.set_layer(Layer::Caption);
        let (_, _, top, _) = self.layout.margins();
        let pos = (self.layout.canvas_width as i32 / 2, top * 2 / 3);
        draw_label(canvas, text, pos, label, &self.font());
    }
}

fn draw_label<C: Canvas>(
    canvas: &mut C,
    text: &str,
    pos: (i32, i32),
    label: &Label,
    font: &FontSpec,
) {
    canvas.draw_text(
        text,
        (pos.0 + label.offset_x, pos.1 + label.offset_y),
        font,
        HAlign::Center,
        VAlign::Bottom,
        0,
    );
}

/// Shortest decimal form, without float noise past six digits.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6 + 0.0;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HistogramError;
    use crate::models::Class;

    fn table() -> Parsed {
        Parsed::new(
            vec![Class::new(0.0, 5.0), Class::new(5.0, 10.0), Class::new(10.0, 15.0)],
            vec![2, 5, 3],
        )
    }

    fn render(parsed: &Parsed, config: &Config) -> Result<Scene> {
        DrawPipeline::new(parsed, config)?.render::<Scene>()
    }

    fn lines(scene: &Scene, layer: Layer) -> Vec<((i32, i32), (i32, i32))> {
        scene
            .layer_ops(layer)
            .filter_map(|op| match op {
                DrawOp::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    fn texts(scene: &Scene, layer: Layer) -> Vec<String> {
        scene
            .layer_ops(layer)
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_layers_in_order() {
        let scene = render(&table(), &Config::default()).unwrap();
        let mut layers: Vec<Layer> = scene.ops().iter().map(|t| t.layer).collect();
        layers.dedup();
        assert_eq!(
            layers,
            vec![
                Layer::Background,
                Layer::Grid,
                Layer::GridValues,
                Layer::Bars,
                Layer::Axis,
                Layer::ClassLabels
            ]
        );
    }

    #[test]
    fn grid_has_one_line_per_step_plus_bounds() {
        let scene = render(&table(), &Config::default()).unwrap();
        let grid = lines(&scene, Layer::Grid);
        // steps 0, 2, 4, 6 plus the two verticals
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], ((40, 255), (360, 255)));
        assert_eq!(grid[3], ((40, 45), (360, 45)));
        assert_eq!(texts(&scene, Layer::GridValues), vec!["0", "2", "4", "6"]);
    }

    #[test]
    fn class_labels_cover_every_boundary() {
        let scene = render(&table(), &Config::default()).unwrap();
        assert_eq!(texts(&scene, Layer::ClassLabels), vec!["0", "5", "10", "15"]);
    }

    #[test]
    fn polygons_draw_expected_segment_counts() {
        let mut config = Config::default();
        config.show.frequency_polygon = true;
        config.show.crf_polygon = true;
        let scene = render(&table(), &config).unwrap();
        let fp = lines(&scene, Layer::FrequencyPolygon);
        let crf = lines(&scene, Layer::CrfPolygon);
        assert_eq!(fp.len(), 2);
        assert_eq!(crf.len(), 3);
        // center of the first bar at frequency 2
        assert_eq!(fp[0].0, (40 + 53, 255 - 70));
        // cumulative polygon starts at the origin and ends at the top-right
        assert_eq!(crf[0].0, (40, 255));
        assert_eq!(crf[2].1, (360, 45));
        assert_eq!(crf[0].1, crf[1].0);
    }

    #[test]
    fn polygons_follow_bars_when_class_widths_differ() {
        let mut config = Config::default();
        config.show.frequency_polygon = true;
        config.show.crf_polygon = true;
        let uneven = Parsed::new(vec![Class::new(0.0, 1.0), Class::new(1.0, 10.0)], vec![1, 1]);
        let scene = render(&uneven, &config).unwrap();

        let bars: Vec<_> = scene
            .layer_ops(Layer::Bars)
            .filter_map(|op| match op {
                DrawOp::Rectangle { origin, size, .. } => {
                    Some((origin.0, origin.0 + size.0 as i32))
                }
                _ => None,
            })
            .collect();
        assert_eq!(bars, vec![(40, 200), (200, 360)]);

        // y max is 2, so frequency 1 sits halfway up the 210 px plotarea
        let fp = lines(&scene, Layer::FrequencyPolygon);
        assert_eq!(fp, vec![((120, 150), (280, 150))]);
        let crf = lines(&scene, Layer::CrfPolygon);
        assert_eq!(crf, vec![((40, 255), (200, 150)), ((200, 150), (360, 45))]);

        let labels: Vec<(String, i32)> = scene
            .layer_ops(Layer::ClassLabels)
            .filter_map(|op| match op {
                DrawOp::Text { text, pos, .. } => Some((text.clone(), pos.0)),
                _ => None,
            })
            .collect();
        assert_eq!(labels[1], ("1".to_string(), crf[0].1.0));
    }

    #[test]
    fn polygons_need_two_classes() {
        let single = Parsed::new(vec![Class::new(0.0, 5.0)], vec![4]);
        for toggle in [0, 1] {
            let mut config = Config::default();
            if toggle == 0 {
                config.show.frequency_polygon = true;
            } else {
                config.show.crf_polygon = true;
            }
            let err = render(&single, &config).unwrap_err();
            assert!(matches!(
                err,
                HistogramError::Data(DataError::TooFewClasses { got: 1, .. })
            ));
        }
        assert!(render(&single, &Config::default()).is_ok());
    }

    #[test]
    fn labels_and_frequencies_follow_flags_and_offsets() {
        let mut config = Config::default();
        config.show.frequency = true;
        config.label_x.text = Some("Score".into());
        config.caption.text = Some("Results".into());
        config.caption.offset_x = 10;
        config.label_y.text = Some(String::new());
        let scene = render(&table(), &config).unwrap();
        assert_eq!(texts(&scene, Layer::FrequencyValues), vec!["2", "5", "3"]);
        assert_eq!(texts(&scene, Layer::LabelX), vec!["Score"]);
        assert_eq!(scene.layer_ops(Layer::LabelY).count(), 0);
        let caption = scene.layer_ops(Layer::Caption).next().unwrap();
        assert!(matches!(caption, DrawOp::Text { pos: (210, 30), .. }));
    }

    #[test]
    fn y_label_is_a_rotated_sub_scene_on_the_left() {
        let mut config = Config::default();
        config.label_y.text = Some("Count".into());
        let scene = render(&table(), &config).unwrap();
        let placed: Vec<_> = scene.layer_ops(Layer::LabelY).collect();
        assert_eq!(placed.len(), 1);
        let DrawOp::Place {
            scene: sub, anchor, ..
        } = placed[0]
        else {
            panic!("expected a placed sub-scene");
        };
        assert_eq!(*anchor, Anchor::Left);
        assert_eq!(sub.quarter_turns(), 1);
        assert_eq!(sub.size(), (26, 300));
        assert_eq!(texts(sub, Layer::LabelY), vec!["Count"]);
    }

    #[test]
    fn toggling_one_layer_leaves_the_others_identical() {
        let config = Config::default();
        let mut toggled = config.clone();
        toggled.show.frequency_polygon = true;
        let a = render(&table(), &config).unwrap();
        let b = render(&table(), &toggled).unwrap();
        for layer in [
            Layer::Background,
            Layer::Grid,
            Layer::GridValues,
            Layer::Bars,
            Layer::Axis,
            Layer::ClassLabels,
        ] {
            assert!(a.layer_ops(layer).eq(b.layer_ops(layer)), "{layer:?} changed");
        }
        assert_eq!(a.layer_ops(Layer::FrequencyPolygon).count(), 0);
        assert_eq!(b.layer_ops(Layer::FrequencyPolygon).count(), 2);
    }

    #[test]
    fn transparent_background_emits_no_fill() {
        let mut config = Config::default();
        config.canvas_background_color = None;
        let scene = render(&table(), &config).unwrap();
        assert_eq!(scene.background(), None);
    }

    #[test]
    fn numbers_drop_float_noise() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(6.0), "6");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
    }
}
