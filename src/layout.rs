//! Render-time geometry derived from the current table and configuration.
//!
//! Nothing here is cached: [`Layout::compute`] runs once per render call.

use crate::config::Config;
use crate::error::DataError;
use crate::models::{Parsed, PlotArea, Viewport};

/// At most this many grid intervals from the adaptive pitch.
const GRID_DIVISIONS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub plotarea: PlotArea,
    pub viewport: Viewport,
    /// Canvas x of the vertical axis.
    pub base_x: i32,
    /// Canvas y of the horizontal axis (baseline).
    pub base_y: i32,
    pub bar_width: f64,
    /// Pixels per unit of frequency.
    pub bar_height_pitch: f64,
    /// `max_frequency + 1`, the top of the value range.
    pub bar_max_value: u64,
    pub grid_height_pitch: f64,
}

impl Layout {
    pub fn compute(parsed: &Parsed, config: &Config) -> Result<Self, DataError> {
        if parsed.classes.is_empty() {
            return Err(DataError::MissingClasses);
        }
        if parsed.frequencies.is_empty() {
            return Err(DataError::MissingFrequencies);
        }
        if parsed.classes.len() != parsed.frequencies.len() {
            return Err(DataError::LengthMismatch {
                classes: parsed.classes.len(),
                frequencies: parsed.frequencies.len(),
            });
        }
        let max_frequency = parsed.max_frequency().unwrap_or(0);
        let bar_max_value = max_frequency + 1;
        let viewport =
            Viewport::for_table(&parsed.classes, max_frequency).ok_or(DataError::MissingClasses)?;

        let plotarea = resolve_plotarea(config);
        let bar_width = plotarea.width as f64 / parsed.classes.len() as f64;
        let bar_height_pitch = plotarea.height as f64 / bar_max_value as f64;
        let grid_height_pitch = config
            .grid_height_pitch
            .max((bar_max_value as f64 / GRID_DIVISIONS).ceil());

        Ok(Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            plotarea,
            viewport,
            base_x: plotarea.left(),
            base_y: plotarea.bottom(),
            bar_width,
            bar_height_pitch,
            bar_max_value,
            grid_height_pitch,
        })
    }

    /// Values at which horizontal grid lines sit: `0, pitch, 2*pitch, ... <= bar_max_value`.
    pub fn grid_steps(&self) -> Vec<f64> {
        let max = self.bar_max_value as f64;
        let mut steps = Vec::new();
        let mut i = 0usize;
        loop {
            let v = i as f64 * self.grid_height_pitch;
            if v > max + 1e-9 {
                break;
            }
            steps.push(v);
            i += 1;
        }
        steps
    }

    /// Canvas x of the left edge of bar `index` (`index == count` gives the right edge of the last bar).
    pub fn bar_edge(&self, index: usize) -> i32 {
        self.base_x + (index as f64 * self.bar_width).round() as i32
    }

    /// Canvas x of the middle of bar `index`.
    pub fn bar_center(&self, index: usize) -> i32 {
        self.base_x + ((index as f64 + 0.5) * self.bar_width).round() as i32
    }

    /// Canvas y of a frequency value.
    pub fn value_y(&self, value: f64) -> i32 {
        self.base_y - (value * self.bar_height_pitch).round() as i32
    }

    /// Bar rectangle as `(x0, y0, x1, y1)` with `y0` the top.
    pub fn bar_rect(&self, index: usize, frequency: u64) -> (i32, i32, i32, i32) {
        (
            self.bar_edge(index),
            self.value_y(frequency as f64),
            self.bar_edge(index + 1),
            self.base_y,
        )
    }

    /// Left, right, top and bottom margins around the plotarea.
    pub fn margins(&self) -> (i32, i32, i32, i32) {
        (
            self.plotarea.left(),
            self.canvas_width as i32 - self.plotarea.right(),
            self.plotarea.top(),
            self.canvas_height as i32 - self.plotarea.bottom(),
        )
    }
}

/// Explicit plotarea parts win; the rest comes from the frame ratios,
/// centered on the canvas.
pub fn resolve_plotarea(config: &Config) -> PlotArea {
    let derived_w = (config.canvas_width as f64 * config.frame_x_ratio).round() as u32;
    let derived_h = (config.canvas_height as f64 * config.frame_y_ratio).round() as u32;
    let width = config.plotarea.width.unwrap_or(derived_w);
    let height = config.plotarea.height.unwrap_or(derived_h);
    let (offset_x, offset_y) = config.plotarea.offset.unwrap_or((
        (config.canvas_width as i32 - derived_w as i32) / 2,
        (config.canvas_height as i32 - derived_h as i32) / 2,
    ));
    PlotArea {
        offset_x,
        offset_y,
        width,
        height,
    }
}
