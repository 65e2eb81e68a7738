//! freqplot
//!
//! A small Rust library for rendering histogram images from frequency tables.
//! Pairs with the `freqplot` CLI.
//!
//! ### Features
//! - Bars, grid with values, axis, class boundary labels
//! - Optional frequency polygon, cumulative relative frequency polygon and
//!   per-bar frequency values
//! - X label, rotated Y label and caption with pixel offsets
//! - Validated setters and a flat JSON config map (`canvasWidth`, `axisColor`, ...)
//! - PNG (with optional transparent background) or SVG output
//!
//! ### Example
//! ```no_run
//! use freqplot::Histogram;
//!
//! let mut hist = Histogram::new();
//! hist.ft.set_class_range(5.0)?.set_values(&[1.0, 3.0, 6.0, 7.0, 9.0, 11.0, 14.0])?;
//! hist.label_x("Score").label_y("Count").frequency_on();
//! hist.create("scores.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod frequency;
pub mod histogram;
pub mod layout;
pub mod models;
pub mod storage;
pub mod transform;
pub mod viz;

pub use config::{Config, ConfigKey};
pub use error::{
    ConfigError, DataError, GeometryError, HistogramError, RenderError, ValidationError,
};
pub use frequency::{FrequencyModel, FrequencyTable};
pub use histogram::Histogram;
pub use models::{Class, Parsed, PlotArea, Viewport};
pub use viz::{Canvas, DrawPipeline, Scene};
