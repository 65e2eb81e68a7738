//! Error taxonomy for configuration, data, geometry and rendering failures.
//!
//! Every fallible operation in the crate returns one of these. A render call
//! either completes (image persisted) or fails with the first error hit, in
//! which case nothing is written.

use thiserror::Error;

/// A configuration value was rejected at the point of mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{key}: expected {expected}")]
    InvalidValue { key: String, expected: String },
    #[error("{dimension} is below the lower limit {limit}")]
    BelowLimit { dimension: &'static str, limit: u32 },
    #[error("ratio must be: 0.0 < ratio <= 1.0 (got {0})")]
    Ratio(f64),
    #[error("{0} must be more than zero")]
    NonPositiveWidth(&'static str),
    #[error("invalid color code {0:?}: expected '#rgb' or '#rrggbb'")]
    ColorCode(String),
    #[error("font file does not exist: {0}")]
    FontNotFound(String),
    #[error("font file must have a .ttf extension: {0}")]
    FontExtension(String),
    #[error("font size must be at least {min} (got {got})")]
    FontSize { min: u32, got: u32 },
    #[error("specify a file path to save the image")]
    EmptyOutputPath,
}

/// The frequency table handed to a render call is unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("classes not found")]
    MissingClasses,
    #[error("frequencies not found")]
    MissingFrequencies,
    #[error("{classes} classes but {frequencies} frequencies")]
    LengthMismatch { classes: usize, frequencies: usize },
    #[error("{layer} needs at least 2 classes (got {got})")]
    TooFewClasses { layer: &'static str, got: usize },
    #[error("class range must be positive (got {0})")]
    ClassRange(f64),
    #[error("data value for {key:?} is not a finite number")]
    NotNumeric { key: String },
    #[error("class range {range} splits the data into more than {limit} classes")]
    TooManyClasses { range: f64, limit: usize },
}

/// Coordinate mapping cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("degenerate {axis}-axis range: min == max == {value}")]
    DegenerateRange { axis: char, value: f64 },
}

/// Rasterizing or persisting the finished canvas failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing backend error: {0}")]
    Backend(String),
    #[error("unsupported output format for {0}: expected .png or .svg")]
    UnsupportedFormat(String),
    #[error("cannot load font {path}: {reason}")]
    Font { path: String, reason: String },
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Config lookup or config file failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown config key {0:?}")]
    UnknownKey(String),
    #[error("cannot load config file {path}: {reason}")]
    File { path: String, reason: String },
    #[error("config file {0} must hold a JSON object")]
    NotAnObject(String),
}

/// Top-level error returned by [`crate::Histogram`] operations.
#[derive(Debug, Error)]
pub enum HistogramError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = HistogramError> = std::result::Result<T, E>;
