use serde::{Deserialize, Serialize};

/// A numeric bin `[bottom, top)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub bottom: f64,
    pub top: f64,
}

impl Class {
    pub fn new(bottom: f64, top: f64) -> Self {
        Self { bottom, top }
    }
}

/// Output of [`crate::FrequencyModel::parse`]: classes and their index-aligned frequencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parsed {
    #[serde(rename = "Classes")]
    pub classes: Vec<Class>,
    #[serde(rename = "Frequencies")]
    pub frequencies: Vec<u64>,
}

impl Parsed {
    pub fn new(classes: Vec<Class>, frequencies: Vec<u64>) -> Self {
        Self {
            classes,
            frequencies,
        }
    }

    pub fn max_frequency(&self) -> Option<u64> {
        self.frequencies.iter().copied().max()
    }
}

/// Data-space rectangle being visualized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// x spans the first class's bottom to the last class's top, y spans `[0, max + 1]`.
    pub fn for_table(classes: &[Class], max_frequency: u64) -> Option<Self> {
        let first = classes.first()?;
        let last = classes.last()?;
        Some(Self {
            x_min: first.bottom,
            x_max: last.top,
            y_min: 0.0,
            y_max: (max_frequency + 1) as f64,
        })
    }
}

/// Pixel rectangle inside the canvas where data is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
}

impl PlotArea {
    pub fn left(&self) -> i32 {
        self.offset_x
    }

    pub fn right(&self) -> i32 {
        self.offset_x + self.width as i32
    }

    pub fn top(&self) -> i32 {
        self.offset_y
    }

    pub fn bottom(&self) -> i32 {
        self.offset_y + self.height as i32
    }
}
