//! Data space to plotarea pixel mapping.
//!
//! Pixel coordinates are relative to the plotarea origin (top-left). Data y
//! grows upward, pixel y grows downward, so the y scale is inverted.

use crate::error::GeometryError;
use crate::models::{PlotArea, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformer {
    viewport: Viewport,
    width: f64,
    height: f64,
}

impl Transformer {
    /// Fails when either viewport axis has zero extent.
    pub fn new(viewport: Viewport, plotarea: &PlotArea) -> Result<Self, GeometryError> {
        if viewport.x_max == viewport.x_min {
            return Err(GeometryError::DegenerateRange {
                axis: 'x',
                value: viewport.x_min,
            });
        }
        if viewport.y_max == viewport.y_min {
            return Err(GeometryError::DegenerateRange {
                axis: 'y',
                value: viewport.y_min,
            });
        }
        Ok(Self {
            viewport,
            width: plotarea.width as f64,
            height: plotarea.height as f64,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn x(&self, x: f64) -> f64 {
        (x - self.viewport.x_min) / (self.viewport.x_max - self.viewport.x_min) * self.width
    }

    pub fn y(&self, y: f64) -> f64 {
        self.height
            - (y - self.viewport.y_min) / (self.viewport.y_max - self.viewport.y_min) * self.height
    }

    pub fn coord(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x(x), self.y(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(width: u32, height: u32) -> PlotArea {
        PlotArea {
            offset_x: 40,
            offset_y: 45,
            width,
            height,
        }
    }

    #[test]
    fn corners_map_to_plotarea_corners() {
        let vp = Viewport {
            x_min: 0.0,
            x_max: 15.0,
            y_min: 0.0,
            y_max: 6.0,
        };
        for (w, h) in [(320, 210), (1, 1), (999, 17)] {
            let t = Transformer::new(vp, &area(w, h)).unwrap();
            assert_eq!(t.coord(vp.x_min, vp.y_min), (0.0, h as f64));
            assert_eq!(t.coord(vp.x_max, vp.y_max), (w as f64, 0.0));
        }
    }

    #[test]
    fn maps_linearly() {
        let vp = Viewport {
            x_min: 10.0,
            x_max: 20.0,
            y_min: 0.0,
            y_max: 4.0,
        };
        let t = Transformer::new(vp, &area(200, 100)).unwrap();
        assert_eq!(t.coord(15.0, 1.0), (100.0, 75.0));
        assert_eq!(t.coord(12.5, 2.0), (50.0, 50.0));
    }

    #[test]
    fn degenerate_ranges_are_rejected() {
        let vp = Viewport {
            x_min: 3.0,
            x_max: 3.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert_eq!(
            Transformer::new(vp, &area(10, 10)).unwrap_err(),
            GeometryError::DegenerateRange { axis: 'x', value: 3.0 }
        );
        let vp = Viewport {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 0.0,
        };
        assert!(matches!(
            Transformer::new(vp, &area(10, 10)),
            Err(GeometryError::DegenerateRange { axis: 'y', .. })
        ));
    }
}
