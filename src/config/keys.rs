//! The closed set of recognized configuration keys.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

macro_rules! config_keys {
    ($($variant:ident => $name:literal,)+) => {
        /// A recognized configuration key. Names match the flat config map.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ConfigKey {
            $($variant,)+
        }

        impl ConfigKey {
            pub const ALL: &'static [ConfigKey] = &[$(ConfigKey::$variant,)+];

            pub fn name(self) -> &'static str {
                match self {
                    $(ConfigKey::$variant => $name,)+
                }
            }
        }

        impl FromStr for ConfigKey {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(ConfigKey::$variant),)+
                    other => Err(ConfigError::UnknownKey(other.to_string())),
                }
            }
        }
    };
}

config_keys! {
    CanvasWidth => "canvasWidth",
    CanvasHeight => "canvasHeight",
    CanvasBackgroundColor => "canvasBackgroundColor",
    FrameXRatio => "frameXRatio",
    FrameYRatio => "frameYRatio",
    Plotarea => "plotarea",
    AxisColor => "axisColor",
    AxisWidth => "axisWidth",
    GridColor => "gridColor",
    GridWidth => "gridWidth",
    GridHeightPitch => "gridHeightPitch",
    BarBackgroundColor => "barBackgroundColor",
    BarBorderColor => "barBorderColor",
    BarBorderWidth => "barBorderWidth",
    FrequencyPolygonColor => "frequencyPolygonColor",
    FrequencyPolygonWidth => "frequencyPolygonWidth",
    CrfPolygonColor => "cumulativeRelativeFrequencyPolygonColor",
    CrfPolygonWidth => "cumulativeRelativeFrequencyPolygonWidth",
    FontPath => "fontPath",
    FontSize => "fontSize",
    FontColor => "fontColor",
    ShowBar => "showBar",
    ShowGrid => "showGrid",
    ShowGridValues => "showGridValues",
    ShowAxis => "showAxis",
    ShowFrequencyPolygon => "showFrequencyPolygon",
    ShowCrfPolygon => "showCumulativeRelativeFrequencyPolygon",
    ShowFrequency => "showFrequency",
    LabelX => "labelX",
    LabelXOffsetX => "labelXOffsetX",
    LabelXOffsetY => "labelXOffsetY",
    LabelY => "labelY",
    LabelYOffsetX => "labelYOffsetX",
    LabelYOffsetY => "labelYOffsetY",
    Caption => "caption",
    CaptionOffsetX => "captionOffsetX",
    CaptionOffsetY => "captionOffsetY",
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for key in ConfigKey::ALL {
            assert_eq!(key.name().parse::<ConfigKey>(), Ok(*key));
        }
        assert_eq!(ConfigKey::ALL.len(), 37);
    }

    #[test]
    fn unknown_names_are_typed_errors() {
        assert_eq!(
            "imageDriver".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey("imageDriver".into()))
        );
    }
}
