//! Unit selections accepted by the API.
//!
//! Each unit has a canonical wire string which is what ends up in the query
//! and in the config file.

use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

use crate::error::MeteoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "celsius")]
    Celsius,
    #[serde(rename = "fahrenheit")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindSpeedUnit {
    /// Kilometres per hour.
    #[default]
    #[serde(rename = "kmh")]
    Kmh,
    /// Metres per second.
    #[serde(rename = "ms")]
    Ms,
    #[serde(rename = "mph")]
    Mph,
    /// Knots.
    #[serde(rename = "kn")]
    Kn,
}

impl WindSpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "kmh",
            WindSpeedUnit::Ms => "ms",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Kn => "kn",
        }
    }

    pub const fn all() -> &'static [WindSpeedUnit] {
        &[WindSpeedUnit::Kmh, WindSpeedUnit::Ms, WindSpeedUnit::Mph, WindSpeedUnit::Kn]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrecipitationUnit {
    #[default]
    #[serde(rename = "mm")]
    Mm,
    #[serde(rename = "inch", alias = "in")]
    Inch,
}

impl PrecipitationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "inch",
        }
    }

    pub const fn all() -> &'static [PrecipitationUnit] {
        &[PrecipitationUnit::Mm, PrecipitationUnit::Inch]
    }
}

/// Display, `TryFrom<&str>` and `FromStr` in terms of `as_str`/`all`.
macro_rules! unit_conversions {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = MeteoError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let lower = value.trim().to_lowercase();

                <$ty>::all()
                    .iter()
                    .copied()
                    .find(|unit| unit.as_str() == lower)
                    .ok_or_else(|| MeteoError::UnknownUnit {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }

        impl FromStr for $ty {
            type Err = MeteoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s)
            }
        }
    };
}

unit_conversions!(TemperatureUnit, "temperature");
unit_conversions!(WindSpeedUnit, "wind speed");
unit_conversions!(PrecipitationUnit, "precipitation");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_unit_as_str_roundtrip() {
        for unit in TemperatureUnit::all() {
            let parsed =
                TemperatureUnit::try_from(unit.as_str()).expect("roundtrip should succeed");
            assert_eq!(*unit, parsed);
        }
    }

    #[test]
    fn wind_speed_unit_strings() {
        assert_eq!(WindSpeedUnit::Kmh.to_string(), "kmh");
        assert_eq!(WindSpeedUnit::Ms.to_string(), "ms");
        assert_eq!(WindSpeedUnit::Mph.to_string(), "mph");
        assert_eq!(WindSpeedUnit::Kn.to_string(), "kn");
    }

    #[test]
    fn precipitation_unit_uses_api_spelling() {
        assert_eq!(PrecipitationUnit::Inch.as_str(), "inch");
        assert_eq!("mm".parse::<PrecipitationUnit>().unwrap(), PrecipitationUnit::Mm);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("Fahrenheit".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(" MPH ".parse::<WindSpeedUnit>().unwrap(), WindSpeedUnit::Mph);
    }

    #[test]
    fn unknown_unit_error() {
        let err = "kelvin".parse::<TemperatureUnit>().unwrap_err();
        assert!(err.to_string().contains("unknown temperature unit 'kelvin'"));
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&WindSpeedUnit::Kn).unwrap();
        assert_eq!(json, "\"kn\"");

        let unit: PrecipitationUnit = serde_json::from_str("\"in\"").unwrap();
        assert_eq!(unit, PrecipitationUnit::Inch);
    }
}
