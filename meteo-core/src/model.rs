//! Decoded API responses.
//!
//! Every metric field is optional: the API only returns what was requested.
//! Array entries are `Option` because the API emits `null` for missing steps.
//! Metrics not listed here land in the `other` map of their interval.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherData {
    pub latitude: f64,
    pub longitude: f64,
    pub generationtime_ms: f64,
    pub utc_offset_seconds: i64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub elevation: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_units: Option<CurrentUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Current>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_units: Option<HourlyUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<Hourly>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_units: Option<DailyUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<Daily>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_units: Option<SeasonalUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly: Option<Seasonal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_units: Option<SeasonalUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly: Option<Seasonal>,
}

/// Declares a units record (metric -> unit string) and a values record
/// (metric -> one entry per time step) with the same field list, so the two
/// cannot drift apart.
macro_rules! series {
    (
        $(#[$units_meta:meta])*
        units $units:ident;
        $(#[$values_meta:meta])*
        values $values:ident {
            $( $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$units_meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $units {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub time: Option<String>,
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )*
            #[serde(flatten)]
            pub other: BTreeMap<String, Value>,
        }

        $(#[$values_meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $values {
            #[serde(default)]
            pub time: Vec<String>,
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<Vec<Option<$ty>>>,
            )*
            #[serde(flatten)]
            pub other: BTreeMap<String, Value>,
        }

        impl $values {
            /// Number of time steps.
            pub fn len(&self) -> usize {
                self.time.len()
            }

            pub fn is_empty(&self) -> bool {
                self.time.is_empty()
            }
        }
    };
}

series! {
    /// Units for [`Hourly`].
    units HourlyUnits;
    /// Hourly forecast, archive and marine series.
    values Hourly {
        temperature_2m: f64,
        relative_humidity_2m: i64,
        dew_point_2m: f64,
        apparent_temperature: f64,
        precipitation_probability: i64,
        precipitation: f64,
        rain: f64,
        showers: f64,
        snowfall: f64,
        snow_depth: f64,
        weather_code: i64,
        pressure_msl: f64,
        surface_pressure: f64,
        cloud_cover: i64,
        cloud_cover_low: i64,
        cloud_cover_mid: i64,
        cloud_cover_high: i64,
        evapotranspiration: f64,
        visibility: f64,
        et0_fao_evapotranspiration: f64,
        vapour_pressure_deficit: f64,
        wind_speed_10m: f64,
        wind_speed_80m: f64,
        wind_speed_120m: f64,
        wind_speed_180m: f64,
        wind_direction_10m: i64,
        wind_direction_80m: i64,
        wind_direction_120m: i64,
        wind_direction_180m: i64,
        wind_gusts_10m: f64,
        temperature_80m: f64,
        temperature_120m: f64,
        temperature_180m: f64,
        soil_temperature_0cm: f64,
        soil_temperature_6cm: f64,
        soil_temperature_18cm: f64,
        soil_temperature_54cm: f64,
        soil_moisture_0_to_1cm: f64,
        soil_moisture_1_to_3cm: f64,
        soil_moisture_3_to_9cm: f64,
        soil_moisture_9_to_27cm: f64,
        is_day: i64,
        wave_height: f64,
        wave_direction: f64,
        wave_period: f64,
        wind_wave_height: f64,
        wind_wave_direction: f64,
        wind_wave_period: f64,
        swell_wave_height: f64,
        swell_wave_direction: f64,
        swell_wave_period: f64,
        ocean_current_velocity: f64,
        ocean_current_direction: f64,
        sea_surface_temperature: f64,
    }
}

series! {
    /// Units for [`Daily`].
    units DailyUnits;
    /// Daily aggregates. Sunrise and sunset are local ISO 8601 timestamps.
    values Daily {
        weather_code: i64,
        temperature_2m_max: f64,
        temperature_2m_min: f64,
        apparent_temperature_max: f64,
        apparent_temperature_min: f64,
        sunrise: String,
        sunset: String,
        sunshine_duration: f64,
        daylight_duration: f64,
        uv_index_max: f64,
        uv_index_clear_sky_max: f64,
        rain_sum: f64,
        showers_sum: f64,
        snowfall_sum: f64,
        precipitation_sum: f64,
        precipitation_hours: f64,
        precipitation_probability_max: i64,
        wind_speed_10m_max: f64,
        wind_gusts_10m_max: f64,
        wind_direction_10m_dominant: i64,
        shortwave_radiation_sum: f64,
        et0_fao_evapotranspiration: f64,
        wave_height_max: f64,
        wave_direction_dominant: f64,
        wave_period_max: f64,
        wind_wave_height_max: f64,
        swell_wave_height_max: f64,
    }
}

series! {
    /// Units for [`Seasonal`].
    units SeasonalUnits;
    /// Weekly or monthly series from the seasonal API.
    values Seasonal {
        temperature_2m_mean: f64,
        temperature_2m_anomaly: f64,
        temperature_2m_max_mean: f64,
        temperature_2m_min_mean: f64,
        dew_point_2m_mean: f64,
        precipitation_mean: f64,
        precipitation_anomaly: f64,
        pressure_msl_mean: f64,
        pressure_msl_anomaly: f64,
        soil_moisture_0_to_10cm_mean: f64,
        soil_moisture_0_to_10cm_anomaly: f64,
    }
}

/// Units for [`Current`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentUnits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_2m: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_humidity_2m: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apparent_temperature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snowfall: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_msl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_pressure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction_10m: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gusts_10m: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// Conditions at a single point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Current {
    pub time: String,
    /// Length of the averaging window in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_2m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_humidity_2m: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apparent_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showers: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snowfall: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_msl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction_10m: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gusts_10m: Option<f64>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// Parse a `time` entry. Hourly and current steps look like
/// `2025-01-01T00:00`, daily and seasonal ones like `2025-01-01`.
pub fn parse_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(|d| d.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_body() {
        let body = r#"{"latitude": 52.52, "longitude": 13.41}"#;
        let data: WeatherData = serde_json::from_str(body).unwrap();

        assert_eq!(data.latitude, 52.52);
        assert_eq!(data.longitude, 13.41);
        assert!(data.hourly.is_none());
        assert!(data.current.is_none());
    }

    #[test]
    fn decodes_nulls_and_unknown_metrics() {
        let body = r#"{
            "hourly_units": {"time": "iso8601", "temperature_2m": "°C", "cape": "J/kg"},
            "hourly": {
                "time": ["2025-01-01T00:00", "2025-01-01T01:00"],
                "temperature_2m": [1.5, null],
                "cape": [0.0, 10.0]
            }
        }"#;
        let data: WeatherData = serde_json::from_str(body).unwrap();

        let units = data.hourly_units.unwrap();
        assert_eq!(units.temperature_2m.as_deref(), Some("°C"));
        assert_eq!(units.other.get("cape"), Some(&Value::from("J/kg")));

        let hourly = data.hourly.unwrap();
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly.temperature_2m, Some(vec![Some(1.5), None]));
        assert!(hourly.other.contains_key("cape"));
    }

    #[test]
    fn decodes_current_block() {
        let body = r#"{
            "current_units": {"time": "iso8601", "interval": "seconds", "temperature_2m": "°F"},
            "current": {"time": "2025-01-01T12:00", "interval": 900, "temperature_2m": 41.2, "weather_code": 3}
        }"#;
        let data: WeatherData = serde_json::from_str(body).unwrap();

        let current = data.current.unwrap();
        assert_eq!(current.interval, Some(900));
        assert_eq!(current.temperature_2m, Some(41.2));
        assert_eq!(current.weather_code, Some(3));
        assert_eq!(data.current_units.unwrap().interval.as_deref(), Some("seconds"));
    }

    #[test]
    fn decodes_daily_strings() {
        let body = r#"{
            "daily": {"time": ["2025-07-15"], "sunrise": ["2025-07-15T06:05"], "temperature_2m_max": [22.0]}
        }"#;
        let data: WeatherData = serde_json::from_str(body).unwrap();

        let daily = data.daily.unwrap();
        assert_eq!(daily.sunrise, Some(vec![Some("2025-07-15T06:05".to_string())]));
        assert_eq!(daily.temperature_2m_max, Some(vec![Some(22.0)]));
    }

    #[test]
    fn wrong_value_type_is_an_error() {
        let body = r#"{"hourly": {"time": ["x"], "temperature_2m": ["warm"]}}"#;
        assert!(serde_json::from_str::<WeatherData>(body).is_err());
    }

    #[test]
    fn parse_time_formats() {
        let t = parse_time("2025-01-01T06:30").unwrap();
        assert_eq!(t.format("%Y-%m-%d %H:%M").to_string(), "2025-01-01 06:30");

        let t = parse_time("2025-01-08").unwrap();
        assert_eq!(t.format("%Y-%m-%d %H:%M").to_string(), "2025-01-08 00:00");

        assert!(parse_time("tomorrow").is_none());
    }
}
