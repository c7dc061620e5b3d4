//! Requestable weather variables and the intervals they are requested on.

use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

use crate::error::MeteoError;

/// Time granularity of returned data. Each interval has its own query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Current,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    /// Query key and response field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Current => "current",
            Interval::Hourly => "hourly",
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        }
    }

    pub const fn all() -> &'static [Interval] {
        &[
            Interval::Current,
            Interval::Hourly,
            Interval::Daily,
            Interval::Weekly,
            Interval::Monthly,
        ]
    }

    /// Metrics known to be valid for this interval, or `None` when the
    /// interval is not checked.
    pub fn known_metrics(&self) -> Option<&'static [Metric]> {
        match self {
            Interval::Current => Some(CURRENT_METRICS),
            Interval::Hourly => Some(HOURLY_METRICS),
            Interval::Daily => Some(DAILY_METRICS),
            Interval::Weekly | Interval::Monthly => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named weather variable, e.g. `temperature_2m`.
///
/// The name is passed to the API verbatim; any string is accepted, the
/// associated constants only cover the common ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metric(Cow<'static, str>);

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Metric(Cow::Owned(name.into()))
    }

    const fn known(name: &'static str) -> Self {
        Metric(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Forecast: hourly, current and shared names.
    pub const TEMPERATURE_2M: Metric = Metric::known("temperature_2m");
    pub const RELATIVE_HUMIDITY_2M: Metric = Metric::known("relative_humidity_2m");
    pub const DEW_POINT_2M: Metric = Metric::known("dew_point_2m");
    pub const APPARENT_TEMPERATURE: Metric = Metric::known("apparent_temperature");
    pub const PRECIPITATION_PROBABILITY: Metric = Metric::known("precipitation_probability");
    pub const PRECIPITATION: Metric = Metric::known("precipitation");
    pub const RAIN: Metric = Metric::known("rain");
    pub const SHOWERS: Metric = Metric::known("showers");
    pub const SNOWFALL: Metric = Metric::known("snowfall");
    pub const SNOW_DEPTH: Metric = Metric::known("snow_depth");
    pub const WEATHER_CODE: Metric = Metric::known("weather_code");
    pub const PRESSURE_MSL: Metric = Metric::known("pressure_msl");
    pub const SURFACE_PRESSURE: Metric = Metric::known("surface_pressure");
    pub const CLOUD_COVER: Metric = Metric::known("cloud_cover");
    pub const CLOUD_COVER_LOW: Metric = Metric::known("cloud_cover_low");
    pub const CLOUD_COVER_MID: Metric = Metric::known("cloud_cover_mid");
    pub const CLOUD_COVER_HIGH: Metric = Metric::known("cloud_cover_high");
    pub const EVAPOTRANSPIRATION: Metric = Metric::known("evapotranspiration");
    pub const VISIBILITY: Metric = Metric::known("visibility");
    pub const ET0_FAO_EVAPOTRANSPIRATION: Metric = Metric::known("et0_fao_evapotranspiration");
    pub const VAPOUR_PRESSURE_DEFICIT: Metric = Metric::known("vapour_pressure_deficit");
    pub const WIND_SPEED_10M: Metric = Metric::known("wind_speed_10m");
    pub const WIND_SPEED_80M: Metric = Metric::known("wind_speed_80m");
    pub const WIND_SPEED_120M: Metric = Metric::known("wind_speed_120m");
    pub const WIND_SPEED_180M: Metric = Metric::known("wind_speed_180m");
    pub const WIND_DIRECTION_10M: Metric = Metric::known("wind_direction_10m");
    pub const WIND_DIRECTION_80M: Metric = Metric::known("wind_direction_80m");
    pub const WIND_DIRECTION_120M: Metric = Metric::known("wind_direction_120m");
    pub const WIND_DIRECTION_180M: Metric = Metric::known("wind_direction_180m");
    pub const WIND_GUSTS_10M: Metric = Metric::known("wind_gusts_10m");
    pub const TEMPERATURE_80M: Metric = Metric::known("temperature_80m");
    pub const TEMPERATURE_120M: Metric = Metric::known("temperature_120m");
    pub const TEMPERATURE_180M: Metric = Metric::known("temperature_180m");
    pub const SOIL_TEMPERATURE_0CM: Metric = Metric::known("soil_temperature_0cm");
    pub const SOIL_TEMPERATURE_6CM: Metric = Metric::known("soil_temperature_6cm");
    pub const SOIL_TEMPERATURE_18CM: Metric = Metric::known("soil_temperature_18cm");
    pub const SOIL_TEMPERATURE_54CM: Metric = Metric::known("soil_temperature_54cm");
    pub const SOIL_MOISTURE_0_TO_1CM: Metric = Metric::known("soil_moisture_0_to_1cm");
    pub const SOIL_MOISTURE_1_TO_3CM: Metric = Metric::known("soil_moisture_1_to_3cm");
    pub const SOIL_MOISTURE_3_TO_9CM: Metric = Metric::known("soil_moisture_3_to_9cm");
    pub const SOIL_MOISTURE_9_TO_27CM: Metric = Metric::known("soil_moisture_9_to_27cm");
    pub const IS_DAY: Metric = Metric::known("is_day");

    // Forecast: daily aggregates.
    pub const TEMPERATURE_2M_MAX: Metric = Metric::known("temperature_2m_max");
    pub const TEMPERATURE_2M_MIN: Metric = Metric::known("temperature_2m_min");
    pub const APPARENT_TEMPERATURE_MAX: Metric = Metric::known("apparent_temperature_max");
    pub const APPARENT_TEMPERATURE_MIN: Metric = Metric::known("apparent_temperature_min");
    pub const SUNRISE: Metric = Metric::known("sunrise");
    pub const SUNSET: Metric = Metric::known("sunset");
    pub const SUNSHINE_DURATION: Metric = Metric::known("sunshine_duration");
    pub const DAYLIGHT_DURATION: Metric = Metric::known("daylight_duration");
    pub const UV_INDEX_MAX: Metric = Metric::known("uv_index_max");
    pub const UV_INDEX_CLEAR_SKY_MAX: Metric = Metric::known("uv_index_clear_sky_max");
    pub const RAIN_SUM: Metric = Metric::known("rain_sum");
    pub const SHOWERS_SUM: Metric = Metric::known("showers_sum");
    pub const SNOWFALL_SUM: Metric = Metric::known("snowfall_sum");
    pub const PRECIPITATION_SUM: Metric = Metric::known("precipitation_sum");
    pub const PRECIPITATION_HOURS: Metric = Metric::known("precipitation_hours");
    pub const PRECIPITATION_PROBABILITY_MAX: Metric =
        Metric::known("precipitation_probability_max");
    pub const WIND_SPEED_10M_MAX: Metric = Metric::known("wind_speed_10m_max");
    pub const WIND_GUSTS_10M_MAX: Metric = Metric::known("wind_gusts_10m_max");
    pub const WIND_DIRECTION_10M_DOMINANT: Metric = Metric::known("wind_direction_10m_dominant");
    pub const SHORTWAVE_RADIATION_SUM: Metric = Metric::known("shortwave_radiation_sum");

    // Seasonal: weekly and monthly.
    pub const TEMPERATURE_2M_MEAN: Metric = Metric::known("temperature_2m_mean");
    pub const TEMPERATURE_2M_ANOMALY: Metric = Metric::known("temperature_2m_anomaly");
    pub const TEMPERATURE_2M_MAX_MEAN: Metric = Metric::known("temperature_2m_max_mean");
    pub const TEMPERATURE_2M_MIN_MEAN: Metric = Metric::known("temperature_2m_min_mean");
    pub const DEW_POINT_2M_MEAN: Metric = Metric::known("dew_point_2m_mean");
    pub const PRECIPITATION_MEAN: Metric = Metric::known("precipitation_mean");
    pub const PRECIPITATION_ANOMALY: Metric = Metric::known("precipitation_anomaly");
    pub const PRESSURE_MSL_MEAN: Metric = Metric::known("pressure_msl_mean");
    pub const PRESSURE_MSL_ANOMALY: Metric = Metric::known("pressure_msl_anomaly");
    pub const SOIL_MOISTURE_0_TO_10CM_MEAN: Metric = Metric::known("soil_moisture_0_to_10cm_mean");
    pub const SOIL_MOISTURE_0_TO_10CM_ANOMALY: Metric =
        Metric::known("soil_moisture_0_to_10cm_anomaly");

    // Marine: hourly.
    pub const WAVE_HEIGHT: Metric = Metric::known("wave_height");
    pub const WAVE_DIRECTION: Metric = Metric::known("wave_direction");
    pub const WAVE_PERIOD: Metric = Metric::known("wave_period");
    pub const WIND_WAVE_HEIGHT: Metric = Metric::known("wind_wave_height");
    pub const WIND_WAVE_DIRECTION: Metric = Metric::known("wind_wave_direction");
    pub const WIND_WAVE_PERIOD: Metric = Metric::known("wind_wave_period");
    pub const SWELL_WAVE_HEIGHT: Metric = Metric::known("swell_wave_height");
    pub const SWELL_WAVE_DIRECTION: Metric = Metric::known("swell_wave_direction");
    pub const SWELL_WAVE_PERIOD: Metric = Metric::known("swell_wave_period");
    pub const OCEAN_CURRENT_VELOCITY: Metric = Metric::known("ocean_current_velocity");
    pub const OCEAN_CURRENT_DIRECTION: Metric = Metric::known("ocean_current_direction");
    pub const SEA_SURFACE_TEMPERATURE: Metric = Metric::known("sea_surface_temperature");

    // Marine: daily.
    pub const WAVE_HEIGHT_MAX: Metric = Metric::known("wave_height_max");
    pub const WAVE_DIRECTION_DOMINANT: Metric = Metric::known("wave_direction_dominant");
    pub const WAVE_PERIOD_MAX: Metric = Metric::known("wave_period_max");
    pub const WIND_WAVE_HEIGHT_MAX: Metric = Metric::known("wind_wave_height_max");
    pub const SWELL_WAVE_HEIGHT_MAX: Metric = Metric::known("swell_wave_height_max");
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Metric {
    fn from(value: &str) -> Self {
        Metric::new(value)
    }
}

impl From<String> for Metric {
    fn from(value: String) -> Self {
        Metric(Cow::Owned(value))
    }
}

/// An ordered set of metrics for one interval.
///
/// Order is preserved on the wire and duplicates are passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(Vec<Metric>);

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a metric set, rejecting names not known for `interval`.
    ///
    /// Weekly and monthly sets are not checked.
    pub fn for_interval<I, M>(interval: Interval, metrics: I) -> Result<Self, MeteoError>
    where
        I: IntoIterator<Item = M>,
        M: Into<Metric>,
    {
        let metrics: Vec<Metric> = metrics.into_iter().map(Into::into).collect();

        if let Some(known) = interval.known_metrics() {
            if let Some(bad) = metrics.iter().find(|m| !known.contains(m)) {
                return Err(MeteoError::UnsupportedMetric {
                    interval: interval.to_string(),
                    metric: bad.to_string(),
                });
            }
        }

        Ok(Metrics(metrics))
    }

    pub fn push(&mut self, metric: impl Into<Metric>) {
        self.0.push(metric.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Metric> {
        self.0.iter()
    }

    /// Comma-joined query value, in insertion order.
    pub fn encode(&self) -> String {
        self.0.iter().map(Metric::as_str).collect::<Vec<_>>().join(",")
    }
}

impl<M: Into<Metric>> FromIterator<M> for Metrics {
    fn from_iter<T: IntoIterator<Item = M>>(iter: T) -> Self {
        Metrics(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<Metric>> for Metrics {
    fn from(value: Vec<Metric>) -> Self {
        Metrics(value)
    }
}

impl<'a> IntoIterator for &'a Metrics {
    type Item = &'a Metric;
    type IntoIter = std::slice::Iter<'a, Metric>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

const CURRENT_METRICS: &[Metric] = &[
    Metric::TEMPERATURE_2M,
    Metric::RELATIVE_HUMIDITY_2M,
    Metric::IS_DAY,
    Metric::APPARENT_TEMPERATURE,
    Metric::PRECIPITATION,
    Metric::RAIN,
    Metric::SHOWERS,
    Metric::SNOWFALL,
    Metric::WEATHER_CODE,
    Metric::CLOUD_COVER,
    Metric::PRESSURE_MSL,
    Metric::SURFACE_PRESSURE,
    Metric::WIND_SPEED_10M,
    Metric::WIND_DIRECTION_10M,
    Metric::WIND_GUSTS_10M,
    // marine
    Metric::WAVE_HEIGHT,
    Metric::WAVE_DIRECTION,
    Metric::WAVE_PERIOD,
    Metric::SEA_SURFACE_TEMPERATURE,
];

const HOURLY_METRICS: &[Metric] = &[
    Metric::TEMPERATURE_2M,
    Metric::RELATIVE_HUMIDITY_2M,
    Metric::DEW_POINT_2M,
    Metric::APPARENT_TEMPERATURE,
    Metric::PRECIPITATION_PROBABILITY,
    Metric::PRECIPITATION,
    Metric::RAIN,
    Metric::SHOWERS,
    Metric::SNOWFALL,
    Metric::SNOW_DEPTH,
    Metric::WEATHER_CODE,
    Metric::PRESSURE_MSL,
    Metric::SURFACE_PRESSURE,
    Metric::CLOUD_COVER,
    Metric::CLOUD_COVER_LOW,
    Metric::CLOUD_COVER_MID,
    Metric::CLOUD_COVER_HIGH,
    Metric::EVAPOTRANSPIRATION,
    Metric::VISIBILITY,
    Metric::ET0_FAO_EVAPOTRANSPIRATION,
    Metric::VAPOUR_PRESSURE_DEFICIT,
    Metric::WIND_SPEED_10M,
    Metric::WIND_SPEED_80M,
    Metric::WIND_SPEED_120M,
    Metric::WIND_SPEED_180M,
    Metric::WIND_DIRECTION_10M,
    Metric::WIND_DIRECTION_80M,
    Metric::WIND_DIRECTION_120M,
    Metric::WIND_DIRECTION_180M,
    Metric::WIND_GUSTS_10M,
    Metric::TEMPERATURE_80M,
    Metric::TEMPERATURE_120M,
    Metric::TEMPERATURE_180M,
    Metric::SOIL_TEMPERATURE_0CM,
    Metric::SOIL_TEMPERATURE_6CM,
    Metric::SOIL_TEMPERATURE_18CM,
    Metric::SOIL_TEMPERATURE_54CM,
    Metric::SOIL_MOISTURE_0_TO_1CM,
    Metric::SOIL_MOISTURE_1_TO_3CM,
    Metric::SOIL_MOISTURE_3_TO_9CM,
    Metric::SOIL_MOISTURE_9_TO_27CM,
    Metric::IS_DAY,
    // marine
    Metric::WAVE_HEIGHT,
    Metric::WAVE_DIRECTION,
    Metric::WAVE_PERIOD,
    Metric::WIND_WAVE_HEIGHT,
    Metric::WIND_WAVE_DIRECTION,
    Metric::WIND_WAVE_PERIOD,
    Metric::SWELL_WAVE_HEIGHT,
    Metric::SWELL_WAVE_DIRECTION,
    Metric::SWELL_WAVE_PERIOD,
    Metric::OCEAN_CURRENT_VELOCITY,
    Metric::OCEAN_CURRENT_DIRECTION,
    Metric::SEA_SURFACE_TEMPERATURE,
];

const DAILY_METRICS: &[Metric] = &[
    Metric::WEATHER_CODE,
    Metric::TEMPERATURE_2M_MAX,
    Metric::TEMPERATURE_2M_MIN,
    Metric::APPARENT_TEMPERATURE_MAX,
    Metric::APPARENT_TEMPERATURE_MIN,
    Metric::SUNRISE,
    Metric::SUNSET,
    Metric::SUNSHINE_DURATION,
    Metric::DAYLIGHT_DURATION,
    Metric::UV_INDEX_MAX,
    Metric::UV_INDEX_CLEAR_SKY_MAX,
    Metric::RAIN_SUM,
    Metric::SHOWERS_SUM,
    Metric::SNOWFALL_SUM,
    Metric::PRECIPITATION_SUM,
    Metric::PRECIPITATION_HOURS,
    Metric::PRECIPITATION_PROBABILITY_MAX,
    Metric::WIND_SPEED_10M_MAX,
    Metric::WIND_GUSTS_10M_MAX,
    Metric::WIND_DIRECTION_10M_DOMINANT,
    Metric::SHORTWAVE_RADIATION_SUM,
    Metric::ET0_FAO_EVAPOTRANSPIRATION,
    // marine
    Metric::WAVE_HEIGHT_MAX,
    Metric::WAVE_DIRECTION_DOMINANT,
    Metric::WAVE_PERIOD_MAX,
    Metric::WIND_WAVE_HEIGHT_MAX,
    Metric::SWELL_WAVE_HEIGHT_MAX,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_keeps_order_and_duplicates() {
        let metrics: Metrics = [
            Metric::RELATIVE_HUMIDITY_2M,
            Metric::TEMPERATURE_2M,
            Metric::RELATIVE_HUMIDITY_2M,
        ]
        .into_iter()
        .collect();

        assert_eq!(metrics.encode(), "relative_humidity_2m,temperature_2m,relative_humidity_2m");
        assert_eq!(metrics.len(), 3);
    }

    #[test]
    fn encode_empty_set_is_empty_string() {
        assert_eq!(Metrics::new().encode(), "");
    }

    #[test]
    fn custom_metric_names_pass_through() {
        let metrics: Metrics = ["cape", "freezing_level_height"].into_iter().collect();
        assert_eq!(metrics.encode(), "cape,freezing_level_height");
    }

    #[test]
    fn known_constant_equals_owned_name() {
        assert_eq!(Metric::TEMPERATURE_2M, Metric::new("temperature_2m"));
    }

    #[test]
    fn for_interval_accepts_known_metrics() {
        let requested = [Metric::WEATHER_CODE, Metric::TEMPERATURE_2M_MAX];
        let metrics = Metrics::for_interval(Interval::Daily, requested)
            .expect("daily metrics should be accepted");
        assert_eq!(metrics.encode(), "weather_code,temperature_2m_max");
    }

    #[test]
    fn for_interval_rejects_metric_from_other_interval() {
        let err =
            Metrics::for_interval(Interval::Current, [Metric::TEMPERATURE_2M_MAX]).unwrap_err();
        assert_eq!(err.to_string(), "invalid for current metrics: temperature_2m_max");
    }

    #[test]
    fn for_interval_does_not_check_seasonal_intervals() {
        let metrics = Metrics::for_interval(Interval::Weekly, ["anything_goes"]).unwrap();
        assert_eq!(metrics.encode(), "anything_goes");
    }

    #[test]
    fn interval_query_keys() {
        let keys: Vec<_> = Interval::all().iter().map(Interval::as_str).collect();
        assert_eq!(keys, ["current", "hourly", "daily", "weekly", "monthly"]);
    }
}
