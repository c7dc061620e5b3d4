use chrono::NaiveDate;
use std::{convert::TryFrom, fmt, str::FromStr};

use crate::{
    error::MeteoError,
    metrics::{Interval, Metric, Metrics},
    units::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit},
};

/// API product line a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Product {
    #[default]
    Forecast,
    Archive,
    Seasonal,
    Marine,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Forecast => "forecast",
            Product::Archive => "archive",
            Product::Seasonal => "seasonal",
            Product::Marine => "marine",
        }
    }

    pub const fn all() -> &'static [Product] {
        &[Product::Forecast, Product::Archive, Product::Seasonal, Product::Marine]
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Product {
    type Error = MeteoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "forecast" => Ok(Product::Forecast),
            "archive" => Ok(Product::Archive),
            "seasonal" => Ok(Product::Seasonal),
            "marine" => Ok(Product::Marine),
            _ => Err(MeteoError::UnknownProduct(value.to_string())),
        }
    }
}

impl FromStr for Product {
    type Err = MeteoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Parameters for a single weather request. Build with [`OptionsBuilder`].
///
/// `None` and empty values are left out of the query entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_unit: Option<TemperatureUnit>,
    pub wind_speed_unit: Option<WindSpeedUnit>,
    pub precipitation_unit: Option<PrecipitationUnit>,
    /// IANA timezone name, or `auto` to use the location's zone.
    pub timezone: Option<String>,
    pub past_days: Option<u32>,
    pub forecast_days: Option<u32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Weather model identifiers, e.g. `ecmwf_seas5`.
    pub models: Vec<String>,
    pub hourly: Metrics,
    pub daily: Metrics,
    pub weekly: Metrics,
    pub monthly: Metrics,
    pub current: Metrics,
    pub product: Product,
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    pub fn metrics(&self, interval: Interval) -> &Metrics {
        match interval {
            Interval::Current => &self.current,
            Interval::Hourly => &self.hourly,
            Interval::Daily => &self.daily,
            Interval::Weekly => &self.weekly,
            Interval::Monthly => &self.monthly,
        }
    }

    /// True when no interval has any metric requested.
    pub fn has_no_metrics(&self) -> bool {
        Interval::all().iter().all(|i| self.metrics(*i).is_empty())
    }
}

/// Fluent constructor for [`Options`].
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latitude(mut self, latitude: f64) -> Self {
        self.options.latitude = latitude;
        self
    }

    pub fn longitude(mut self, longitude: f64) -> Self {
        self.options.longitude = longitude;
        self
    }

    pub fn location(self, latitude: f64, longitude: f64) -> Self {
        self.latitude(latitude).longitude(longitude)
    }

    pub fn temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.options.temperature_unit = Some(unit);
        self
    }

    pub fn wind_speed_unit(mut self, unit: WindSpeedUnit) -> Self {
        self.options.wind_speed_unit = Some(unit);
        self
    }

    pub fn precipitation_unit(mut self, unit: PrecipitationUnit) -> Self {
        self.options.precipitation_unit = Some(unit);
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.options.timezone = Some(timezone.into());
        self
    }

    pub fn past_days(mut self, days: u32) -> Self {
        self.options.past_days = Some(days);
        self
    }

    pub fn forecast_days(mut self, days: u32) -> Self {
        self.options.forecast_days = Some(days);
        self
    }

    pub fn start(mut self, start: NaiveDate) -> Self {
        self.options.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDate) -> Self {
        self.options.end = Some(end);
        self
    }

    pub fn models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn hourly<I: IntoIterator<Item = M>, M: Into<Metric>>(mut self, metrics: I) -> Self {
        self.options.hourly = metrics.into_iter().collect();
        self
    }

    pub fn daily<I: IntoIterator<Item = M>, M: Into<Metric>>(mut self, metrics: I) -> Self {
        self.options.daily = metrics.into_iter().collect();
        self
    }

    /// Weekly metrics are only served by the seasonal API.
    pub fn weekly<I: IntoIterator<Item = M>, M: Into<Metric>>(mut self, metrics: I) -> Self {
        self.options.weekly = metrics.into_iter().collect();
        self
    }

    /// Monthly metrics are only served by the seasonal API.
    pub fn monthly<I: IntoIterator<Item = M>, M: Into<Metric>>(mut self, metrics: I) -> Self {
        self.options.monthly = metrics.into_iter().collect();
        self
    }

    pub fn current<I: IntoIterator<Item = M>, M: Into<Metric>>(mut self, metrics: I) -> Self {
        self.options.current = metrics.into_iter().collect();
        self
    }

    /// Replace the metric set for `interval`.
    pub fn metrics(mut self, interval: Interval, metrics: Metrics) -> Self {
        let slot = match interval {
            Interval::Current => &mut self.options.current,
            Interval::Hourly => &mut self.options.hourly,
            Interval::Daily => &mut self.options.daily,
            Interval::Weekly => &mut self.options.weekly,
            Interval::Monthly => &mut self.options.monthly,
        };
        *slot = metrics;
        self
    }

    pub fn product(mut self, product: Product) -> Self {
        self.options.product = product;
        self
    }

    /// Send the request to the seasonal API. `false` reverts to forecast.
    pub fn seasonal(self, seasonal: bool) -> Self {
        self.toggle(Product::Seasonal, seasonal)
    }

    /// Send the request to the marine API. `false` reverts to forecast.
    pub fn marine(self, marine: bool) -> Self {
        self.toggle(Product::Marine, marine)
    }

    fn toggle(mut self, product: Product, on: bool) -> Self {
        if on {
            self.options.product = product;
        } else if self.options.product == product {
            self.options.product = Product::Forecast;
        }
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_every_field() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();

        let opts = OptionsBuilder::new()
            .latitude(12.34)
            .longitude(56.78)
            .temperature_unit(TemperatureUnit::Fahrenheit)
            .wind_speed_unit(WindSpeedUnit::Mph)
            .precipitation_unit(PrecipitationUnit::Inch)
            .timezone("UTC")
            .past_days(5)
            .forecast_days(3)
            .start(start)
            .end(end)
            .models(["ecmwf_ifs025"])
            .hourly([Metric::TEMPERATURE_2M])
            .daily([Metric::WEATHER_CODE])
            .current([Metric::IS_DAY])
            .build();

        assert_eq!(opts.latitude, 12.34);
        assert_eq!(opts.longitude, 56.78);
        assert_eq!(opts.temperature_unit, Some(TemperatureUnit::Fahrenheit));
        assert_eq!(opts.wind_speed_unit, Some(WindSpeedUnit::Mph));
        assert_eq!(opts.precipitation_unit, Some(PrecipitationUnit::Inch));
        assert_eq!(opts.timezone.as_deref(), Some("UTC"));
        assert_eq!(opts.past_days, Some(5));
        assert_eq!(opts.forecast_days, Some(3));
        assert_eq!(opts.start, Some(start));
        assert_eq!(opts.end, Some(end));
        assert_eq!(opts.models, vec!["ecmwf_ifs025".to_string()]);
        assert_eq!(opts.hourly.encode(), "temperature_2m");
        assert_eq!(opts.daily.encode(), "weather_code");
        assert_eq!(opts.current.encode(), "is_day");
        assert_eq!(opts.product, Product::Forecast);
    }

    #[test]
    fn defaults_leave_everything_unset() {
        let opts = Options::builder().build();

        assert_eq!(opts.temperature_unit, None);
        assert_eq!(opts.timezone, None);
        assert!(opts.models.is_empty());
        assert!(opts.has_no_metrics());
    }

    #[test]
    fn seasonal_and_marine_flags_select_product() {
        let opts = Options::builder().seasonal(true).build();
        assert_eq!(opts.product, Product::Seasonal);

        let opts = Options::builder().seasonal(true).marine(true).build();
        assert_eq!(opts.product, Product::Marine);

        let opts = Options::builder().marine(true).marine(false).build();
        assert_eq!(opts.product, Product::Forecast);

        // clearing a flag that is not active leaves the product alone
        let opts = Options::builder().seasonal(true).marine(false).build();
        assert_eq!(opts.product, Product::Seasonal);
    }

    #[test]
    fn weekly_metrics_do_not_switch_product() {
        let opts = Options::builder().weekly([Metric::TEMPERATURE_2M_MEAN]).build();
        assert_eq!(opts.product, Product::Forecast);
    }

    #[test]
    fn metrics_by_interval() {
        let opts = Options::builder()
            .metrics(Interval::Monthly, [Metric::PRECIPITATION_MEAN].into_iter().collect())
            .build();

        assert_eq!(opts.metrics(Interval::Monthly).encode(), "precipitation_mean");
        assert!(opts.metrics(Interval::Weekly).is_empty());
        assert!(!opts.has_no_metrics());
    }

    #[test]
    fn product_as_str_roundtrip() {
        for product in Product::all() {
            let parsed = Product::try_from(product.as_str()).expect("roundtrip should succeed");
            assert_eq!(*product, parsed);
        }
    }

    #[test]
    fn unknown_product_error() {
        let err = Product::try_from("satellite").unwrap_err();
        assert!(matches!(&err, MeteoError::UnknownProduct(name) if name == "satellite"));
        assert!(err.to_string().contains("supported products: forecast"));
    }
}
