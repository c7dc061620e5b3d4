//! URL construction: which host and path a request goes to, and how the
//! options are written into the query string.
//!
//! Everything here is pure. The current time is passed in so routing can be
//! tested without a clock.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use reqwest::Url;

use crate::{
    error::MeteoError,
    metrics::Interval,
    options::{Options, Product},
};

/// How far back the forecast API serves data. Older start dates go to the
/// archive API.
pub const FORECAST_HISTORY_LIMIT_DAYS: i64 = 90;

/// Host prefix for the commercial (API key) servers.
pub const CUSTOMER_PREFIX: &str = "customer-";

const DEFAULT_SCHEME: &str = "https";
const DEFAULT_HOST: &str = "api.open-meteo.com";

/// Scheme and host for every product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub scheme: String,
    pub forecast: String,
    pub archive: String,
    pub seasonal: String,
    pub marine: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            forecast: DEFAULT_HOST.to_string(),
            archive: format!("archive-{DEFAULT_HOST}"),
            seasonal: format!("seasonal-{DEFAULT_HOST}"),
            marine: format!("marine-{DEFAULT_HOST}"),
        }
    }
}

impl Endpoints {
    /// Route every product line to one host, e.g. a local mock server.
    pub fn single_host(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            scheme: scheme.into(),
            forecast: host.clone(),
            archive: host.clone(),
            seasonal: host.clone(),
            marine: host,
        }
    }

    /// Parse `scheme://host[:port]` into [`Endpoints::single_host`].
    pub fn from_base_url(base: &str) -> Result<Self, MeteoError> {
        let url = Url::parse(base).map_err(|e| MeteoError::Request(format!("{base}: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| MeteoError::Request(format!("{base}: missing host")))?;

        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self::single_host(url.scheme(), host))
    }

    pub fn host(&self, product: Product) -> &str {
        match product {
            Product::Forecast => &self.forecast,
            Product::Archive => &self.archive,
            Product::Seasonal => &self.seasonal,
            Product::Marine => &self.marine,
        }
    }
}

/// Where a request is sent, before the query is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub product: Product,
    pub scheme: String,
    pub host: String,
    pub path: &'static str,
}

impl Route {
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}

pub fn product_path(product: Product) -> &'static str {
    match product {
        Product::Forecast => "/v1/forecast",
        Product::Archive => "/v1/archive",
        Product::Seasonal => "/v1/seasonal",
        Product::Marine => "/v1/marine",
    }
}

/// Whether `start` is further back than the forecast API serves, measured
/// from `now`. The same date flips from `false` to `true` as time passes.
pub fn is_historical(start: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    let Some(start) = start else {
        return false;
    };

    let start = start.and_time(NaiveTime::MIN).and_utc();
    now.signed_duration_since(start) > TimeDelta::days(FORECAST_HISTORY_LIMIT_DAYS)
}

/// Product line the request actually goes to. Only forecast requests are
/// moved to the archive; seasonal and marine are kept as chosen.
///
/// Weather models never pick the product: the forecast API takes `models`
/// too (e.g. `icon_seamless`), so seasonal has to be selected explicitly.
pub fn resolve_product(
    requested: Product,
    start: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Product {
    match requested {
        Product::Forecast if is_historical(start, now) => Product::Archive,
        other => other,
    }
}

pub fn select_route(
    endpoints: &Endpoints,
    requested: Product,
    start: Option<NaiveDate>,
    now: DateTime<Utc>,
    has_api_key: bool,
) -> Route {
    let product = resolve_product(requested, start, now);
    let host = endpoints.host(product);

    let host = if has_api_key { format!("{CUSTOMER_PREFIX}{host}") } else { host.to_string() };

    Route { product, scheme: endpoints.scheme.clone(), host, path: product_path(product) }
}

/// Query parameters in wire order. Unset options produce no pair.
pub fn query_pairs(options: &Options, api_key: Option<&str>) -> Vec<(&'static str, String)> {
    let mut q = Vec::new();

    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        q.push(("apikey", key.to_string()));
    }

    q.push(("latitude", options.latitude.to_string()));
    q.push(("longitude", options.longitude.to_string()));

    if let Some(unit) = options.temperature_unit {
        q.push(("temperature_unit", unit.as_str().to_string()));
    }

    if let Some(unit) = options.wind_speed_unit {
        q.push(("wind_speed_unit", unit.as_str().to_string()));
    }

    if let Some(unit) = options.precipitation_unit {
        q.push(("precipitation_unit", unit.as_str().to_string()));
    }

    if let Some(tz) = options.timezone.as_deref().filter(|tz| !tz.is_empty()) {
        q.push(("timezone", tz.to_string()));
    }

    if let Some(days) = options.past_days.filter(|d| *d > 0) {
        q.push(("past_days", days.to_string()));
    }

    if let Some(days) = options.forecast_days.filter(|d| *d > 0) {
        q.push(("forecast_days", days.to_string()));
    }

    if let Some(start) = options.start {
        q.push(("start_date", start.format("%Y-%m-%d").to_string()));
    }

    if let Some(end) = options.end {
        q.push(("end_date", end.format("%Y-%m-%d").to_string()));
    }

    if !options.models.is_empty() {
        q.push(("models", options.models.join(",")));
    }

    for interval in [
        Interval::Hourly,
        Interval::Daily,
        Interval::Weekly,
        Interval::Monthly,
        Interval::Current,
    ] {
        let metrics = options.metrics(interval);
        if !metrics.is_empty() {
            q.push((interval.as_str(), metrics.encode()));
        }
    }

    q
}

/// Full request URL for `options` as of `now`.
pub fn build_url(
    endpoints: &Endpoints,
    options: &Options,
    api_key: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Url, MeteoError> {
    let has_key = api_key.is_some_and(|k| !k.is_empty());
    let route = select_route(endpoints, options.product, options.start, now, has_key);
    let pairs = query_pairs(options, api_key);

    let base = route.base_url();
    Url::parse_with_params(&base, &pairs).map_err(|e| MeteoError::Request(format!("{base}: {e}")))
}
