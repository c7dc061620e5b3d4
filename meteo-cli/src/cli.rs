use anyhow::{Context, bail, ensure};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Password, Select, Text};
use meteo_core::{
    Config, Interval, Location, Metric, Metrics, Options, PrecipitationUnit, Product,
    TemperatureUnit, WindSpeedUnit,
};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Open-Meteo weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API key, default location, units and timezone.
    Configure,

    /// Fetch weather data and print it.
    Show {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the decoded response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the request URL without sending it (API key masked).
    Url {
        #[command(flatten)]
        query: QueryArgs,
    },
}

/// Query parameters shared by `show` and `url`.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Latitude in degrees; defaults to the configured location.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees; defaults to the configured location.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// forecast, archive, seasonal or marine.
    #[arg(long)]
    pub product: Option<Product>,

    #[arg(long)]
    pub temperature_unit: Option<TemperatureUnit>,

    #[arg(long)]
    pub wind_speed_unit: Option<WindSpeedUnit>,

    #[arg(long)]
    pub precipitation_unit: Option<PrecipitationUnit>,

    /// IANA timezone name or "auto".
    #[arg(long)]
    pub timezone: Option<String>,

    #[arg(long)]
    pub past_days: Option<u32>,

    #[arg(long)]
    pub forecast_days: Option<u32>,

    /// First day, YYYY-MM-DD.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day, YYYY-MM-DD.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Comma-separated weather model identifiers.
    #[arg(long, value_delimiter = ',')]
    pub models: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub hourly: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub daily: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub weekly: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub monthly: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub current: Vec<String>,
}

impl QueryArgs {
    /// Merge the arguments over the configured defaults.
    pub fn to_options(&self, config: &Config) -> anyhow::Result<Options> {
        let location = match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Location { latitude, longitude },
            (None, None) => config.default_location()?,
            _ => bail!("--lat and --lon must be given together"),
        };
        validate_coordinates(location)?;

        let product = self.product.unwrap_or_default();
        let mut builder = config
            .apply(Options::builder())
            .location(location.latitude, location.longitude)
            .product(product)
            .models(self.models.iter().cloned());

        if let Some(unit) = self.temperature_unit {
            builder = builder.temperature_unit(unit);
        }
        if let Some(unit) = self.wind_speed_unit {
            builder = builder.wind_speed_unit(unit);
        }
        if let Some(unit) = self.precipitation_unit {
            builder = builder.precipitation_unit(unit);
        }
        if let Some(tz) = &self.timezone {
            builder = builder.timezone(tz.clone());
        }
        if let Some(days) = self.past_days {
            builder = builder.past_days(days);
        }
        if let Some(days) = self.forecast_days {
            builder = builder.forecast_days(days);
        }
        if let Some(start) = self.start {
            builder = builder.start(start);
        }
        if let Some(end) = self.end {
            builder = builder.end(end);
        }

        for (interval, names) in [
            (Interval::Hourly, &self.hourly),
            (Interval::Daily, &self.daily),
            (Interval::Weekly, &self.weekly),
            (Interval::Monthly, &self.monthly),
            (Interval::Current, &self.current),
        ] {
            if names.is_empty() {
                continue;
            }
            let metrics = Metrics::for_interval(interval, names.iter().map(String::as_str))
                .with_context(|| format!("Invalid --{interval} metrics"))?;
            builder = builder.metrics(interval, metrics);
        }

        let options = builder.build();
        if options.has_no_metrics() {
            debug!(%product, "No metrics requested, using defaults");
            return Ok(with_default_metrics(options));
        }

        Ok(options)
    }
}

/// Something sensible to show when the user asked for nothing in particular.
fn with_default_metrics(mut options: Options) -> Options {
    let daily = || {
        Metrics::from_iter([
            Metric::TEMPERATURE_2M_MAX,
            Metric::TEMPERATURE_2M_MIN,
            Metric::WEATHER_CODE,
        ])
    };

    match options.product {
        Product::Seasonal => {
            options.weekly =
                Metrics::from_iter([Metric::TEMPERATURE_2M_MEAN, Metric::PRECIPITATION_MEAN]);
        }
        Product::Marine => {
            options.hourly = Metrics::from_iter([Metric::WAVE_HEIGHT, Metric::WAVE_DIRECTION]);
        }
        // Start dates may route to the archive, which has no current conditions.
        Product::Archive => options.daily = daily(),
        Product::Forecast if options.start.is_some() => options.daily = daily(),
        Product::Forecast => {
            options.current = Metrics::from_iter([Metric::TEMPERATURE_2M, Metric::WEATHER_CODE]);
            options.daily = daily();
        }
    }

    options
}

fn validate_coordinates(location: Location) -> anyhow::Result<()> {
    ensure!(
        (-90.0..=90.0).contains(&location.latitude),
        "Latitude must be between -90 and 90, got {}",
        location.latitude
    );
    ensure!(
        (-180.0..=180.0).contains(&location.longitude),
        "Longitude must be between -180 and 180, got {}",
        location.longitude
    );
    Ok(())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query, json } => {
                let config = Config::load()?;
                let options = query.to_options(&config)?;
                let client = config.client();

                let data = client.get(&options).await.context("Failed to fetch weather data")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                } else {
                    print!("{}", render::render(&data)?);
                }
                Ok(())
            }
            Command::Url { query } => {
                let config = Config::load()?;
                let options = query.to_options(&config)?;

                println!("{}", config.client().redacted_url(&options)?);
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("Commercial API key (leave empty for the free API):")
        .without_confirmation()
        .prompt()?;
    config.set_api_key(&key);

    let current = config.location.unwrap_or(Location { latitude: 52.52, longitude: 13.41 });
    let latitude = CustomType::<f64>::new("Default latitude:")
        .with_default(current.latitude)
        .with_error_message("Please type a number, e.g. 52.52")
        .prompt()?;
    let longitude = CustomType::<f64>::new("Default longitude:")
        .with_default(current.longitude)
        .with_error_message("Please type a number, e.g. 13.41")
        .prompt()?;
    validate_coordinates(Location { latitude, longitude })?;
    config.set_location(latitude, longitude);

    let units = &mut config.units;
    units.temperature =
        Some(select_unit("Temperature unit:", TemperatureUnit::all(), units.temperature)?);
    units.wind_speed =
        Some(select_unit("Wind speed unit:", WindSpeedUnit::all(), units.wind_speed)?);
    units.precipitation =
        Some(select_unit("Precipitation unit:", PrecipitationUnit::all(), units.precipitation)?);

    let timezone = Text::new("Timezone (IANA name or 'auto'):")
        .with_default(config.timezone.as_deref().unwrap_or("auto"))
        .prompt()?;
    config.timezone = Some(timezone.trim().to_string()).filter(|tz| !tz.is_empty());

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

fn select_unit<T>(message: &str, all: &[T], current: Option<T>) -> anyhow::Result<T>
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let cursor = current.and_then(|c| all.iter().position(|u| *u == c)).unwrap_or(0);
    let unit = Select::new(message, all.to_vec()).with_starting_cursor(cursor).prompt()?;
    Ok(unit)
}
