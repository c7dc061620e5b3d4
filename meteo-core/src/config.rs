use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    client::Client,
    options::OptionsBuilder,
    units::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit},
};

/// Default coordinates used when a command does not pass any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Preferred units. Unset units are left to the API default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitPreferences {
    pub temperature: Option<TemperatureUnit>,
    pub wind_speed: Option<WindSpeedUnit>,
    pub precipitation: Option<PrecipitationUnit>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timezone = "auto"
///
/// [location]
/// latitude = 52.52
/// longitude = 13.41
///
/// [units]
/// temperature = "fahrenheit"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Commercial API key. Absent means the free API.
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
    pub timezone: Option<String>,
    pub location: Option<Location>,
    pub units: UnitPreferences,
}

impl Config {
    /// Return the default location, or a hint on how to set one.
    pub fn default_location(&self) -> Result<Location> {
        self.location.ok_or_else(|| {
            anyhow!(
                "No default location configured.\n\
                 Hint: pass --lat and --lon, or run `meteo configure` first."
            )
        })
    }

    pub fn set_location(&mut self, latitude: f64, longitude: f64) {
        self.location = Some(Location { latitude, longitude });
    }

    /// Set or clear the API key. Blank input clears it.
    pub fn set_api_key(&mut self, api_key: &str) {
        let api_key = api_key.trim();
        self.api_key = (!api_key.is_empty()).then(|| api_key.to_string());
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build a client from the stored key and user agent.
    pub fn client(&self) -> Client {
        let client = match &self.api_key {
            Some(key) => Client::with_key(key.clone()),
            None => Client::new(),
        };

        match &self.user_agent {
            Some(ua) => client.with_user_agent(ua.clone()),
            None => client,
        }
    }

    /// Seed a builder with the configured units, timezone and location.
    pub fn apply(&self, mut builder: OptionsBuilder) -> OptionsBuilder {
        if let Some(loc) = self.location {
            builder = builder.location(loc.latitude, loc.longitude);
        }
        if let Some(unit) = self.units.temperature {
            builder = builder.temperature_unit(unit);
        }
        if let Some(unit) = self.units.wind_speed {
            builder = builder.wind_speed_unit(unit);
        }
        if let Some(unit) = self.units.precipitation {
            builder = builder.precipitation_unit(unit);
        }
        if let Some(tz) = &self.timezone {
            builder = builder.timezone(tz.clone());
        }
        builder
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "open-meteo", "meteo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn default_location_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_location().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No default location configured"));
        assert!(msg.contains("Hint: pass --lat and --lon"));
    }

    #[test]
    fn set_location_and_read_back() {
        let mut cfg = Config::default();
        cfg.set_location(52.52, 13.41);

        let loc = cfg.default_location().expect("location must exist");
        assert_eq!(loc, Location { latitude: 52.52, longitude: 13.41 });
    }

    #[test]
    fn blank_api_key_clears_key() {
        let mut cfg = Config::default();

        cfg.set_api_key("  KEY  ");
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert!(cfg.client().has_api_key());

        cfg.set_api_key("   ");
        assert!(!cfg.has_api_key());
        assert!(!cfg.client().has_api_key());
    }

    #[test]
    fn client_uses_configured_user_agent() {
        let cfg = Config { user_agent: Some("my-station/1.0".into()), ..Default::default() };
        assert_eq!(cfg.client().user_agent(), "my-station/1.0");
    }

    #[test]
    fn apply_seeds_builder() {
        let mut cfg = Config {
            timezone: Some("auto".into()),
            units: UnitPreferences {
                temperature: Some(TemperatureUnit::Fahrenheit),
                wind_speed: None,
                precipitation: Some(PrecipitationUnit::Inch),
            },
            ..Default::default()
        };
        cfg.set_location(37.7749, -122.4194);

        let opts = cfg.apply(Options::builder()).forecast_days(1).build();

        assert_eq!(opts.latitude, 37.7749);
        assert_eq!(opts.longitude, -122.4194);
        assert_eq!(opts.temperature_unit, Some(TemperatureUnit::Fahrenheit));
        assert_eq!(opts.wind_speed_unit, None);
        assert_eq!(opts.precipitation_unit, Some(PrecipitationUnit::Inch));
        assert_eq!(opts.timezone.as_deref(), Some("auto"));
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY");
        cfg.set_location(1.5, -2.25);
        cfg.units.wind_speed = Some(WindSpeedUnit::Kn);
        cfg.save_to(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("wind_speed = \"kn\""));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[units]\ntemperature = \"kelvin\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
