//! Plain-text rendering of a decoded response.

use std::fmt::Write;

use meteo_core::{WeatherData, model::parse_time, weather_code};
use serde_json::{Map, Value};

const SERIES: [&str; 4] = ["hourly", "daily", "weekly", "monthly"];

pub fn render(data: &WeatherData) -> anyhow::Result<String> {
    let mut out = String::new();

    writeln!(
        out,
        "Location: {:.4}, {:.4} (elevation {} m)",
        data.latitude, data.longitude, data.elevation
    )?;
    if !data.timezone.is_empty() {
        writeln!(out, "Timezone: {} ({})", data.timezone, data.timezone_abbreviation)?;
    }

    let value = serde_json::to_value(data)?;

    if let Some(Value::Object(current)) = value.get("current") {
        let units = units_of(&value, "current");
        let time = current.get("time").and_then(Value::as_str).unwrap_or("-");

        writeln!(out, "\nCurrent conditions at {}:", display_time(time))?;
        for (name, v) in current.iter() {
            if matches!(name.as_str(), "time" | "interval") {
                continue;
            }
            writeln!(out, "  {name}: {}", format_value(name, v, units))?;
        }
    }

    for interval in SERIES {
        let Some(Value::Object(series)) = value.get(interval) else {
            continue;
        };
        render_series(&mut out, interval, series, units_of(&value, interval))?;
    }

    Ok(out)
}

fn render_series(
    out: &mut String,
    interval: &str,
    series: &Map<String, Value>,
    units: Option<&Map<String, Value>>,
) -> anyhow::Result<()> {
    let times: Vec<&str> = series
        .get("time")
        .and_then(Value::as_array)
        .map(|t| t.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    writeln!(out, "\n{interval} ({} steps):", times.len())?;

    let columns: Vec<(&String, &Vec<Value>)> = series
        .iter()
        .filter(|(name, _)| name.as_str() != "time")
        .filter_map(|(name, v)| v.as_array().map(|values| (name, values)))
        .collect();

    for (i, time) in times.iter().enumerate() {
        let cells: Vec<String> = columns
            .iter()
            .map(|(name, values)| {
                let v = values.get(i).unwrap_or(&Value::Null);
                format!("{name}={}", format_value(name, v, units))
            })
            .collect();
        writeln!(out, "  {}  {}", display_time(time), cells.join("  "))?;
    }

    Ok(())
}

/// `2025-07-15T06:00` becomes `2025-07-15 06:00`; dates and anything
/// unparsable are shown as sent.
fn display_time(raw: &str) -> String {
    match parse_time(raw) {
        Some(t) if raw.contains('T') => t.format("%Y-%m-%d %H:%M").to_string(),
        _ => raw.to_string(),
    }
}

fn units_of<'a>(value: &'a Value, interval: &str) -> Option<&'a Map<String, Value>> {
    value.get(format!("{interval}_units")).and_then(Value::as_object)
}

fn format_value(name: &str, value: &Value, units: Option<&Map<String, Value>>) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Number(n) if name == "weather_code" => match n.as_i64() {
            Some(code) => format!("{code} ({})", weather_code::describe(code)),
            None => n.to_string(),
        },
        Value::Number(n) => {
            let unit = units
                .and_then(|u| u.get(name))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if unit.is_empty() { n.to_string() } else { format!("{n} {unit}") }
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
