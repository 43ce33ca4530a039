//! Weather tool: 7-day forecast via Open-Meteo (free, no API key).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::geocode::{geocode_city, http_client};
use super::Tool;

/// Get a 7-day weather forecast for a city.
pub struct GetWeatherForecast;

#[async_trait]
impl Tool for GetWeatherForecast {
    fn name(&self) -> &str {
        "get_weather_forecast"
    }

    fn description(&self) -> &str {
        "Get a 7-day weather forecast for a given city: daily temperature range, precipitation, and wind speed. Use this to ground packing advice and itinerary planning in real conditions."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "Name of the city, e.g. 'Paris', 'Goa', 'Tokyo'"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let city = args["city"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'city' argument"))?;

        let client = http_client()?;

        let Some(location) = geocode_city(&client, city).await? else {
            return Ok(format!("Could not find location data for '{}'.", city));
        };

        let response = client
            .get("https://api.open-meteo.com/v1/forecast")
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max,weathercode"
                        .to_string(),
                ),
                ("timezone", "auto".to_string()),
                ("forecast_days", "7".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ForecastResponse = response.json().await?;
        let daily = body.daily.unwrap_or_default();

        let mut lines = vec![format!(
            "7-day weather forecast for {}, {}\n",
            location.name, location.country
        )];
        for (i, date) in daily.time.iter().enumerate() {
            let code = daily.weathercode.get(i).copied().unwrap_or(0);
            lines.push(format!(
                "  {}: {} | {}°C – {}°C | precipitation {} mm | wind {} km/h",
                date,
                wmo_description(code),
                daily.temperature_2m_min.get(i).copied().unwrap_or(0.0),
                daily.temperature_2m_max.get(i).copied().unwrap_or(0.0),
                daily.precipitation_sum.get(i).copied().unwrap_or(0.0),
                daily.windspeed_10m_max.get(i).copied().unwrap_or(0.0),
            ));
        }

        Ok(lines.join("\n"))
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyForecast>,
}

#[derive(Debug, Default, Deserialize)]
struct DailyForecast {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<f64>,
    #[serde(default)]
    windspeed_10m_max: Vec<f64>,
    #[serde(default)]
    weathercode: Vec<u32>,
}

/// WMO standard weather-code descriptions.
fn wmo_description(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snowfall",
        73 => "Moderate snowfall",
        75 => "Heavy snowfall",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wmo_codes_map_to_descriptions() {
        assert_eq!(wmo_description(0), "Clear sky");
        assert_eq!(wmo_description(63), "Moderate rain");
        assert_eq!(wmo_description(95), "Thunderstorm");
        assert_eq!(wmo_description(42), "Unknown");
    }

    #[test]
    fn daily_forecast_tolerates_missing_fields() {
        let body: ForecastResponse = serde_json::from_str(
            r#"{"daily":{"time":["2026-08-25"],"temperature_2m_max":[28.1]}}"#,
        )
        .unwrap();
        let daily = body.daily.unwrap();
        assert_eq!(daily.time.len(), 1);
        assert!(daily.weathercode.is_empty());
    }
}
