//! Shared city geocoding via the free Open-Meteo geocoding API.

use std::time::Duration;

use serde::Deserialize;

/// Per-call HTTP timeout for the external lookup services.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    latitude: f64,
    longitude: f64,
    name: Option<String>,
    country: Option<String>,
}

/// A resolved city location.
#[derive(Debug, Clone)]
pub(crate) struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country: String,
}

/// Resolve a city name to coordinates. Returns `Ok(None)` when the service
/// has no match, so callers can report it as tool text rather than an error.
pub(crate) async fn geocode_city(
    client: &reqwest::Client,
    city: &str,
) -> anyhow::Result<Option<GeoPoint>> {
    let response = client
        .get("https://geocoding-api.open-meteo.com/v1/search")
        .query(&[("name", city), ("count", "1")])
        .send()
        .await?
        .error_for_status()?;

    let body: GeocodeResponse = response.json().await?;
    let Some(first) = body.results.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.remove(0))
        }
    }) else {
        return Ok(None);
    };

    Ok(Some(GeoPoint {
        latitude: first.latitude,
        longitude: first.longitude,
        name: first.name.unwrap_or_else(|| city.to_string()),
        country: first.country.unwrap_or_default(),
    }))
}

/// Build the HTTP client used by the lookup tools.
pub(crate) fn http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent("trip-planner/0.1")
        .timeout(HTTP_TIMEOUT)
        .build()?)
}
