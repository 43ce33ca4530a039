//! Place search tools: attractions, restaurants, and hotels via OpenStreetMap.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::geocode::{geocode_city, http_client};
use super::Tool;

const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const SEARCH_RADIUS_METERS: u32 = 10_000;
const MAX_RESULTS: usize = 15;

/// Search for places (attractions, restaurants, hotels) in a city.
pub struct SearchPlaces;

#[async_trait]
impl Tool for SearchPlaces {
    fn name(&self) -> &str {
        "search_places"
    }

    fn description(&self) -> &str {
        "Search for places (attractions, restaurants, hotels) in a given city. Returns a list of places with names, addresses, and available details. Categories: 'tourism.attraction', 'tourism.sights', 'catering.restaurant', 'accommodation.hotel'."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for, e.g. 'best restaurants', 'top attractions'"
                },
                "city": {
                    "type": "string",
                    "description": "The city to search in, e.g. 'Goa', 'Tokyo'"
                },
                "category": {
                    "type": "string",
                    "description": "Category filter. One of 'tourism.attraction', 'tourism.sights', 'catering.restaurant', 'accommodation.hotel'. Default 'tourism.attraction'."
                }
            },
            "required": ["query", "city"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;
        let city = args["city"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'city' argument"))?;
        let category = args["category"].as_str().unwrap_or("tourism.attraction");

        let client = http_client()?;

        let Some(location) = geocode_city(&client, city).await? else {
            return Ok(format!("Could not find location data for '{}'.", city));
        };

        let overpass_query =
            build_overpass_query(category, location.latitude, location.longitude);

        let response = client
            .post(OVERPASS_URL)
            .form(&[("data", overpass_query)])
            .send()
            .await?
            .error_for_status()?;

        let body: OverpassResponse = response.json().await?;

        if body.elements.is_empty() {
            return Ok(format!(
                "No results found for '{}' in {} (category: {}).",
                query, city, category
            ));
        }

        let mut lines = vec![format!(
            "Results for '{}' in {} (showing top {}):\n",
            query, city, MAX_RESULTS
        )];
        for (i, element) in body.elements.iter().take(MAX_RESULTS).enumerate() {
            lines.push(format!("  {}. {}", i + 1, format_place(element, city)));
        }

        Ok(lines.join("\n"))
    }
}

/// Search for hotels in a city by budget level. Delegates to `search_places`
/// with the hotel category.
pub struct SearchHotels;

#[async_trait]
impl Tool for SearchHotels {
    fn name(&self) -> &str {
        "search_hotels"
    }

    fn description(&self) -> &str {
        "Search for hotels in a given city based on budget level ('budget', 'mid-range', 'luxury'). Returns a list of hotel options."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The city to search hotels in, e.g. 'Paris', 'Mumbai'"
                },
                "budget_level": {
                    "type": "string",
                    "description": "One of 'budget', 'mid-range', 'luxury'. Default 'mid-range'."
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let city = args["city"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'city' argument"))?;
        let budget_level = args["budget_level"].as_str().unwrap_or("mid-range");

        SearchPlaces
            .execute(json!({
                "query": format!("{} hotels", budget_level),
                "city": city,
                "category": "accommodation.hotel",
            }))
            .await
    }
}

/// Map a category name to an Overpass query over the matching OSM tags.
fn build_overpass_query(category: &str, lat: f64, lon: f64) -> String {
    let osm_tag = match category {
        "tourism.sights" => r#"["tourism"~"attraction|museum|viewpoint|artwork"]"#,
        "catering.restaurant" => r#"["amenity"="restaurant"]"#,
        "accommodation.hotel" => r#"["tourism"~"hotel|motel|hostel|guest_house"]"#,
        _ => r#"["tourism"="attraction"]"#,
    };

    format!(
        "[out:json][timeout:15];\n(\n  node{tag}(around:{radius},{lat},{lon});\n  way{tag}(around:{radius},{lat},{lon});\n);\nout center {max};",
        tag = osm_tag,
        radius = SEARCH_RADIUS_METERS,
        lat = lat,
        lon = lon,
        max = MAX_RESULTS,
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Default, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: std::collections::HashMap<String, String>,
}

/// Render one OSM element as a single result line.
fn format_place(element: &OverpassElement, city: &str) -> String {
    let tags = &element.tags;
    let name = tags
        .get("name")
        .or_else(|| tags.get("name:en"))
        .map(String::as_str)
        .unwrap_or("Unnamed");

    let mut details = Vec::new();
    if let Some(street) = tags.get("addr:street") {
        let addr_city = tags.get("addr:city").map(String::as_str).unwrap_or(city);
        details.push(format!("{}, {}", street, addr_city));
    }
    if let Some(cuisine) = tags.get("cuisine") {
        details.push(format!("Cuisine: {}", cuisine));
    }
    if let Some(stars) = tags.get("stars") {
        details.push(format!("Stars: {}", stars));
    }
    if let Some(hours) = tags.get("opening_hours") {
        details.push(format!("Hours: {}", hours));
    }
    if let Some(phone) = tags.get("phone") {
        details.push(format!("Phone: {}", phone));
    }
    if let Some(website) = tags.get("website") {
        details.push(website.clone());
    }

    if details.is_empty() {
        format!("{} — no additional details available", name)
    } else {
        format!("{} — {}", name, details.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overpass_query_maps_categories_to_osm_tags() {
        let q = build_overpass_query("catering.restaurant", 15.5, 73.8);
        assert!(q.contains(r#"node["amenity"="restaurant"](around:10000,15.5,73.8)"#));
        assert!(q.contains("out center 15"));

        // Unknown categories fall back to plain attractions
        let q = build_overpass_query("something.else", 0.0, 0.0);
        assert!(q.contains(r#""tourism"="attraction""#));
    }

    #[test]
    fn place_formatting_collects_known_tags() {
        let mut element = OverpassElement::default();
        element.tags.insert("name".into(), "Basilica of Bom Jesus".into());
        element.tags.insert("addr:street".into(), "Old Goa Rd".into());
        element.tags.insert("opening_hours".into(), "09:00-18:30".into());

        let line = format_place(&element, "Goa");
        assert!(line.starts_with("Basilica of Bom Jesus — "));
        assert!(line.contains("Old Goa Rd, Goa"));
        assert!(line.contains("Hours: 09:00-18:30"));
    }

    #[test]
    fn unnamed_places_still_render() {
        let element = OverpassElement::default();
        assert_eq!(
            format_place(&element, "Goa"),
            "Unnamed — no additional details available"
        );
    }
}
