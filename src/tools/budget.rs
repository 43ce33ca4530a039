//! Budget tools: trip cost arithmetic and daily food-cost estimates.
//!
//! Pure local computation, no external calls.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

/// Calculate an estimated total trip budget and per-person breakdown.
pub struct CalculateTripBudget;

#[async_trait]
impl Tool for CalculateTripBudget {
    fn name(&self) -> &str {
        "calculate_trip_budget"
    }

    fn description(&self) -> &str {
        "Calculate an estimated total trip budget with a per-person and per-day cost breakdown, given per-day costs for accommodation, food, transport, and activities."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "num_days": {
                    "type": "integer",
                    "description": "Number of days for the trip"
                },
                "accommodation_per_night": {
                    "type": "number",
                    "description": "Cost of accommodation per night"
                },
                "food_per_day": {
                    "type": "number",
                    "description": "Estimated food/dining cost per day"
                },
                "transport_per_day": {
                    "type": "number",
                    "description": "Estimated local transport cost per day (taxi, metro, etc.)"
                },
                "activities_per_day": {
                    "type": "number",
                    "description": "Estimated cost of activities/attractions per day. Default 0."
                },
                "num_travelers": {
                    "type": "integer",
                    "description": "Number of travelers sharing costs. Default 1."
                },
                "miscellaneous_total": {
                    "type": "number",
                    "description": "One-time misc costs (SIM, tips, shopping). Default 0."
                },
                "currency": {
                    "type": "string",
                    "description": "Currency code for the estimates, e.g. 'USD', 'INR'. Default 'USD'."
                }
            },
            "required": ["num_days", "accommodation_per_night", "food_per_day", "transport_per_day"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let num_days = count_arg(&args, "num_days")
            .ok_or_else(|| anyhow::anyhow!("Missing or non-numeric 'num_days' argument"))?;
        let accommodation = number_arg(&args, "accommodation_per_night")?;
        let food = number_arg(&args, "food_per_day")?;
        let transport = number_arg(&args, "transport_per_day")?;
        let activities = args["activities_per_day"].as_f64().unwrap_or(0.0);
        let num_travelers = count_arg(&args, "num_travelers").unwrap_or(1);
        let miscellaneous = args["miscellaneous_total"].as_f64().unwrap_or(0.0);
        let currency = args["currency"].as_str().unwrap_or("USD");

        let breakdown = compute_budget(
            num_days,
            accommodation,
            food,
            transport,
            activities,
            num_travelers,
            miscellaneous,
        );

        Ok(breakdown.render(currency))
    }
}

fn number_arg(args: &Value, field: &str) -> anyhow::Result<f64> {
    args[field]
        .as_f64()
        .ok_or_else(|| anyhow::anyhow!("Missing or non-numeric '{}' argument", field))
}

/// Read a count, tolerating the float encoding models often emit (`5.0`).
fn count_arg(args: &Value, field: &str) -> Option<u64> {
    let value = &args[field];
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

/// Per-category totals for one trip.
#[derive(Debug, Clone, PartialEq)]
struct BudgetBreakdown {
    num_days: u64,
    num_travelers: u64,
    accommodation_per_night: f64,
    food_per_day: f64,
    transport_per_day: f64,
    activities_per_day: f64,
    accommodation_total: f64,
    food_total: f64,
    transport_total: f64,
    activities_total: f64,
    miscellaneous_total: f64,
    grand_total: f64,
    per_person: f64,
    per_person_per_day: f64,
}

fn compute_budget(
    num_days: u64,
    accommodation_per_night: f64,
    food_per_day: f64,
    transport_per_day: f64,
    activities_per_day: f64,
    num_travelers: u64,
    miscellaneous_total: f64,
) -> BudgetBreakdown {
    let days = num_days as f64;
    let accommodation_total = accommodation_per_night * days;
    let food_total = food_per_day * days;
    let transport_total = transport_per_day * days;
    let activities_total = activities_per_day * days;
    let grand_total =
        accommodation_total + food_total + transport_total + activities_total + miscellaneous_total;

    let per_person = if num_travelers > 0 {
        grand_total / num_travelers as f64
    } else {
        grand_total
    };
    let per_person_per_day = if num_days > 0 {
        per_person / days
    } else {
        per_person
    };

    BudgetBreakdown {
        num_days,
        num_travelers,
        accommodation_per_night,
        food_per_day,
        transport_per_day,
        activities_per_day,
        accommodation_total,
        food_total,
        transport_total,
        activities_total,
        miscellaneous_total,
        grand_total,
        per_person,
        per_person_per_day,
    }
}

impl BudgetBreakdown {
    fn render(&self, currency: &str) -> String {
        let travelers = if self.num_travelers == 1 {
            "traveler"
        } else {
            "travelers"
        };
        let rule = "=".repeat(50);
        let mut lines = vec![
            format!(
                "Trip budget estimate ({} days, {} {})",
                self.num_days, self.num_travelers, travelers
            ),
            rule.clone(),
            String::new(),
            format!(
                "  Accommodation: {:.2} x {} nights = {:.2} {}",
                self.accommodation_per_night, self.num_days, self.accommodation_total, currency
            ),
            format!(
                "  Food & dining: {:.2} x {} days = {:.2} {}",
                self.food_per_day, self.num_days, self.food_total, currency
            ),
            format!(
                "  Transport:     {:.2} x {} days = {:.2} {}",
                self.transport_per_day, self.num_days, self.transport_total, currency
            ),
            format!(
                "  Activities:    {:.2} x {} days = {:.2} {}",
                self.activities_per_day, self.num_days, self.activities_total, currency
            ),
            format!("  Miscellaneous: {:.2} {}", self.miscellaneous_total, currency),
            String::new(),
            rule,
            format!("  GRAND TOTAL:         {:.2} {}", self.grand_total, currency),
            format!("  Per person:          {:.2} {}", self.per_person, currency),
            format!(
                "  Per person per day:  {:.2} {}",
                self.per_person_per_day, currency
            ),
        ];
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Estimate daily food costs for a city and budget level.
pub struct EstimateDailyFoodCost;

#[async_trait]
impl Tool for EstimateDailyFoodCost {
    fn name(&self) -> &str {
        "estimate_daily_food_cost"
    }

    fn description(&self) -> &str {
        "Estimate daily food costs for a given city and budget level ('budget', 'mid-range', 'luxury'). Returns an estimated per-person range in USD."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g. 'Bangkok', 'London', 'Mumbai'"
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

        let base_cost = city_base_cost(city);
        let (multiplier, dining) = budget_multiplier(budget_level);

        let estimated = round2(base_cost * multiplier);
        let low = round2(estimated * 0.8);
        let high = round2(estimated * 1.3);

        let lines = vec![
            format!("Estimated daily food cost in {} ({}):", city, budget_level),
            format!("  Range: ${} - ${} USD per person per day", low, high),
            format!("  Average: ~${} USD", estimated),
            format!("  Includes: {}", dining),
            String::new(),
            "  Note: these are estimates; actual costs vary with the restaurants chosen."
                .to_string(),
        ];
        Ok(lines.join("\n"))
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Approximate base daily food cost by city, in USD.
fn city_base_cost(city: &str) -> f64 {
    match city.trim().to_lowercase().as_str() {
        // South/Southeast Asia
        "goa" => 15.0,
        "mumbai" => 18.0,
        "delhi" => 16.0,
        "bangalore" => 17.0,
        "jaipur" => 14.0,
        "bangkok" => 15.0,
        "bali" => 14.0,
        "hanoi" => 12.0,
        "singapore" => 35.0,
        "tokyo" => 40.0,
        "kyoto" => 35.0,
        "seoul" => 30.0,
        "osaka" => 35.0,
        // Europe
        "paris" => 45.0,
        "london" => 50.0,
        "rome" => 35.0,
        "barcelona" => 35.0,
        "amsterdam" => 40.0,
        "berlin" => 30.0,
        "prague" => 25.0,
        "lisbon" => 28.0,
        // Americas
        "new york" => 50.0,
        "los angeles" => 45.0,
        "miami" => 40.0,
        "cancun" => 25.0,
        "rio de janeiro" => 22.0,
        "buenos aires" => 20.0,
        // Middle East / Africa
        "dubai" => 40.0,
        "istanbul" => 20.0,
        "cairo" => 12.0,
        "cape town" => 22.0,
        // Oceania
        "sydney" => 45.0,
        "melbourne" => 42.0,
        "auckland" => 38.0,
        _ => 30.0,
    }
}

/// Multipliers over the base cost, with a description of the dining style.
fn budget_multiplier(level: &str) -> (f64, &'static str) {
    match level.trim().to_lowercase().as_str() {
        "budget" => (0.6, "street food, local eateries, markets"),
        "mid-range" => (1.0, "casual restaurants, cafes, occasional fine dining"),
        "luxury" => (2.0, "upscale restaurants, fine dining, premium experiences"),
        _ => (1.0, "mixed dining"),
    }
}
