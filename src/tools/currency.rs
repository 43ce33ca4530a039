//! Currency tools backed by the free ExchangeRate-API (open.er-api.com).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::geocode::http_client;
use super::Tool;

/// Convert an amount between currencies using live exchange rates.
pub struct ConvertCurrency;

#[async_trait]
impl Tool for ConvertCurrency {
    fn name(&self) -> &str {
        "convert_currency"
    }

    fn description(&self) -> &str {
        "Convert an amount from one currency to another using live exchange rates. Returns the converted amount and the rate used."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {
                    "type": "number",
                    "description": "The monetary amount to convert, e.g. 100.0"
                },
                "from_currency": {
                    "type": "string",
                    "description": "Source currency code, e.g. 'USD', 'EUR', 'INR'"
                },
                "to_currency": {
                    "type": "string",
                    "description": "Target currency code, e.g. 'INR', 'JPY', 'GBP'"
                }
            },
            "required": ["amount", "from_currency", "to_currency"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let amount = args["amount"]
            .as_f64()
            .ok_or_else(|| anyhow::anyhow!("Missing 'amount' argument"))?;
        let from = currency_code(&args, "from_currency")?;
        let to = currency_code(&args, "to_currency")?;

        let client = http_client()?;
        let response = client
            .get(format!("https://open.er-api.com/v6/latest/{}", from))
            .send()
            .await?
            .error_for_status()?;

        let body: RatesResponse = response.json().await?;

        if body.result.as_deref() != Some("success") {
            return Ok(format!("Failed to fetch exchange rates for {}.", from));
        }

        let Some(rate) = body.rates.get(&to).copied() else {
            let mut known: Vec<&str> = body.rates.keys().map(String::as_str).collect();
            known.sort_unstable();
            let preview = known
                .into_iter()
                .take(20)
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(format!(
                "Currency '{}' not found. Available currencies include: {}...",
                to, preview
            ));
        };

        let converted = (amount * rate * 100.0).round() / 100.0;

        Ok(format!(
            "Currency conversion:\n  {:.2} {} = {:.2} {}\n  Exchange rate: 1 {} = {} {}\n  Last updated: {}",
            amount,
            from,
            converted,
            to,
            from,
            rate,
            to,
            body.time_last_update_utc.as_deref().unwrap_or("N/A"),
        ))
    }
}

/// Get the current rate between two currencies. Delegates to
/// `convert_currency` with an amount of 1.0.
pub struct GetExchangeRate;

#[async_trait]
impl Tool for GetExchangeRate {
    fn name(&self) -> &str {
        "get_exchange_rate"
    }

    fn description(&self) -> &str {
        "Get the current exchange rate between two currencies."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from_currency": {
                    "type": "string",
                    "description": "Source currency code, e.g. 'USD'"
                },
                "to_currency": {
                    "type": "string",
                    "description": "Target currency code, e.g. 'EUR'"
                }
            },
            "required": ["from_currency", "to_currency"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let from = currency_code(&args, "from_currency")?;
        let to = currency_code(&args, "to_currency")?;

        ConvertCurrency
            .execute(json!({
                "amount": 1.0,
                "from_currency": from,
                "to_currency": to,
            }))
            .await
    }
}

/// Extract and normalize a currency-code argument.
fn currency_code(args: &Value, field: &str) -> anyhow::Result<String> {
    args[field]
        .as_str()
        .map(|s| s.trim().to_uppercase())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", field))
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    result: Option<String>,
    #[serde(default)]
    rates: std::collections::HashMap<String, f64>,
    time_last_update_utc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_codes_are_normalized() {
        let args = json!({"from_currency": " usd ", "to_currency": "inr"});
        assert_eq!(currency_code(&args, "from_currency").unwrap(), "USD");
        assert_eq!(currency_code(&args, "to_currency").unwrap(), "INR");
        assert!(currency_code(&args, "amount").is_err());
    }

    #[test]
    fn rates_response_parses() {
        let body: RatesResponse = serde_json::from_str(
            r#"{"result":"success","rates":{"INR":83.2,"EUR":0.92},"time_last_update_utc":"Tue, 25 Aug 2026 00:02:31 +0000"}"#,
        )
        .unwrap();
        assert_eq!(body.result.as_deref(), Some("success"));
        assert_eq!(body.rates.get("INR").copied(), Some(83.2));
    }
}
