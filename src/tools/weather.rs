//! Weather lookup tool
//!
//! Deterministic stub: returns a fixed-shape forecast for the requested
//! location. A real deployment would swap the body for a live lookup while
//! keeping the error-to-text contract. Models expect tool results as JSON;
//! a result that doesn't look plausible for the prompt tends to get ignored.

use super::{Tool, ToolArgs};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

pub struct WeatherTool;

#[derive(Serialize)]
struct Forecast<'a> {
    location: &'a str,
    forecast: &'a str,
    high: i32,
    unit: &'a str,
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> String {
        "Get the current weather forecast for a provided location".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "required": ["location"],
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The name of the city for the weather forecast"
                }
            }
        })
    }

    async fn invoke(&self, args: &ToolArgs) -> String {
        let Some(location) = args.get("location").and_then(Value::as_str) else {
            return "Error: location parameter is required".to_string();
        };

        let forecast = Forecast {
            location,
            forecast: "cloudy",
            high: 53,
            unit: "Fahrenheit",
        };

        serde_json::to_string(&forecast)
            .unwrap_or_else(|e| format!("Error generating forecast data: {e}"))
    }
}
