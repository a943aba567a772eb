//! Weather lookup — OpenWeatherMap when a key is configured, mock otherwise.
//!
//! The mock answer is fixed (22°C, partly cloudy) so conversations stay
//! reproducible without network access.

use serde::Deserialize;
use tracing::{debug, warn};
use voyager_core::error::ToolError;
use voyager_core::tool::{LookupStatus, WeatherReport};

/// Mock temperature in °C.
pub const MOCK_TEMPERATURE_C: f64 = 22.0;
/// Mock conditions text.
pub const MOCK_DESCRIPTION: &str = "partly cloudy";

pub struct WeatherLookupTool {
    api_key: Option<String>,
    url: String,
    client: reqwest::Client,
}

impl WeatherLookupTool {
    /// A lookup that always answers with mock data.
    pub fn mock() -> Self {
        Self::new(None, "https://api.openweathermap.org/data/2.5/weather")
    }

    pub fn new(api_key: Option<String>, url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            url: url.into(),
            client,
        }
    }

    pub fn is_live(&self) -> bool {
        self.api_key.is_some()
    }

    /// Look up current weather. Never fails: errors become a `Failed` report.
    pub async fn lookup(&self, city: &str) -> WeatherReport {
        let city = city.trim();
        let Some(api_key) = &self.api_key else {
            debug!(city, "No weather key configured, returning mock data");
            return WeatherReport::new(
                LookupStatus::Mock,
                city,
                MOCK_TEMPERATURE_C,
                MOCK_DESCRIPTION,
            );
        };

        match self.fetch(city, api_key).await {
            Ok(report) => report,
            Err(e) => {
                warn!(city, error = %e, "Weather lookup failed");
                WeatherReport::failed(city, e.to_string())
            }
        }
    }

    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherReport, ToolError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(ToolError::NotFound(format!("could not find '{city}'")));
        }
        if status != 200 {
            return Err(ToolError::ExecutionFailed {
                tool_name: "weather".into(),
                reason: format!("upstream returned status {status}"),
            });
        }

        let body: OwmResponse = response.json().await.map_err(|e| ToolError::ExecutionFailed {
            tool_name: "weather".into(),
            reason: format!("unreadable response: {e}"),
        })?;

        Ok(body.into_report(city))
    }
}

// --- OpenWeatherMap response (subset) ---

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    name: Option<String>,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

impl OwmResponse {
    fn into_report(self, requested: &str) -> WeatherReport {
        let city = self
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| requested.to_string());
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_else(|| "conditions unknown".into());
        let temperature = (self.main.temp * 10.0).round() / 10.0;
        WeatherReport::new(LookupStatus::Ok, city, temperature, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_key_returns_mock() {
        let tool = WeatherLookupTool::mock();
        assert!(!tool.is_live());

        let report = tool.lookup(" Tokyo ").await;
        assert_eq!(report.status, LookupStatus::Mock);
        assert_eq!(report.city, "Tokyo");
        assert_eq!(report.temperature_c, Some(22.0));
        assert_eq!(report.description.as_deref(), Some("partly cloudy"));
    }

    #[tokio::test]
    async fn blank_key_is_treated_as_missing() {
        let tool = WeatherLookupTool::new(Some("  ".into()), "http://127.0.0.1:9/weather");
        assert!(!tool.is_live());
        assert_eq!(tool.lookup("Paris").await.status, LookupStatus::Mock);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_failed_status() {
        let tool = WeatherLookupTool::new(Some("k".into()), "http://127.0.0.1:9/weather");
        let report = tool.lookup("Paris").await;
        assert_eq!(report.status, LookupStatus::Failed);
        assert!(report.detail.is_some());
        assert!(report.temperature_c.is_none());
    }

    #[test]
    fn owm_body_maps_to_report() {
        let body: OwmResponse = serde_json::from_str(
            r#"{"name":"Tokyo","main":{"temp":18.46,"humidity":70},"weather":[{"main":"Rain","description":"light rain"}]}"#,
        )
        .unwrap();
        let report = body.into_report("tokyo");
        assert_eq!(report.status, LookupStatus::Ok);
        assert_eq!(report.city, "Tokyo");
        assert_eq!(report.temperature_c, Some(18.5));
        assert_eq!(report.description.as_deref(), Some("light rain"));
    }

    #[test]
    fn owm_body_without_conditions() {
        let body: OwmResponse = serde_json::from_str(r#"{"main":{"temp":3.0}}"#).unwrap();
        let report = body.into_report("Oslo");
        assert_eq!(report.city, "Oslo");
        assert_eq!(report.description.as_deref(), Some("conditions unknown"));
    }
}
