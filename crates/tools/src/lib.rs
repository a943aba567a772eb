//! Data lookups for Voyager.
//!
//! The tool set is closed: weather and attractions. `ToolRegistry` holds
//! whichever of them are enabled and resolves a `ToolInvocation` through a
//! single `match`. Lookups never raise; failures come back as a result
//! with `LookupStatus::Failed`, which the formatter renders as an
//! "unavailable" sentence.

pub mod attractions;
pub mod format;
pub mod weather_lookup;

pub use attractions::AttractionsTool;
pub use format::format_output;
pub use weather_lookup::WeatherLookupTool;

use tracing::{info, warn};
use voyager_config::ToolsConfig;
use voyager_core::tool::{ToolInvocation, ToolKind, ToolOutput};

/// The enabled lookups.
pub struct ToolRegistry {
    weather: Option<WeatherLookupTool>,
    attractions: Option<AttractionsTool>,
}

impl ToolRegistry {
    /// A registry with nothing enabled.
    pub fn empty() -> Self {
        Self {
            weather: None,
            attractions: None,
        }
    }

    /// Both lookups, weather in mock mode. Used by tests and offline runs.
    pub fn mock() -> Self {
        Self {
            weather: Some(WeatherLookupTool::mock()),
            attractions: Some(AttractionsTool),
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        let weather = config.weather.then(|| {
            WeatherLookupTool::new(
                config.openweather_api_key.clone(),
                config.openweather_url.clone(),
            )
        });
        let attractions = config.attractions.then_some(AttractionsTool);

        Self {
            weather,
            attractions,
        }
    }

    pub fn with_attractions(mut self, tool: AttractionsTool) -> Self {
        self.attractions = Some(tool);
        self
    }

    /// Whether `kind` is registered.
    pub fn supports(&self, kind: ToolKind) -> bool {
        match kind {
            ToolKind::Weather => self.weather.is_some(),
            ToolKind::Attractions => self.attractions.is_some(),
        }
    }

    /// Registered tools, in prompt order.
    pub fn kinds(&self) -> Vec<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .filter(|k| self.supports(*k))
            .collect()
    }

    /// Run one lookup. `None` when the tool is not registered.
    pub async fn dispatch(&self, invocation: &ToolInvocation) -> Option<ToolOutput> {
        let output = match invocation {
            ToolInvocation::Weather { city } => {
                ToolOutput::Weather(self.weather.as_ref()?.lookup(city).await)
            }
            ToolInvocation::Attractions { city } => {
                ToolOutput::Attractions(self.attractions.as_ref()?.lookup(city))
            }
        };

        if output.status().is_usable() {
            info!(tool = %invocation.kind(), status = ?output.status(), "Lookup complete");
        } else {
            warn!(tool = %invocation.kind(), city = invocation.city(), "Lookup failed");
        }
        Some(output)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::mock()
    }
}
