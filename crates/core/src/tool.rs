//! Tool domain types — the closed set of data lookups.
//!
//! Voyager knows exactly two lookups. Each is a variant carrying its own
//! typed argument (`ToolInvocation`) and its own typed result
//! (`ToolOutput`), so dispatch is a single `match` rather than a string
//! lookup.

use serde::{Deserialize, Serialize};

/// The tools the router may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Current weather for a city
    Weather,
    /// Top attractions for a city
    Attractions,
}

impl ToolKind {
    /// Every tool, in prompt order.
    pub const ALL: [ToolKind; 2] = [ToolKind::Weather, ToolKind::Attractions];

    /// Symbolic name, as used by the router prompt.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Attractions => "attractions",
        }
    }

    /// Build the typed invocation for this tool.
    pub fn invoke(self, city: impl Into<String>) -> ToolInvocation {
        let city = city.into();
        match self {
            Self::Weather => ToolInvocation::Weather { city },
            Self::Attractions => ToolInvocation::Attractions { city },
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A request to run one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub enum ToolInvocation {
    Weather { city: String },
    Attractions { city: String },
}

impl ToolInvocation {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Weather { .. } => ToolKind::Weather,
            Self::Attractions { .. } => ToolKind::Attractions,
        }
    }

    /// The location argument.
    pub fn city(&self) -> &str {
        match self {
            Self::Weather { city } | Self::Attractions { city } => city,
        }
    }
}

/// Where a lookup answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    /// Live data from the upstream service
    Ok,
    /// Built-in fallback data (no upstream configured)
    Mock,
    /// The lookup did not produce data
    Failed,
}

impl LookupStatus {
    /// Whether the result carries usable data.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Ok | Self::Mock)
    }
}

/// Raw weather lookup result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub status: LookupStatus,
    pub city: String,
    /// Temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    /// Short condition text, e.g. "partly cloudy"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Failure reason, when `status` is `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl WeatherReport {
    pub fn new(
        status: LookupStatus,
        city: impl Into<String>,
        temperature_c: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            status,
            city: city.into(),
            temperature_c: Some(temperature_c),
            description: Some(description.into()),
            detail: None,
        }
    }

    pub fn failed(city: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: LookupStatus::Failed,
            city: city.into(),
            temperature_c: None,
            description: None,
            detail: Some(detail.into()),
        }
    }
}

/// Raw attractions lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttractionList {
    pub status: LookupStatus,
    pub city: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AttractionList {
    pub fn failed(city: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: LookupStatus::Failed,
            city: city.into(),
            items: Vec::new(),
            detail: Some(detail.into()),
        }
    }
}

/// The result of one dispatched lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub enum ToolOutput {
    Weather(WeatherReport),
    Attractions(AttractionList),
}

impl ToolOutput {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Weather(_) => ToolKind::Weather,
            Self::Attractions(_) => ToolKind::Attractions,
        }
    }

    pub fn status(&self) -> LookupStatus {
        match self {
            Self::Weather(r) => r.status,
            Self::Attractions(r) => r.status,
        }
    }
}
