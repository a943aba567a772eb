//! Payload formatter — turns lookup results into short prompt fragments.
//!
//! Formatting never fails. A `Failed` result becomes an "unavailable"
//! sentence so the model can tell the user the data is missing instead of
//! guessing.

use voyager_core::tool::{AttractionList, LookupStatus, ToolOutput, WeatherReport};

/// Format any lookup result.
pub fn format_output(output: &ToolOutput) -> String {
    match output {
        ToolOutput::Weather(report) => format_weather(report),
        ToolOutput::Attractions(list) => format_attractions(list),
    }
}

pub fn format_weather(report: &WeatherReport) -> String {
    match (report.status, report.temperature_c, &report.description) {
        (LookupStatus::Ok | LookupStatus::Mock, Some(temp), Some(description)) => {
            format!("Weather in {}: {}°C, {}.", report.city, temp, description)
        }
        _ => format!(
            "Weather information for {} is currently unavailable.",
            report.city
        ),
    }
}

pub fn format_attractions(list: &AttractionList) -> String {
    if list.status == LookupStatus::Failed {
        return format!(
            "Attraction information for {} is currently unavailable.",
            list.city
        );
    }

    if list.items.is_empty() {
        return format!("No attractions found for {}.", list.city);
    }

    let mut out = format!("Top attractions in {}:", list.city);
    for item in &list.items {
        out.push_str("\n- ");
        out.push_str(item);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_weather_sentence() {
        let report = WeatherReport::new(LookupStatus::Mock, "Tokyo", 22.0, "partly cloudy");
        assert_eq!(
            format_weather(&report),
            "Weather in Tokyo: 22°C, partly cloudy."
        );
    }

    #[test]
    fn fractional_temperature_kept() {
        let report = WeatherReport::new(LookupStatus::Ok, "Oslo", -3.5, "snow");
        assert_eq!(format_weather(&report), "Weather in Oslo: -3.5°C, snow.");
    }

    #[test]
    fn failed_weather_is_unavailable() {
        let report = WeatherReport::failed("Narnia", "could not find 'Narnia'");
        let text = format_weather(&report);
        assert!(text.contains("unavailable"));
        assert!(!text.contains("could not find"));
    }

    #[test]
    fn attractions_as_bullets() {
        let list = AttractionList {
            status: LookupStatus::Mock,
            city: "Paris".into(),
            items: vec!["Eiffel Tower".into(), "Louvre Museum".into()],
            detail: None,
        };
        assert_eq!(
            format_output(&ToolOutput::Attractions(list)),
            "Top attractions in Paris:\n- Eiffel Tower\n- Louvre Museum"
        );
    }

    #[test]
    fn empty_and_failed_attractions() {
        let empty = AttractionList {
            status: LookupStatus::Mock,
            city: "Atlantis".into(),
            items: vec![],
            detail: None,
        };
        assert_eq!(format_attractions(&empty), "No attractions found for Atlantis.");

        let failed = AttractionList::failed("Rome", "timeout");
        assert!(format_attractions(&failed).contains("unavailable"));
    }
}
