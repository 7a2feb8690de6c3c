use serde::{Deserialize, Serialize};

/// Normalized current conditions for a single city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    /// Two-letter country code, or "N/A" when the provider omits it.
    pub country_code: String,
    /// Already formatted, e.g. "18.5°C".
    pub temperature: String,
    pub description: String,
}

impl WeatherResult {
    /// Shown before the first query and after a failed one.
    pub fn placeholder() -> Self {
        Self {
            city: "CITY".to_string(),
            country_code: "CT".to_string(),
            temperature: "??.°C".to_string(),
            description: "Waiting for Input".to_string(),
        }
    }

    /// "Paris, FR"
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country_code)
    }
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}°C")
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
