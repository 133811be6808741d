//! Per-button tile configuration.

use std::fmt;

/// User-editable configuration of one tile.
///
/// A new `Settings` value always replaces the previous one wholesale; there
/// is no field-level merge. Field names on the wire match the property
/// inspector (`prometheusEndpoint`, `prometheusUsername`, ...).
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Base URL of the Prometheus HTTP API (e.g. `https://prom.example.com`).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "prometheusEndpoint", skip_serializing_if = "String::is_empty")
    )]
    pub endpoint: String,

    /// Basic-auth username.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "prometheusUsername", skip_serializing_if = "String::is_empty")
    )]
    pub username: String,

    /// Basic-auth password.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "prometheusPassword", skip_serializing_if = "String::is_empty")
    )]
    pub password: String,

    /// PromQL expression evaluated as an instant query.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "prometheusQuery", skip_serializing_if = "String::is_empty")
    )]
    pub query: String,

    /// Optional `"<warn>"` or `"<warn>,<crit>"` threshold specification.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub threshold: Option<String>,
}

impl Settings {
    /// Name of the first required field that is empty, if any.
    ///
    /// Endpoint, username, password and query are all required before a
    /// query may be attempted.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("endpoint", &self.endpoint),
            ("username", &self.username),
            ("password", &self.password),
            ("query", &self.query),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// The threshold specification, treating an empty string as absent.
    pub fn threshold_spec(&self) -> Option<&str> {
        self.threshold.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("query", &self.query)
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Settings {
        Settings {
            endpoint: "http://prometheus:9090".to_string(),
            username: "grafana".to_string(),
            password: "secret".to_string(),
            query: "up".to_string(),
            threshold: None,
        }
    }

    #[test]
    fn default_settings_are_incomplete() {
        let settings = Settings::default();
        assert_eq!(settings.missing_field(), Some("endpoint"));
        assert!(!settings.is_complete());
    }

    #[test]
    fn reports_first_missing_field() {
        let mut settings = complete();
        assert!(settings.is_complete());

        settings.password.clear();
        assert_eq!(settings.missing_field(), Some("password"));

        settings.username.clear();
        assert_eq!(settings.missing_field(), Some("username"));
    }

    #[test]
    fn blank_threshold_is_absent() {
        let mut settings = complete();
        assert_eq!(settings.threshold_spec(), None);

        settings.threshold = Some("   ".to_string());
        assert_eq!(settings.threshold_spec(), None);

        settings.threshold = Some("4,6".to_string());
        assert_eq!(settings.threshold_spec(), Some("4,6"));
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_property_inspector_layout() {
        let json = r#"{
            "prometheusEndpoint": "http://prometheus:9090",
            "prometheusUsername": "grafana",
            "prometheusPassword": "secret",
            "prometheusQuery": "sum(rate(http_requests_total[5m]))",
            "threshold": "100, 200"
        }"#;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.endpoint, "http://prometheus:9090");
        assert_eq!(settings.query, "sum(rate(http_requests_total[5m]))");
        assert_eq!(settings.threshold.as_deref(), Some("100, 200"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_keys_default_to_empty() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
