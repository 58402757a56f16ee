use std::panic::Location;

use error_location::ErrorLocation;

/// Unique subscriber identifier (URL-safe base64 text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Wrap an id produced by the registry's generator.
    pub(crate) fn from_generated(value: String) -> Self {
        Self(value)
    }

    /// Parse an id that arrived from outside the process (e.g. a URL path).
    #[track_caller]
    pub fn parse(value: &str) -> Result<Self, crate::HubError> {
        let valid = !value.is_empty()
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        if !valid {
            return Err(crate::HubError::ValidationError {
                message: format!("Invalid subscriber_id: {}", value),
                field: Some("subscriber_id".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for SubscriberId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
