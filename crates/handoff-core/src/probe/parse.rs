//! Liveness body check.

/// Field/value pair a liveness response must carry to identify the companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessMarker {
    pub field: String,
    pub value: String,
}

impl LivenessMarker {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True only if `body` is a JSON object whose `field` is the string `value`.
    /// Anything else (non-JSON, wrong type, other value) is a different service.
    pub fn matches(&self, body: &[u8]) -> bool {
        let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) else {
            return false;
        };
        json.get(&self.field)
            .and_then(|v| v.as_str())
            .is_some_and(|v| v == self.value)
    }
}
