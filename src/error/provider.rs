//! Recognition of structured provider error payloads carried by stream `error` events.

use serde_json::Value;

/// Error details extracted from a known provider-error shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderErrorPayload {
    pub message: String,
    pub code: Option<String>,
    pub status: Option<u16>,
}

impl ProviderErrorPayload {
    /// Try to read a provider error out of a raw stream error value.
    ///
    /// Recognised shapes:
    /// - an API-call error with a `responseBody` JSON string containing `error.message`
    /// - `{ "data": { "error": { "message": .. } } }`
    /// - `{ "error": { "message": .. } }`
    pub fn from_value(value: &Value) -> Option<Self> {
        let status = value
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok());

        if let Some(body) = value.get("responseBody").and_then(Value::as_str) {
            if let Ok(parsed) = serde_json::from_str::<Value>(body) {
                if let Some(mut payload) = Self::from_error_object(parsed.get("error")) {
                    payload.status = status;
                    return Some(payload);
                }
            }
        }

        let nested = value.get("data").and_then(|d| d.get("error"));
        if let Some(mut payload) = Self::from_error_object(nested) {
            payload.status = status;
            return Some(payload);
        }

        Self::from_error_object(value.get("error")).map(|mut payload| {
            payload.status = status;
            payload
        })
    }

    fn from_error_object(error: Option<&Value>) -> Option<Self> {
        let error = error?;
        let message = error.get("message").and_then(Value::as_str)?;
        let code = error.get("code").and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Some(Self {
            message: message.to_string(),
            code,
            status: None,
        })
    }
}
