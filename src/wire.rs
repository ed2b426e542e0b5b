use serde::Deserialize;
use serde_json::Value;

/// Error body as sent by the API.
///
/// Both `{"error": {...}}` and the flat `{"message": ...}` shapes occur;
/// the nested object wins when both are present. A bare `{"error": "..."}`
/// string is used only when there is no flat message.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorField>,
    #[serde(flatten)]
    pub flat: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
    Body(ErrorBody),
    Message(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    pub fn into_parts(self) -> ErrorBody {
        let flat = self.flat;
        match self.error {
            Some(ErrorField::Body(nested)) => ErrorBody {
                message: nested.message.or(flat.message),
                code: nested.code.or(flat.code),
                details: nested.details.or(flat.details),
            },
            Some(ErrorField::Message(message)) => ErrorBody {
                message: flat.message.or(Some(message)),
                ..flat
            },
            None => flat,
        }
    }
}

/// Accepts numeric codes such as `{"code": 1042}` alongside string ones.
fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(code)) => Some(code),
        Some(Value::Number(code)) => Some(code.to_string()),
        _ => None,
    })
}
