use serde::{Deserialize, Serialize};

use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The `{status, message, data}` wrapper every backend endpoint returns.
///
/// HTTP success does not imply `status == Success`; check both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: &str, data: Option<T>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.to_string(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Turn a logical error into `ApiError::Rejected`, keeping optional data.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        match self.status {
            ResponseStatus::Success => Ok(self.data),
            ResponseStatus::Error => Err(ApiError::Rejected(self.message)),
        }
    }

    /// Like `into_result`, but a success without data is also an error.
    pub fn into_data(self) -> Result<T, ApiError> {
        let message = self.message.clone();
        self.into_result()?.ok_or_else(|| {
            ApiError::InvalidResponse(format!("response had no data: {}", message))
        })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            status: self.status,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_error_inside_success_response() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"status":"error","message":"Superhero is already in favorites"}"#).unwrap();
        assert!(!envelope.is_success());
        assert!(matches!(
            envelope.into_result(),
            Err(ApiError::Rejected(ref m)) if m == "Superhero is already in favorites"
        ));
    }

    #[test]
    fn test_success_without_data() {
        let envelope: Envelope<Vec<i64>> =
            serde_json::from_str(r#"{"status":"success","message":"Team deleted successfully","data":null}"#).unwrap();
        assert!(envelope.is_success());
        assert!(matches!(envelope.clone().into_result(), Ok(None)));
        assert!(matches!(envelope.into_data(), Err(ApiError::InvalidResponse(_))));
    }

    #[test]
    fn test_map_keeps_status_and_message() {
        let envelope = Envelope::success("ok", Some(vec![1, 2, 3]));
        let mapped = envelope.map(|v| v.len());
        assert!(mapped.is_success());
        assert_eq!(mapped.message, "ok");
        assert_eq!(mapped.data, Some(3));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<Envelope<()>>(r#"{"status":"pending","message":""}"#).is_err());
    }
}
