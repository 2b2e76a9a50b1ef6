use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

impl CreateNotificationRequest {
    /// Trimmed title and message; both are required.
    pub fn validated(&self) -> ApiResult<(String, String)> {
        let title = self.title.trim();
        let message = self.message.trim();
        if title.is_empty() || message.is_empty() {
            return Err(ApiError::Validation(
                "Notification title and message are required".into(),
            ));
        }
        Ok((title.to_string(), message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_fields_required() {
        let ok = CreateNotificationRequest {
            title: " Maintenance ".into(),
            message: "Tonight at 22:00".into(),
        };
        assert_eq!(
            ok.validated().unwrap(),
            ("Maintenance".into(), "Tonight at 22:00".into())
        );

        let blank_message = CreateNotificationRequest {
            title: "x".into(),
            message: "  ".into(),
        };
        assert!(blank_message.validated().is_err());
        assert!(CreateNotificationRequest::default().validated().is_err());
    }
}
