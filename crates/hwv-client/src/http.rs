//! Shared HTTP response helpers for the survey client.
//!
//! Centralizes status-code checks so the request methods stay focused on
//! request construction and response mapping.

use hwv_core::validation::{FieldErrors, ValidationError, ValidationReport, flatten_field_errors};

use crate::error::ClientError;

/// Return the response unchanged on success, otherwise
/// [`ClientError::Api`] with the status code and response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Outcome of handing a document to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored under this identifier.
    Accepted(String),
    /// The server's validation failed; one error per message, field path kept.
    Rejected(Vec<ValidationError>),
    /// Local validation failed, so nothing was sent.
    Invalid(ValidationReport),
}

/// Map a `POST /api/submission` response to a [`SubmitOutcome`].
///
/// A 400 whose body is not a field-error map is reported as
/// [`ClientError::Api`] like any other failure status.
pub async fn submit_outcome(resp: reqwest::Response) -> Result<SubmitOutcome, ClientError> {
    let status = resp.status();
    if status == reqwest::StatusCode::BAD_REQUEST {
        let body = resp.text().await?;
        return match serde_json::from_str::<FieldErrors>(&body) {
            Ok(fields) => Ok(SubmitOutcome::Rejected(flatten_field_errors(&fields))),
            Err(_) => Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            }),
        };
    }

    let resp = check_response(resp).await?;
    let body = resp.text().await?;
    let id: String = serde_json::from_str(&body)
        .map_err(|e| ClientError::Parse(format!("submission id: {e}")))?;
    Ok(SubmitOutcome::Accepted(id))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let err = check_response(mock_response(500, "boom")).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200, "")).await.is_ok());
    }

    #[tokio::test]
    async fn accepted_id_is_json_string() {
        let outcome = submit_outcome(mock_response(200, r#""0a1b2c3d-0000-0000-0000-000000000000""#))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Accepted("0a1b2c3d-0000-0000-0000-000000000000".into())
        );
    }

    #[tokio::test]
    async fn rejected_repeats_field_per_message() {
        let body = r#"{"deviceId": ["a", "b"], "tests[0].codec": ["c"]}"#;
        let SubmitOutcome::Rejected(errors) = submit_outcome(mock_response(400, body)).await.unwrap()
        else {
            panic!("expected Rejected");
        };

        let pairs: Vec<(Option<&str>, &str)> = errors
            .iter()
            .map(|e| (e.path.as_deref(), e.message.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Some("deviceId"), "a"),
                (Some("deviceId"), "b"),
                (Some("tests[0].codec"), "c"),
            ]
        );
    }

    #[tokio::test]
    async fn bad_request_without_field_map_is_api_error() {
        let err = submit_outcome(mock_response(400, "plain text")).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let err = submit_outcome(mock_response(500, "")).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_success_body_is_parse_error() {
        let err = submit_outcome(mock_response(200, "not json")).await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
