//! Request routing and status projection.
//!
//! [`handle`] maps one request to one [`ApiResponse`] without touching a
//! socket, so every route is testable directly against a `SurveyService`.

use hwv_core::ids::is_guid;
use hwv_core::validation::{FieldErrors, ValidationReport};
use hwv_db::error::ServiceError;
use hwv_db::service::SurveyService;
use serde::Serialize;

pub const API_PREFIX: &str = "/api";

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// A fully rendered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: JSON,
                body,
            },
            Err(e) => Self::text(500, &format!("serialization failed: {e}")),
        }
    }

    fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: message.to_string(),
        }
    }

    fn empty(status: u16) -> Self {
        Self::text(status, "")
    }

    fn field_errors(fields: &FieldErrors) -> Self {
        Self::json(400, fields)
    }

    fn missing_param(name: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields
            .entry(name.to_string())
            .or_default()
            .push(format!("The {name} field is required."));
        Self::field_errors(&fields)
    }
}

/// Route one request.
///
/// `url` is the raw request target including the query string.
pub async fn handle(service: &SurveyService, method: &str, url: &str, body: &[u8]) -> ApiResponse {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = path.trim_end_matches('/');

    let Some(route) = path.strip_prefix(API_PREFIX) else {
        return ApiResponse::text(404, "not found");
    };

    let response = match (route, method) {
        ("/submission-schema", "GET") => get_schema(service),
        ("/submission", "POST") => submit(service, body).await,
        ("/submission", "GET") => device_models(service, query).await,
        ("/submission/recalc", "POST") => recalc(service).await,
        ("/submission/single", "GET") => single(service, query).await,
        ("/submission-schema" | "/submission" | "/submission/recalc" | "/submission/single", _) => {
            ApiResponse::text(405, "method not allowed")
        }
        _ => ApiResponse::text(404, "not found"),
    };

    tracing::debug!(method, path, status = response.status, "request handled");
    response
}

fn get_schema(service: &SurveyService) -> ApiResponse {
    ApiResponse::json(200, service.schema().schema().document().as_value())
}

async fn submit(service: &SurveyService, body: &[u8]) -> ApiResponse {
    let Ok(raw) = std::str::from_utf8(body) else {
        return ApiResponse::field_errors(&ValidationReport::parse_failure().field_errors());
    };

    match service.submit_hardware_survey(raw).await {
        Ok(id) => ApiResponse::json(200, &id),
        Err(ServiceError::InvalidSubmission(report)) => {
            ApiResponse::field_errors(&report.field_errors())
        }
        Err(e) => internal_error(&e),
    }
}

async fn device_models(service: &SurveyService, query: &str) -> ApiResponse {
    let Some(device_id) = query_param(query, "deviceId") else {
        return ApiResponse::missing_param("deviceId");
    };
    match service.get_submissions(&device_id).await {
        Ok(rows) => ApiResponse::json(200, &rows),
        Err(e) => internal_error(&e),
    }
}

async fn recalc(service: &SurveyService) -> ApiResponse {
    match service.recalc_hardware_stats().await {
        Ok(_) => ApiResponse::empty(200),
        Err(e) => internal_error(&e),
    }
}

async fn single(service: &SurveyService, query: &str) -> ApiResponse {
    let Some(id) = query_param(query, "id") else {
        return ApiResponse::missing_param("id");
    };
    if !is_guid(&id) {
        return ApiResponse::text(404, "not found");
    }
    match service.get_single_submission(&id).await {
        Ok(submission) => ApiResponse::json(200, &submission),
        Err(ServiceError::NotFound { .. }) => ApiResponse::text(404, "not found"),
        Err(e) => internal_error(&e),
    }
}

fn internal_error(e: &ServiceError) -> ApiResponse {
    tracing::error!(error = %e, "request failed");
    ApiResponse::text(500, &e.to_string())
}

/// First non-blank, percent-decoded value of `name` in a query string.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .filter(|(key, _)| *key == name)
        .filter_map(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(std::borrow::Cow::into_owned)
        })
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
