//! Request handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use formsense_pipeline::{FormRequest, PipelineOutput};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of a form request. Every field is optional: a bare `{}` is a
/// mapping lookup for the path domain.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormBody {
    /// Raw page HTML.
    pub dom: Option<String>,
    /// Free-form user context for value filling.
    pub user_prompt: Option<String>,
    /// Additional instruction appended after the prompt.
    pub custom_command: Option<String>,
}

/// Body of a false-positive check: one URL.
#[derive(Debug, Deserialize)]
pub struct FalsePositiveBody {
    pub url: String,
}

/// Verdict of a detection or false-positive check.
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub form: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `POST /api/v1/form/{domain}`
pub async fn process_form(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Json(body): Json<FormBody>,
) -> Result<Json<PipelineOutput>, ApiError> {
    debug!("form request for {}", domain);
    let output = state
        .pipeline
        .process(FormRequest {
            domain,
            dom: body.dom,
            user_prompt: body.user_prompt,
            custom_command: body.custom_command,
        })
        .await?;
    Ok(Json(output))
}

/// `POST /api/v1/form-detect`
///
/// Takes a JSON array of URLs and answers true as soon as one URL's host
/// has a detection record, whatever its verdict. Unparseable URLs and
/// store failures count as misses.
pub async fn detect_forms(
    State(state): State<AppState>,
    Json(urls): Json<Vec<String>>,
) -> Json<DetectResponse> {
    for raw in &urls {
        let Some(host) = host_of(raw) else {
            debug!("skipping unparseable url: {}", raw);
            continue;
        };
        match state.detections.find(&host).await {
            Ok(Some(_)) => return Json(DetectResponse { form: true }),
            Ok(None) => {}
            Err(e) => warn!("form-detect lookup failed for {}: {}", host, e),
        }
    }
    Json(DetectResponse { form: false })
}

/// `POST /api/v1/false-positive-forms`
///
/// Answers `form: false` only when the URL's host is blacklisted: its
/// detection record exists with `form: false`. Hosts without a record
/// answer true; an unextractable host answers false.
pub async fn false_positive_forms(
    State(state): State<AppState>,
    Json(body): Json<FalsePositiveBody>,
) -> Json<DetectResponse> {
    let Some(host) = host_of(&body.url) else {
        warn!("false-positive check with unparseable url: {}", body.url);
        return Json(DetectResponse { form: false });
    };
    match state.detections.find(&host).await {
        Ok(Some(detection)) if !detection.form => Json(DetectResponse { form: false }),
        Ok(_) => Json(DetectResponse { form: true }),
        Err(e) => {
            warn!("false-positive lookup failed for {}: {}", host, e);
            Json(DetectResponse { form: true })
        }
    }
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Host of a submitted URL; a bare domain without a scheme is accepted
/// as-is.
fn host_of(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Url::parse(raw) {
        Ok(url) => url.host_str().map(str::to_string),
        Err(_) if !raw.contains('/') && !raw.contains(':') => Some(raw.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of_full_url() {
        assert_eq!(
            host_of("https://example.com/signup?ref=x").as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn test_host_of_bare_domain() {
        assert_eq!(host_of("acme.typeform.com").as_deref(), Some("acme.typeform.com"));
    }

    #[test]
    fn test_host_of_garbage() {
        assert!(host_of("").is_none());
        assert!(host_of("not a url/path").is_none());
    }
}
