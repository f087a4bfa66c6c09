use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::api::error::ApiError;
use crate::media::prepare_upload;
use crate::pipeline::{DetectionOutcome, IdeaOptions, ShotPrompt};
use crate::state::AppState;
use crate::utils::timing::RequestTimer;

pub const MIN_SHOTS: usize = 1;
pub const MAX_SHOTS: usize = 12;

#[derive(Debug, Deserialize)]
pub struct PlanBody {
    pub session_id: String,
    pub idea_id: String,
    pub count: usize,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub shots: Vec<ShotPrompt>,
}

#[derive(Debug, Serialize)]
pub struct StyleSummary {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

struct DetectForm {
    filename: String,
    bytes: Vec<u8>,
    options: IdeaOptions,
}

fn parse_bool_field(name: &str, value: &str) -> Result<Option<bool>, ApiError> {
    match value.trim().to_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        other => Err(ApiError::BadRequest(format!(
            "Invalid value for {name}: {other}"
        ))),
    }
}

async fn read_detect_form(mut multipart: Multipart) -> Result<DetectForm, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut options = IdeaOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("Invalid multipart body: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::BadRequest(format!("Failed to read upload: {err}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            "style" | "platform" => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| ApiError::BadRequest(format!("Invalid {name} field: {err}")))?;
                let value = value.trim();
                if !value.is_empty() {
                    let slot = if name == "style" {
                        &mut options.style
                    } else {
                        &mut options.platform
                    };
                    *slot = Some(value.to_string());
                }
            }
            "include_model" => {
                let value = field.text().await.map_err(|err| {
                    ApiError::BadRequest(format!("Invalid include_model field: {err}"))
                })?;
                options.include_model = parse_bool_field("include_model", &value)?;
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("Missing file field".to_string()))?;
    Ok(DetectForm {
        filename,
        bytes,
        options,
    })
}

async fn detect_inner(state: &AppState, multipart: Multipart) -> Result<DetectionOutcome, ApiError> {
    let form = read_detect_form(multipart).await?;
    let max_bytes = state.config.max_upload_bytes;
    let max_dimension = state.config.max_image_dimension;
    let DetectForm {
        filename,
        bytes,
        options,
    } = form;

    let data_url = tokio::task::spawn_blocking(move || {
        prepare_upload(&bytes, &filename, max_bytes, max_dimension)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("image task failed: {err}")))??;

    Ok(state.planner.detect_and_suggest(&data_url, options).await?)
}

/// POST /api/detect: product detection plus idea suggestions for one upload.
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DetectionOutcome>, ApiError> {
    let mut timer = RequestTimer::start("detect");
    let result = detect_inner(&state, multipart).await;
    match &result {
        Ok(outcome) => {
            info!(
                "Session {} created with {} idea(s)",
                outcome.session_id,
                outcome.ideas.len()
            );
            timer.mark_status("success", Some(outcome.session_id.clone()));
        }
        Err(err) => timer.mark_status("error", Some(err.to_string())),
    }
    timer.complete();
    result.map(Json)
}

async fn plan_inner(state: &AppState, body: PlanBody) -> Result<PlanResponse, ApiError> {
    if !(MIN_SHOTS..=MAX_SHOTS).contains(&body.count) {
        return Err(ApiError::BadRequest(format!(
            "count must be between {MIN_SHOTS} and {MAX_SHOTS}"
        )));
    }
    if body.session_id.trim().is_empty() || body.idea_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "session_id and idea_id are required".to_string(),
        ));
    }

    let shots = state
        .planner
        .plan(&body.session_id, &body.idea_id, body.count, body.model)
        .await?;
    Ok(PlanResponse { shots })
}

/// POST /api/plan: shot prompts for an idea from an earlier detection.
pub async fn plan_handler(
    State(state): State<AppState>,
    Json(body): Json<PlanBody>,
) -> Result<Json<PlanResponse>, ApiError> {
    let mut timer = RequestTimer::start("plan");
    let result = plan_inner(&state, body).await;
    match &result {
        Ok(response) => timer.mark_status("success", Some(format!("shots={}", response.shots.len()))),
        Err(err) => timer.mark_status("error", Some(err.to_string())),
    }
    timer.complete();
    result.map(Json)
}

pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<Value> {
    let deleted = state.planner.sessions().delete(&session_id);
    Json(json!({ "deleted": deleted }))
}

pub async fn styles_handler(State(state): State<AppState>) -> Json<Vec<StyleSummary>> {
    let styles = state
        .planner
        .styles()
        .iter()
        .map(|style| StyleSummary {
            key: style.key,
            name: style.name,
            description: style.description,
        })
        .collect();
    Json(styles)
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Product Photo Agent API",
        "sessions": state.planner.sessions().count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_fields_accept_common_spellings() {
        assert_eq!(parse_bool_field("f", "TRUE").unwrap(), Some(true));
        assert_eq!(parse_bool_field("f", "0").unwrap(), Some(false));
        assert_eq!(parse_bool_field("f", " ").unwrap(), None);
        assert!(parse_bool_field("f", "maybe").is_err());
    }
}
