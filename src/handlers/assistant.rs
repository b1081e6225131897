use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::services::ai::image;
use crate::services::assistant::{self, ImageAction};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    if expected_token.is_empty() {
        return Ok(());
    }

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// POST /chat
#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = assistant::chat(&state, &req.message).await?;
    Ok(Json(ChatResponse { response }))
}

// POST /analyze-image?action=caption|bbox
#[derive(Deserialize)]
pub struct AnalyzeImageQuery {
    #[serde(default = "default_action")]
    pub action: String,
}

fn default_action() -> String {
    "caption".to_string()
}

#[derive(Serialize)]
pub struct AnalyzeImageResponse {
    pub result: String,
}

pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeImageQuery>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeImageResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
        upload = Some((bytes.to_vec(), content_type));
        break;
    }

    let (data, content_type) =
        upload.ok_or_else(|| AppError::BadRequest("missing 'file' field".to_string()))?;
    let image = image::from_upload(data, content_type.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let result = assistant::analyze_image(&state, image, ImageAction::parse(&query.action)).await?;
    Ok(Json(AnalyzeImageResponse { result }))
}

// POST /admin-ai
#[derive(Deserialize)]
pub struct AdminInsightsRequest {
    pub financial_data: Value,
}

#[derive(Serialize)]
pub struct AdminInsightsResponse {
    pub insights: String,
}

pub async fn admin_insights(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AdminInsightsRequest>,
) -> Result<Json<AdminInsightsResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let insights = assistant::admin_insights(&state, &req.financial_data).await?;
    Ok(Json(AdminInsightsResponse { insights }))
}

// POST /mechanic-ai
#[derive(Deserialize)]
pub struct MechanicAiRequest {
    pub mechanic_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct MechanicAiResponse {
    pub recommendations: String,
}

pub async fn mechanic_ai(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MechanicAiRequest>,
) -> Result<Json<MechanicAiResponse>, AppError> {
    let recommendations =
        assistant::mechanic_recommendations(&state, &req.mechanic_id, &req.message).await?;
    Ok(Json(MechanicAiResponse { recommendations }))
}

// POST /repair-assistant
#[derive(Deserialize)]
pub struct RepairRequest {
    pub mechanic_id: String,
    pub query: String,
    pub image_data: Option<String>,
}

#[derive(Serialize)]
pub struct RepairResponse {
    pub advice: String,
}

pub async fn repair_assistant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RepairRequest>,
) -> Result<Json<RepairResponse>, AppError> {
    let advice = assistant::repair_advice(
        &state,
        &req.mechanic_id,
        &req.query,
        req.image_data.as_deref(),
    )
    .await?;
    Ok(Json(RepairResponse { advice }))
}

// POST /chatbot-booking
#[derive(Deserialize)]
pub struct BookingChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Option<Vec<String>>,
}

pub async fn booking_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let history = req.conversation_history.unwrap_or_default();
    let response = assistant::booking_chat(&state, &req.message, &history).await?;
    Ok(Json(ChatResponse { response }))
}

// POST /customer-support
#[derive(Deserialize)]
pub struct SupportRequest {
    pub conversation_history: Vec<String>,
}

pub async fn customer_support(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SupportRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = assistant::support_response(&state, &req.conversation_history).await?;
    Ok(Json(ChatResponse { response }))
}
