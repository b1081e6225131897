use serde_json::Value;

use crate::errors::AppError;
use crate::models::MechanicProfile;
use crate::services::ai::{image, GenerationRequest, InlineImage};
use crate::services::mechanics::find_mechanic;
use crate::state::AppState;

const CHAT_SYSTEM: &str = "You are an AI assistant. Answer concisely and accurately.";

const INSIGHTS_SYSTEM: &str = "You are an AI financial advisor with deep knowledge of business \
analytics. Offer clear insights and recommendations based on the provided data.";

const ADVISOR_SYSTEM: &str = r#"
You are an AI business advisor for automotive mechanics. Your job is to help mechanics grow their business,
increase revenue, and improve customer satisfaction. Provide thoughtful, data-driven recommendations
based on the mechanic's profile, specialties, experience, and location.

Keep your responses concise, practical, and actionable. Use a friendly, professional tone.
"#;

const REPAIR_SYSTEM: &str = r#"
You are an expert automotive technician with decades of experience diagnosing and repairing all types of vehicles.
Provide detailed, step-by-step technical advice for mechanics facing issues with vehicles.

Your responses should be:
1. Accurate - based on industry best practices and technical service procedures
2. Practical - include specific diagnostic steps, tools needed, and repair procedures
3. Safety-focused - always mention safety precautions when relevant
4. Educational - explain why problems occur and how repairs resolve the root issue

Use automotive terminology appropriate for professional mechanics. If the information provided is
insufficient for a definitive diagnosis, ask for specific symptoms, codes, or test results.
"#;

const BOOKING_SYSTEM: &str = "You are an assistant specialized in helping customers book a mechanic. \
Answer the customer's question concisely and then ask if they would like to schedule an appointment. \
If additional booking details (like time, location, specialty) are needed, prompt accordingly.";

const SUPPORT_SYSTEM: &str = "You are an experienced customer support agent handling complex queries. \
Provide a helpful, context-aware response that addresses the customer's situation.";

const CAPTION_PROMPT: &str = "Provide a caption and a detailed description of this image.";

const BBOX_PROMPT: &str = "Return a bounding box for each of the objects in this image \
in [ymin, xmin, ymax, xmax] format with values normalized to a 1000x1000 scale.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAction {
    Caption,
    BoundingBoxes,
}

impl ImageAction {
    /// Anything other than `bbox` falls back to a caption.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bbox" => ImageAction::BoundingBoxes,
            _ => ImageAction::Caption,
        }
    }
}

async fn complete(state: &AppState, request: GenerationRequest) -> Result<String, AppError> {
    tracing::debug!(
        model = %request.model,
        prompt_chars = request.prompt.len(),
        has_image = request.image.is_some(),
        "calling AI provider"
    );
    state.llm.generate(&request).await.map_err(AppError::ai)
}

pub async fn chat(state: &AppState, message: &str) -> Result<String, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }
    let request = GenerationRequest::new(&state.config.text_model, message)
        .system(CHAT_SYSTEM)
        .sampling(500, 0.1);
    complete(state, request).await
}

pub async fn analyze_image(
    state: &AppState,
    image: InlineImage,
    action: ImageAction,
) -> Result<String, AppError> {
    let request = match action {
        ImageAction::Caption => GenerationRequest::new(&state.config.vision_model, CAPTION_PROMPT),
        ImageAction::BoundingBoxes => {
            GenerationRequest::new(&state.config.reasoning_model, BBOX_PROMPT)
        }
    };
    complete(state, request.with_image(image)).await
}

pub fn insights_prompt(financial_data: &Value) -> String {
    let data = serde_json::to_string_pretty(financial_data).unwrap_or_else(|_| financial_data.to_string());
    format!(
        "Analyze the following financial and business data and provide actionable insights regarding \
revenue growth, profit optimization, and succession planning strategies:\n\n{data}"
    )
}

pub async fn admin_insights(state: &AppState, financial_data: &Value) -> Result<String, AppError> {
    let request = GenerationRequest::new(&state.config.text_model, insights_prompt(financial_data))
        .system(INSIGHTS_SYSTEM)
        .sampling(600, 0.2);
    complete(state, request).await
}

fn mechanic_summary(mechanic: &MechanicProfile) -> String {
    let specialties = mechanic
        .specialties
        .as_ref()
        .map(|s| s.to_display())
        .unwrap_or_else(|| "General Repair".to_string());
    let metrics = mechanic.performance_metrics.clone().unwrap_or_default();
    let location = match mechanic.coordinates() {
        Some((lat, lng)) => format!("Location coordinates: {lat}, {lng}"),
        None => "Location not provided".to_string(),
    };

    format!(
        "Mechanic Profile:
- Experience: {} years
- Hourly Rate: ${}
- Specialties: {}
- Bio: {}
- Average Rating: {}
- Completed Jobs: {}
- Average Response Time: {} minutes
- {}",
        mechanic.years_experience.unwrap_or(1.0),
        mechanic.hourly_rate.unwrap_or(50.0),
        specialties,
        mechanic.bio.as_deref().unwrap_or(""),
        metrics.avg_rating.unwrap_or(4.5),
        metrics.completed_jobs.unwrap_or(100),
        metrics.response_time_min.unwrap_or(30.0),
        location,
    )
}

/// A blank message asks for general growth advice; anything else is answered
/// as a question in the context of the profile.
pub fn advisor_prompt(mechanic: &MechanicProfile, message: &str) -> String {
    let summary = mechanic_summary(mechanic);
    let message = message.trim();

    if message.is_empty() {
        format!(
            "{summary}

Based on this mechanic's profile, provide personalized business growth recommendations.
Include advice on:
1. Pricing strategy (should they adjust their hourly rate?)
2. Skills to develop based on market demand
3. Service expansion opportunities
4. Customer acquisition strategies

Keep your response concise, practical and data-driven."
        )
    } else {
        format!(
            "{summary}

The mechanic has asked: \"{message}\"

Based on their profile data and this question, provide a helpful, personalized response.
Focus on practical, actionable advice that addresses their specific question.
If the question isn't related to their business, gently redirect to business topics.

Keep your response concise, practical and data-driven."
        )
    }
}

pub async fn mechanic_recommendations(
    state: &AppState,
    mechanic_id: &str,
    message: &str,
) -> Result<String, AppError> {
    let mechanic = find_mechanic(state.store.as_ref(), mechanic_id).await?;
    let request = GenerationRequest::new(
        &state.config.reasoning_model,
        advisor_prompt(&mechanic, message),
    )
    .system(ADVISOR_SYSTEM)
    .sampling(600, 0.2);
    complete(state, request).await
}

pub async fn repair_advice(
    state: &AppState,
    mechanic_id: &str,
    query: &str,
    image_data: Option<&str>,
) -> Result<String, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::BadRequest("query must not be empty".to_string()));
    }
    let prompt = format!("I need help with this automotive repair issue: {query}");

    let image = image_data
        .filter(|d| !d.trim().is_empty())
        .and_then(|data| match image::decode_data_url(data) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(error = %e, mechanic_id, "ignoring unreadable repair image");
                None
            }
        });

    let request = match image {
        Some(img) => GenerationRequest::new(&state.config.vision_model, prompt).with_image(img),
        None => GenerationRequest::new(&state.config.text_model, prompt),
    }
    .system(REPAIR_SYSTEM)
    .sampling(800, 0.2);

    tracing::info!(mechanic_id, with_image = request.image.is_some(), "repair advice requested");
    complete(state, request).await
}

pub fn booking_chat_prompt(message: &str, history: &[String]) -> String {
    let mut prompt = String::new();
    if !history.is_empty() {
        prompt.push_str(&history.join("\n"));
        prompt.push('\n');
    }
    prompt.push_str(&format!("Customer: {message}\nAssistant:"));
    prompt
}

pub async fn booking_chat(
    state: &AppState,
    message: &str,
    history: &[String],
) -> Result<String, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }
    let request = GenerationRequest::new(&state.config.text_model, booking_chat_prompt(message, history))
        .system(BOOKING_SYSTEM)
        .sampling(500, 0.15);
    complete(state, request).await
}

pub fn support_prompt(history: &[String]) -> String {
    format!("{}\nAssistant:", history.join("\n"))
}

pub async fn support_response(state: &AppState, history: &[String]) -> Result<String, AppError> {
    if history.is_empty() {
        return Err(AppError::BadRequest(
            "conversation_history must not be empty".to_string(),
        ));
    }
    let request = GenerationRequest::new(&state.config.text_model, support_prompt(history))
        .system(SUPPORT_SYSTEM)
        .sampling(600, 0.2);
    complete(state, request).await
}
