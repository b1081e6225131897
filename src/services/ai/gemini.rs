use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};

use super::{GenerationRequest, LlmProvider};

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    let mut parts = vec![json!({ "text": request.prompt })];
    if let Some(image) = &request.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": base64::engine::general_purpose::STANDARD.encode(&image.data),
            }
        }));
    }

    let mut body = json!({
        "contents": [{ "role": "user", "parts": parts }],
    });

    if let Some(system) = &request.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }

    let mut config = serde_json::Map::new();
    if let Some(max) = request.max_output_tokens {
        config.insert("maxOutputTokens".to_string(), json!(max));
    }
    if let Some(temperature) = request.temperature {
        config.insert("temperature".to_string(), json!(temperature));
    }
    if !config.is_empty() {
        body["generationConfig"] = Value::Object(config);
    }

    body
}

fn response_text(data: &Value) -> Option<String> {
    let parts = data["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await
            .context("failed to call Gemini API")?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .context("failed to parse Gemini response")?;

        if !status.is_success() {
            anyhow::bail!("Gemini API error ({}): {}", status, data);
        }

        response_text(&data).ok_or_else(|| {
            let reason = data["candidates"][0]["finishReason"]
                .as_str()
                .or_else(|| data["promptFeedback"]["blockReason"].as_str())
                .unwrap_or("no candidates");
            anyhow::anyhow!("missing text in Gemini response ({reason})")
        })
    }
}
