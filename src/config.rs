use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub reasoning_model: String,
    pub supabase_url: String,
    pub supabase_key: String,
    /// Empty disables the bearer check on `/admin-ai`.
    pub admin_token: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            text_model: env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            vision_model: env::var("GEMINI_VISION_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string()),
            reasoning_model: env::var("GEMINI_REASONING_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-pro".to_string()),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_key: env::var("SUPABASE_KEY")
                .or_else(|_| env::var("SUPABASE_ANON_KEY"))
                .unwrap_or_default(),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_default(),
        }
    }
}
