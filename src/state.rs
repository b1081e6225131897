use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::notify::Notifier;
use crate::services::payments::PaymentGateway;
use crate::services::store::DataStore;

pub struct AppState {
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub store: Box<dyn DataStore>,
    pub notifier: Box<dyn Notifier>,
    pub payments: Box<dyn PaymentGateway>,
}
