use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Returns `Ok(false)` when the charge is declined.
    async fn charge(&self, payment_info: &Value) -> anyhow::Result<bool>;
}

/// Approves every charge. Stands in until a processor is wired up.
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, payment_info: &Value) -> anyhow::Result<bool> {
        let fields = payment_info.as_object().map_or(0, |o| o.len());
        tracing::debug!(fields, "simulated payment approved");
        Ok(true)
    }
}
