use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, message: &str) -> anyhow::Result<()>;
}

/// Records notifications in the service log. Delivery channels (push, SMS,
/// email) plug in behind the same trait.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> anyhow::Result<()> {
        tracing::info!(recipient, message, "notification");
        Ok(())
    }
}
