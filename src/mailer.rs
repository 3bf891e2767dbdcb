use async_trait::async_trait;
use tracing::info;

/// Outbound-mail seam. Delivery itself is out of scope; the trait keeps
/// the dispatch visible at the call site and swappable in tests.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome(&self, to: &str) -> anyhow::Result<()>;
}

/// Transport used when mail credentials are present. Records the
/// dispatch through tracing.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_welcome(&self, to: &str) -> anyhow::Result<()> {
        info!(from = %self.from, %to, subject = "Welcome to FitLife!", "welcome email dispatched");
        Ok(())
    }
}

/// Transport used when EMAIL_USER/EMAIL_PASS are absent. Every send
/// fails, which the subscribe handler surfaces as an upstream error.
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send_welcome(&self, _to: &str) -> anyhow::Result<()> {
        anyhow::bail!("email service not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_accepts_sends() {
        let mailer = LogMailer::new("mailer@fitlife.test");
        assert!(mailer.send_welcome("member@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn unconfigured_mailer_rejects_sends() {
        let err = UnconfiguredMailer
            .send_welcome("member@example.com")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
