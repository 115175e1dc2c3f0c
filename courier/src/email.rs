use anyhow::Context;
use courier_config::EmailConfig;
use courier_email_impl::EmailServiceImpl;

/// Set up the SMTP connection pool. Connections are only opened on demand.
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(&config.smtp_url, config.from.clone())
        .await
        .context("Failed to connect to SMTP server")
}
