use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;
use site_forms::configuration::get_configuration;
use site_forms::email_client::{MailRouting, SmtpDispatcher};
use site_forms::startup::{run, UploadLimits};
use site_forms::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("site_forms".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_configuration().context("Failed to read configuration")?;
    let routing = MailRouting::from_settings(&config)
        .map_err(|e| anyhow::anyhow!("Invalid email addresses in configuration: {}", e))?;
    let dispatcher = SmtpDispatcher::new(&config.email).context("Failed to build the SMTP transport")?;
    let limits = UploadLimits {
        max_resume_bytes: config.application.max_resume_bytes,
    };

    let address = format!(
        "{address}:{port}",
        address = config.application.host,
        port = config.application.port
    );
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(%address, "Listening for form submissions");

    run(listener, Arc::new(dispatcher), routing, limits)?.await?;
    Ok(())
}
