use anyhow::Result;

use gtm_provider::config::{Command, Settings};
use gtm_provider::provider::{ConfigureRequest, GtmProvider, ResourceProvider};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    // Initialize logging with a configured level
    let log_level = settings.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let provider = GtmProvider::new();

    match settings.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(provider.schema())?);
        }
        Command::Validate => {
            let diagnostics = provider.validate_config(&settings.provider_config);
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);

            if diagnostics.iter().any(|d| d.is_error()) {
                anyhow::bail!("Provider configuration is not valid");
            }
        }
        Command::Configure => {
            let request = ConfigureRequest::new(settings.provider_config)
                .with_terraform_version(settings.terraform_version);

            let client = provider.configure(request).await?;
            tracing::info!("✅ GTM client configured using {}", client.auth_kind());
            tracing::info!("User-Agent: {}", client.user_agent());

            // Surface token problems now rather than on the first API call
            client.token_source().token().await?;
            tracing::info!("✅ Access token obtained");
        }
    }

    Ok(())
}
