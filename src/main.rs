use tracing::error;
use tracing_subscriber::EnvFilter;

use bgg_expansion_notifier::bgg::client::{BggClient, RetryPolicy};
use bgg_expansion_notifier::config::Config;
use bgg_expansion_notifier::error::Error;
use bgg_expansion_notifier::notify::email::EmailNotifier;
use bgg_expansion_notifier::notify::{NoopNotifier, Notifier};
use bgg_expansion_notifier::reconcile::ReconciliationService;
use bgg_expansion_notifier::util::ignore::load_ignore_list;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let game_ignore = config
        .game_ignore_file_path
        .as_deref()
        .map(load_ignore_list)
        .transpose()?;
    let expansion_ignore = config
        .expansion_ignore_file_path
        .as_deref()
        .map(load_ignore_list)
        .transpose()?;

    let client = BggClient::new(
        &config.bgg_api_url,
        config.bgg_api_token.clone(),
        RetryPolicy {
            wait: config.retry_wait,
            max_attempts: config.retry_max_attempts,
        },
    );
    let service =
        ReconciliationService::new(&client, game_ignore.as_ref(), expansion_ignore.as_ref());

    let notifier: Box<dyn Notifier> = match &config.smtp {
        Some(smtp) => Box::new(EmailNotifier::new(smtp)?),
        None => Box::new(NoopNotifier),
    };

    service
        .run_and_notify(&config.bgg_username, notifier.as_ref())
        .await?;

    Ok(())
}
