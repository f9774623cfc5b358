mod cli;
mod clients;
mod config;
mod error;
mod mapping;
mod model;
mod store;
mod sync;
mod util;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clients::clickup::ClickUpClient;
use clients::github::GitHubClient;
use clients::slack::{NoNotifier, SlackNotifier};
use clients::Notifier;
use config::SyncConfig;
use store::LinkStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("ghcu-sync: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = cli::parse_args(&args)?;
    if options.help {
        cli::print_help();
        return Ok(());
    }

    let mut config = SyncConfig::load(options.config_path.as_deref())
        .context("failed to load configuration")?;
    config.close_missing = options.close_missing;
    config.mirror_comments = options.mirror_comments;

    let github = GitHubClient::new(&config.github);
    let clickup = ClickUpClient::new(&config.clickup);
    let notifier: Box<dyn Notifier> = match &config.slack_webhook_url {
        Some(url) => Box::new(SlackNotifier::new(url.clone())),
        None => Box::new(NoNotifier),
    };
    let mut links = LinkStore::open_default().context("failed to open the link store")?;

    let summary = sync::run(&config, &github, &clickup, notifier.as_ref(), &mut links)
        .await
        .context("sync run failed")?;

    info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        closed = summary.closed,
        failed = summary.failed,
        "sync pass complete"
    );
    println!(
        "Synced: {} created, {} updated, {} skipped, {} closed, {} failed",
        summary.created, summary.updated, summary.skipped, summary.closed, summary.failed
    );

    Ok(())
}
