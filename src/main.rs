use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use calmdown::application::{EventPublisher, Notifier, RefreshEngine};
use calmdown::infrastructure::{
    console_notifier::ConsoleNotifier, event_bus::EventBus, memory_directory::InMemoryDirectory,
    multi_notifier::MultiNotifier, tokio_ticker::TokioTicker, webhook_notifier::WebhookNotifier,
};
use calmdown::interfaces::config::Config;
use calmdown::interfaces::console::Console;

#[derive(Parser, Debug)]
#[command(name = "calmdown")]
struct Args {
    /// Path to the cooldowns YAML file
    #[arg(long, default_value = "calmdown.yaml")]
    config: String,

    /// Do not send external notifications (console only)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "calmdown=info"
                    .parse()
                    .expect("static directive is valid"),
            ),
        )
        .init();
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // 1) load config
    let cfg = match Config::load_from_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // 2) notifiers fanout
    let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(ConsoleNotifier::new())];
    if !args.dry_run {
        if let Ok(hook) = std::env::var("CALMDOWN_WEBHOOK") {
            notifiers.push(Box::new(WebhookNotifier::new(hook)));
        } else {
            tracing::warn!("CALMDOWN_WEBHOOK not set, webhook delivery disabled");
        }
    } else {
        tracing::warn!("--dry-run enabled: only console output");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(MultiNotifier::new(notifiers));

    // 3) events, logged as they happen
    let bus = EventBus::new(256);
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(
                    cooldown = %event.cooldown,
                    subject = %event.subject,
                    kind = ?event.kind,
                    "cooldown event"
                ),
                Err(RecvError::Lagged(missed)) => tracing::warn!(missed, "event log lagging"),
                Err(RecvError::Closed) => break,
            }
        }
    });
    let publisher: Arc<dyn EventPublisher> = Arc::new(bus);

    // 4) engine + cooldowns
    let engine_config = match cfg.engine_config() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid engine config: {}", e);
            std::process::exit(1);
        }
    };
    let engine = RefreshEngine::new(engine_config);
    let directory = InMemoryDirectory::new();
    let cooldowns = cfg.build_cooldowns(&engine, &directory, notifier, Some(publisher));
    tracing::info!(
        cooldowns = cooldowns.len(),
        tracked = engine.registered(),
        "cooldowns ready"
    );
    let ticks = engine.start(&TokioTicker::new());

    // 5) run
    if let Err(e) = Console::new(cooldowns, directory).serve().await {
        tracing::error!("console failed: {e}");
    }
    ticks.stop();
}
