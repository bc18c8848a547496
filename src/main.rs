use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use thunderclash_backend::app::contact::ContactService;
use thunderclash_backend::app::ports::{ImageStore, NotificationSink, TabularSink};
use thunderclash_backend::app::registration::{RegistrationService, SheetTabs};
use thunderclash_backend::config::AppConfig;
use thunderclash_backend::gateway::cloudinary::CloudinaryStore;
use thunderclash_backend::gateway::sheets::SheetsWebhook;
use thunderclash_backend::gateway::telegram::TelegramNotifier;
use thunderclash_backend::logging;
use thunderclash_backend::server::{start_server, AppState};

#[derive(Parser)]
#[command(name = "thunderclash_backend")]
#[command(about = "Thunderclash tournament registration backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to run the server on (overrides PORT from the environment)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    let config = AppConfig::from_env().map_err(|err| {
        error!(error = %err, "CRITICAL: registration sink not configured, refusing to start");
        err
    })?;
    let port = cli.port.unwrap_or(config.port);

    // One HTTP client shared by every outbound gateway
    let client = reqwest::Client::new();

    let images: Arc<dyn ImageStore> =
        Arc::new(CloudinaryStore::new(client.clone(), config.cloudinary.clone()));
    let registration_notifier: Arc<dyn NotificationSink> = Arc::new(TelegramNotifier::new(
        client.clone(),
        config.registration_bot.clone(),
    ));

    let sheet = config.sheets.clone().map(|sheets| {
        info!("Sheet logging enabled");
        let sink: Arc<dyn TabularSink> =
            Arc::new(SheetsWebhook::new(client.clone(), sheets.webhook_url));
        let tabs = SheetTabs {
            solo: sheets.solo_tab,
            squad: sheets.squad_tab,
        };
        (sink, tabs)
    });

    let contact = config.contact_bot.clone().map(|bot| {
        let notifier: Arc<dyn NotificationSink> =
            Arc::new(TelegramNotifier::new(client.clone(), bot));
        Arc::new(ContactService::new(notifier))
    });
    match &contact {
        Some(_) => println!("✅ Contact support bot initialized"),
        None => println!("⚠️  Contact bot vars missing. Contact form will not work."),
    }

    let state = AppState {
        images,
        registrations: Arc::new(RegistrationService::new(registration_notifier, sheet)),
        contact,
    };

    start_server(state, port).await
}
