use std::sync::Arc;

use clap::Parser;
use gistauth::cli::{Cli, ClientCommand, Command};
use gistauth::config::{AuthConfig, ConfigError};
use gistauth::net::backend::HttpBackend;
use gistauth::net::types::SessionError;
use gistauth::notify::{ChannelSink, Notification};
use gistauth::routes::{self, ProxyState};
use gistauth::services::navigation::SystemBrowser;
use gistauth::services::session::SessionController;
use gistauth::state::identity::IdentityStore;
use gistauth::state::storage::FileStorage;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not signed in")]
    NotSignedIn,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.auth_config()?;

    match cli.command {
        Command::Serve => run_serve(&config).await,
        Command::Whoami => run_whoami(&config),
        Command::Client(command) => run_client(&config, command).await,
    }
}

async fn run_serve(config: &AuthConfig) -> Result<(), CliError> {
    // The proxy always talks to the backend directly with the caller's cookie.
    let relay = HttpBackend::relay(config)?;
    let app = routes::app(ProxyState::new(Arc::new(relay), config.login_url()));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, backend = %config.backend_url, "session proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn run_whoami(config: &AuthConfig) -> Result<(), CliError> {
    let store = IdentityStore::load(Box::new(FileStorage::new(&config.state_dir)));
    let identity = store.get();
    if !identity.is_authenticated() {
        return Err(CliError::NotSignedIn);
    }
    println!("{} <{}> ({})", identity.name, identity.email, identity.user_id);
    println!("admin: {}  premium: {}  deleted: {}", identity.is_admin, identity.is_premium, identity.is_deleted);
    Ok(())
}

async fn run_client(config: &AuthConfig, command: ClientCommand) -> Result<(), CliError> {
    let backend = HttpBackend::new(config)?;
    let store = IdentityStore::load(Box::new(FileStorage::new(&config.state_dir)));
    let (sink, rx) = ChannelSink::channel();
    let printer = tokio::spawn(print_notifications(rx));

    let controller =
        SessionController::new(Arc::new(backend), store, Arc::new(sink), Arc::new(SystemBrowser), &config.landing_path);

    let result = match command {
        ClientCommand::Check => {
            if controller.check_session().await {
                let identity = controller.identity();
                println!("signed in as {} <{}>", identity.name, identity.email);
                Ok(())
            } else {
                Err(CliError::NotSignedIn)
            }
        }
        ClientCommand::Login => {
            controller.check_session().await;
            controller.redirect_to_login().await.map_err(CliError::from)
        }
        ClientCommand::Logout => controller.sign_out().await.map_err(CliError::from),
    };

    // Closing the sink lets the printer drain and exit.
    drop(controller);
    let _ = printer.await;
    result
}

async fn print_notifications(mut rx: mpsc::UnboundedReceiver<Notification>) {
    while let Some(n) = rx.recv().await {
        match n.description {
            Some(description) => eprintln!("[{}] {}: {description}", n.tone.color(), n.title),
            None => eprintln!("[{}] {}", n.tone.color(), n.title),
        }
    }
}
