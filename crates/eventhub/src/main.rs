//! eventhub - terminal front-end for EventHub
//!
//! Wires together:
//! - Configuration loading
//! - Local identity provider and the session store
//! - Event catalog and countdown engine
//! - The interactive command loop

use anyhow::{Context, Result};
use clap::Parser;
use eventhub::render::render;
use eventhub::setup::{countdown_engine, event_source, local_provider};
use eventhub::{App, Command, Screen, HELP};
use eventhub_api::Route;
use eventhub_config::{load_config, Settings};
use eventhub_core::{CredentialForm, SessionStore};
use eventhub_identity::LocalIdentityProvider;
use eventhub_util::{default_config_path, is_mock_time_active};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// eventhub - Track events and watch live countdowns
#[derive(Parser, Debug)]
#[command(name = "eventhub")]
#[command(about = "Track events and watch live countdowns", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/eventhub/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Redraw the current view on every countdown tick
    #[arg(long)]
    live: bool,

    /// Start at this path instead of the landing view
    #[arg(long, default_value = "/")]
    start: String,
}

/// Running shell state
struct Shell {
    app: App,
    store: Arc<SessionStore>,
    provider: Arc<LocalIdentityProvider>,
    settings: Settings,
    live: bool,
}

impl Shell {
    fn new(args: &Args) -> Result<Self> {
        let settings = if args.config.exists() {
            let settings = load_config(&args.config)
                .with_context(|| format!("Failed to load config from {:?}", args.config))?;
            info!(
                config_path = %args.config.display(),
                event_count = settings.events.len(),
                "Configuration loaded"
            );
            settings
        } else {
            warn!(
                config_path = %args.config.display(),
                "Config file not found, starting with no events or accounts"
            );
            Settings::default()
        };

        if is_mock_time_active() {
            warn!("Mock time is active, countdowns are not using the real clock");
        }

        let provider = Arc::new(
            local_provider(&settings.provider).context("Failed to seed configured accounts")?,
        );

        let store = Arc::new(SessionStore::new(provider.clone()));
        store.initialize();

        let app = App::new(
            store.clone(),
            Arc::new(event_source(&settings)),
            countdown_engine(&settings),
            settings.app.guard_policy,
        );

        Ok(Self {
            app,
            store,
            provider,
            settings,
            live: args.live,
        })
    }

    async fn run(mut self, start: Route) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

        let mut session_changes = self.store.subscribe();
        let mut redraw = tokio::time::interval(self.settings.app.tick);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.app.navigate(start).await;
        self.draw();
        println!("Type 'help' for commands.");

        info!("Shell running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down");
                    break;
                }

                // Session changes re-run the guard for whatever is on screen
                changed = session_changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let before = self.app.screen().clone();
                    self.app.refresh().await;
                    if *self.app.screen() != before {
                        self.draw();
                    }
                }

                _ = redraw.tick(), if self.live && self.app.board().active_count() > 0 => {
                    self.draw();
                }

                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read from stdin")? else {
                        debug!("stdin closed");
                        break;
                    };
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
            }
        }

        info!("Shutting down eventhub");
        self.app.close();
        self.store.shutdown();
        info!("Shutdown complete");
        Ok(())
    }

    /// Returns false when the shell should exit
    async fn handle_line(&mut self, line: &str) -> bool {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                return true;
            }
        };
        debug!(?command, "Command");

        match command {
            Command::Help => println!("{}", HELP),
            Command::Go(route) => {
                self.app.navigate(route).await;
                self.draw();
            }
            Command::Open(id) => {
                self.app.navigate(Route::EventDetails { id }).await;
                self.draw();
            }
            Command::Login { email, password } => {
                self.submit(CredentialForm::sign_in(email, password)).await;
            }
            Command::Signup {
                email,
                password,
                confirm_password,
            } => {
                self.submit(CredentialForm::sign_up(email, password, confirm_password))
                    .await;
            }
            Command::Toggle => {
                self.app.toggle_auth_mode();
                if *self.app.screen() == Screen::Auth {
                    self.draw();
                }
            }
            Command::Logout => match self.app.logout().await {
                Ok(()) => self.draw(),
                Err(e) => println!("! {}", e),
            },
            Command::Status => {
                let session = self.app.session();
                match session.identity() {
                    Some(identity) => println!("Signed in as {} ({})", identity.email, identity.id),
                    None => println!("{:?}", session.status()),
                }
            }
            Command::Revoke => {
                if !self.provider.revoke_session() {
                    println!("No active session");
                }
            }
            Command::Show => self.draw(),
            Command::Quit => return false,
        }
        true
    }

    async fn submit(&mut self, form: CredentialForm) {
        let result = self.app.submit(form).await;
        if let Err(message) = result
            && *self.app.screen() != Screen::Auth
        {
            println!("! {}", message);
        }
        self.draw();
    }

    fn draw(&self) {
        println!("\n{}", render(&self.app));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout is the rendered view
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "eventhub starting"
    );

    let shell = Shell::new(&args)?;
    shell.run(Route::parse(&args.start)).await
}
