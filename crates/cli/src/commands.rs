//! CLI commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use numen_http::types::{CalculationRequest, ChatRequest, LoginRequest};
use numen_http::{FileStore, SessionClient, SessionClientBuilder};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config;
use crate::terminal::{TerminalNotifier, drain_session_events};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Account email
        #[arg(long, env = "NUMEN_EMAIL")]
        email: String,

        /// Account password
        #[arg(long, env = "NUMEN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session and forget stored credentials
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Compute the core numbers for a name and birth date
    Calculate {
        /// Full birth name
        #[arg(long)]
        name: String,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,
    },

    /// List reports
    Reports {
        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show a single report
    Report {
        /// Report ID
        id: String,
    },

    /// List notifications
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Ask the AI assistant
    Chat {
        /// Message to send
        message: String,

        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<String>,
    },

    /// Authenticated GET of any API path, printed as JSON
    Get {
        /// Path below the API root, e.g. /payments/plans/
        path: String,
    },
}

impl Commands {
    pub async fn execute(self, data_dir: &Path, config_file: Option<&Path>) -> Result<()> {
        let client = build_client(data_dir, config_file)?;
        let mut events = client.subscribe();

        let result = self.run(&client).await;
        drain_session_events(&mut events);
        result
    }

    async fn run(self, client: &SessionClient) -> Result<()> {
        match self {
            Self::Login { email, password } => {
                let tokens = client.login(&LoginRequest { email, password }).await?;
                match tokens.user {
                    Some(user) => println!("Logged in as {}", user.email),
                    None => println!("Logged in"),
                }
                Ok(())
            }
            Self::Logout => {
                client.logout().await?;
                println!("Logged out");
                Ok(())
            }
            Self::Whoami => {
                if !client.is_authenticated() {
                    println!("Not logged in");
                    return Ok(());
                }
                print_json(&client.get_profile().await?)
            }
            Self::Calculate { name, birth_date } => {
                let request = CalculationRequest {
                    full_name: name,
                    birth_date,
                };
                print_json(&client.calculate(&request).await?)
            }
            Self::Reports { page } => print_json(&client.list_reports(page).await?),
            Self::Report { id } => print_json(&client.get_report(&id).await?),
            Self::Notifications { unread } => {
                print_json(&client.list_notifications(unread).await?)
            }
            Self::Chat {
                message,
                conversation,
            } => {
                let reply = client
                    .send_chat_message(&ChatRequest {
                        message,
                        conversation_id: conversation,
                    })
                    .await?;
                println!("{}", reply.reply);
                Ok(())
            }
            Self::Get { path } => {
                let value: serde_json::Value = client.get(&path).await?;
                print_json(&value)
            }
        }
    }
}

fn build_client(data_dir: &Path, config_file: Option<&Path>) -> Result<SessionClient> {
    let config = config::load_client_config(data_dir, config_file)?;
    let session_path = config::session_path(data_dir);
    let store = FileStore::open(&session_path)
        .with_context(|| format!("failed to open session file {}", session_path.display()))?;

    info!(base_url = %config.base_url, session = %session_path.display(), "Using API");

    Ok(SessionClientBuilder::from_config(&config)
        .store(Arc::new(store))
        .notifier(Arc::new(TerminalNotifier))
        .build()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
