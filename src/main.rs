use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxc::currency::CurrencyCode;
use fxc::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                fxc::AppCommand::Convert { amount, from, to }
            }
            Commands::Chat { message } => fxc::AppCommand::Chat {
                message: if message.is_empty() {
                    None
                } else {
                    Some(message.join(" "))
                },
            },
            Commands::Rates { base } => fxc::AppCommand::Rates { base },
            Commands::Popular => fxc::AppCommand::Popular,
            Commands::History { clear } => fxc::AppCommand::History { clear },
            Commands::Favorites { remove } => fxc::AppCommand::Favorites { remove },
            Commands::Favorite { from, to } => fxc::AppCommand::Favorite { from, to },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
    },
    /// Ask for a conversion in plain words; no message starts a chat session
    Chat {
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Show current exchange rates for a base currency
    Rates { base: Option<CurrencyCode> },
    /// Show rates for popular currency pairs
    Popular,
    /// Show recent conversions
    History {
        /// Clear all conversion history
        #[arg(long)]
        clear: bool,
    },
    /// List favorite conversion pairs
    Favorites {
        /// Remove a favorite by its pair key, e.g. USD-EUR
        #[arg(long)]
        remove: Option<String>,
    },
    /// Add or remove a favorite conversion pair
    Favorite {
        from: CurrencyCode,
        to: CurrencyCode,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxc::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  primary:
    base_url: "https://api.exchangerate-api.com/v4/latest"
  secondary:
    base_url: "https://api.exchangerate.host/latest"
  geo:
    base_url: "https://ipapi.co/json"

# default_from: "USD"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
