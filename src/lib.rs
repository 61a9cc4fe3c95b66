pub mod app;
pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod format;
pub mod intent;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod store;
pub mod ui;

use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::app::App;
use crate::config::AppConfig;
use crate::convert::ConversionRequest;
use crate::currency::CurrencyCode;
use crate::providers::exchange_rate::ExchangeRateProvider;
use crate::providers::geo::GeoProvider;
use crate::store::favorites::FavoritesStore;
use crate::store::history::HistoryStore;

#[derive(Debug)]
pub enum AppCommand {
    Convert {
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
    },
    Chat {
        message: Option<String>,
    },
    Rates {
        base: Option<CurrencyCode>,
    },
    Popular,
    History {
        clear: bool,
    },
    Favorites {
        remove: Option<String>,
    },
    Favorite {
        from: CurrencyCode,
        to: CurrencyCode,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    tracing::debug!("Loaded config: {config:#?}");

    let keyspace = match &config.data_dir {
        Some(dir) => store::open_at(dir)?,
        None => store::open_default()?,
    };
    let history = HistoryStore::open(&keyspace)?;
    let favorites = FavoritesStore::open(&keyspace)?;

    let provider = ExchangeRateProvider::new(
        &config.providers.primary.base_url,
        &config.providers.secondary.base_url,
    )?;
    let mut app = App::new(Box::new(provider), history, favorites);

    match command {
        AppCommand::Convert { amount, from, to } => {
            // Validation happens here, before any network call.
            let request = ConversionRequest::new(amount, from, to)?;

            let spinner = ui::fetch_spinner("Fetching exchange rates...");
            let result = app.convert(request).await;
            spinner.finish_and_clear();

            let result = result?;
            println!("{}", ui::render_result(&result));
            if app.favorites().is_favorite(result.from, result.to) {
                println!("{}", console::style("♥ favorite pair").dim());
            }
        }
        AppCommand::Chat { message: Some(message) } => {
            println!("{}", app.reply(&message).await);
        }
        AppCommand::Chat { message: None } => {
            chat_loop(&mut app).await?;
        }
        AppCommand::Rates { base } => {
            let base = match base {
                Some(base) => base,
                None => default_base(&config).await,
            };

            let spinner = ui::fetch_spinner("Fetching exchange rates...");
            let table = app.rate_provider().fetch_rates(base).await;
            spinner.finish_and_clear();

            println!("{}", ui::rates_table(&table?));
        }
        AppCommand::Popular => {
            let spinner = ui::fetch_spinner("Fetching popular pairs...");
            let pairs = app.popular_rates().await;
            spinner.finish_and_clear();

            println!("{}", ui::popular_table(&pairs));
        }
        AppCommand::History { clear: true } => {
            app.clear_history()?;
            println!("Conversion history cleared");
        }
        AppCommand::History { clear: false } => {
            let entries = app.history().entries();
            if entries.is_empty() {
                println!("No conversion history yet");
            } else {
                println!("{}", ui::history_table(entries));
            }
        }
        AppCommand::Favorites { remove: Some(key) } => {
            if app.remove_favorite(&key)? {
                println!("Removed {key} from favorites");
            } else {
                println!("No favorite named {key}");
            }
        }
        AppCommand::Favorites { remove: None } => {
            let entries = app.favorites().entries();
            if entries.is_empty() {
                println!("No favorite conversions yet");
            } else {
                println!("{}", ui::favorites_table(entries));
            }
        }
        AppCommand::Favorite { from, to } => {
            if app.toggle_favorite(from, to)? {
                println!("Added {from} → {to} to favorites");
            } else {
                println!("Removed {from} → {to} from favorites");
            }
        }
    }

    Ok(())
}

/// Base currency for commands that take none: config override first, then
/// geolocation, then USD.
async fn default_base(config: &AppConfig) -> CurrencyCode {
    if let Some(code) = config.default_from.as_deref().and_then(CurrencyCode::parse) {
        return code;
    }

    match GeoProvider::new(&config.providers.geo.base_url) {
        Ok(provider) => provider
            .detect_currency()
            .await
            .unwrap_or(CurrencyCode::USD),
        Err(_) => CurrencyCode::USD,
    }
}

async fn chat_loop(app: &mut App) -> Result<()> {
    println!(
        "Ask me things like 'Convert 100 dollars to euros' or 'What's 50 pounds in yen?'. \
         Type 'exit' to leave."
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        println!("bot> {}", app.reply(message).await);
    }

    Ok(())
}
