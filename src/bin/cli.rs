//! Shelfmate CLI
//!
//! Runs the client core against the live catalog and a configured backend.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use shelfmate::{
    error::{Result, error_message},
    models::{Config, ShelfAction, time_ago},
    pipeline,
    services::{
        ActivityEnricher, BackendApi, BookDetailResolver, CatalogClient, FavoriteAction,
        FavoriteKind, HttpBackend, NavigationState, Navigator, Notifier, OpenLibraryClient,
        ShelfKind, SimilarBooksAggregator, StatusSynchronizer, SyncContext, Toast, ToastKind,
    },
    session::SessionStore,
    utils::{Liveness, normalize_key},
};

/// Shelfmate - book tracking client core
#[derive(Parser, Debug)]
#[command(name = "shelfmate", version, about = "Book tracking client core")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "shelfmate.toml")]
    config: PathBuf,

    /// Backend bearer token (overrides the config file)
    #[arg(long, env = "SHELFMATE_TOKEN")]
    token: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a book's details and similar books
    Book {
        /// Work key, e.g. OL45883W or /works/OL45883W
        key: String,
    },

    /// List books similar to a work through the given subjects
    Similar {
        key: String,

        /// Subject to search (repeatable)
        #[arg(long = "subject")]
        subjects: Vec<String>,
    },

    /// Show the recent activity feed
    Feed,

    /// Put a book on a shelf (wantToRead, ongoing, completed) or remove it
    Shelf { key: String, status: ShelfAction },

    /// Toggle a book in favorites
    Favorite { key: String },

    /// Validate configuration
    Validate,
}

/// Prints toasts to the log; prompts resolve to a fixed answer.
struct ConsoleNotifier {
    assume_yes: bool,
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => log::info!("✓ {}", toast.message),
            ToastKind::Warning => log::warn!("{}", toast.message),
            ToastKind::Error => log::error!("{}", toast.message),
        }
    }

    async fn confirm(&self, message: &str) -> bool {
        log::info!("{} [{}]", message, if self.assume_yes { "yes" } else { "no" });
        self.assume_yes
    }
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str, state: NavigationState) {
        log::info!("→ {} (return to {})", path, state.from);
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Populate the session from the backend when a token is configured.
async fn restore_session(config: &Config, backend: &dyn BackendApi, store: &SessionStore) {
    if config.backend.token.is_none() {
        log::debug!("No token configured, continuing logged out");
        return;
    }
    match backend.fetch_current_user().await {
        Ok(user) => {
            log::info!("Logged in as {}", user.username);
            store.login(user);
        }
        Err(e) => log::warn!("Could not restore session: {}", error_message(&e)),
    }
}

fn book_path(key: &str) -> String {
    format!("/books/{}", key.rsplit('/').next().unwrap_or(key))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(token) = cli.token {
        config.backend.token = Some(token);
    }
    let config = Arc::new(config);

    let catalog: Arc<dyn CatalogClient> = Arc::new(OpenLibraryClient::new(&config.catalog)?);
    let backend: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(&config.backend)?);
    let store = SessionStore::new();

    match cli.command {
        Command::Book { key } => {
            let key = normalize_key(&key)?;
            let resolver = BookDetailResolver::new(Arc::clone(&config), Arc::clone(&catalog));
            let aggregator =
                SimilarBooksAggregator::new(Arc::clone(&config), Arc::clone(&catalog));

            let Some(page) =
                pipeline::load_book_page(&resolver, &aggregator, &key, &Liveness::new()).await
            else {
                return Ok(());
            };
            println!("{}", serde_json::to_string_pretty(&page)?);
        }

        Command::Similar { key, subjects } => {
            let key = normalize_key(&key)?;
            let aggregator = SimilarBooksAggregator::new(Arc::clone(&config), catalog);
            let similar = aggregator.try_fetch_similar(&key, &subjects).await?;
            for candidate in &similar {
                println!(
                    "{}  {} by {} ({})",
                    candidate.work_key, candidate.title, candidate.primary_author,
                    candidate.source_subject
                );
            }
            log::info!("{} similar books", similar.len());
        }

        Command::Feed => {
            restore_session(&config, backend.as_ref(), &store).await;
            let enricher =
                ActivityEnricher::new(Arc::clone(&config), catalog, Arc::clone(&backend));
            let Some(feed) =
                pipeline::load_feed(backend.as_ref(), &store, &enricher, &Liveness::new()).await?
            else {
                return Ok(());
            };

            let now = Utc::now();
            for item in &feed {
                println!(
                    "{} (@{}) {}  [{}]",
                    item.user_full_name,
                    item.user_name,
                    item.headline(),
                    time_ago(item.event.occurred_at, now)
                );
            }
        }

        Command::Shelf { key, status } => {
            let key = normalize_key(&key)?;
            restore_session(&config, backend.as_ref(), &store).await;
            let ctx = sync_context(&config, &store, &backend, cli.yes);
            let sync = StatusSynchronizer::mount(ShelfKind, ctx, &key, &book_path(&key));
            let outcome = sync.change(status).await;
            log::debug!("Shelf change for {} ended in {:?}", sync.book_key(), outcome);
        }

        Command::Favorite { key } => {
            let key = normalize_key(&key)?;
            restore_session(&config, backend.as_ref(), &store).await;
            let ctx = sync_context(&config, &store, &backend, cli.yes);
            let sync = StatusSynchronizer::mount(FavoriteKind, ctx, &key, &book_path(&key));
            let outcome = sync.change(FavoriteAction::Toggle).await;
            log::debug!("Favorite change for {} ended in {:?}", sync.book_key(), outcome);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

fn sync_context(
    config: &Arc<Config>,
    store: &SessionStore,
    backend: &Arc<dyn BackendApi>,
    assume_yes: bool,
) -> SyncContext {
    SyncContext {
        config: Arc::clone(config),
        store: store.clone(),
        backend: Arc::clone(backend),
        notifier: Arc::new(ConsoleNotifier { assume_yes }),
        navigator: Arc::new(ConsoleNavigator),
    }
}
