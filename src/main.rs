mod loader;
mod session;

use bookhub_core::{
    config::{self, BookhubConfig, Config},
    lang::Lang,
    shellexpand,
};
use bookhub_storage::Store;
use clap::{Parser, Subcommand};
use console::style;
use loader::RunOutcome;
use session::Session;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "bookhub",
    version,
    about = "BookHub: multilingual book and course catalog renderer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the catalog page and write it to the output path.
    Render {
        /// Render in this language instead of the stored one.
        #[arg(long)]
        lang: Option<String>,
        /// Output file (defaults to `page.output`).
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Set the stored language.
    Lang {
        /// Language code, e.g. `ar`, `en`, `fr`.
        code: String,
    },
    /// Show or toggle the stored theme.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Inspect or edit the durable key/value storage.
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
    /// Show configuration and stored UI state.
    Status,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Switch between light and dark and republish the page.
    Toggle,
    /// Print the stored theme.
    Show,
}

#[derive(Subcommand)]
enum StorageAction {
    Get { key: String },
    Set { key: String, value: String },
    Remove { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_logging(&cfg.bookhub)?;

    match cli.command {
        Commands::Render { lang, output } => {
            let output = output.unwrap_or_else(|| cfg.page.output.clone());
            let session = Session::new(cfg).await?;

            let outcome = match lang {
                Some(code) => {
                    let lang = Lang::new(&code)?;
                    let state = session.ui_state().await?;
                    session.apply_theme(state.theme).await;
                    session.set_language(&lang).await?
                }
                None => session.start().await?,
            };

            match outcome {
                RunOutcome::Rendered { books, courses } => {
                    println!("Rendered {books} books and {courses} courses.")
                }
                RunOutcome::Failed => println!(
                    "{} content could not be loaded; placeholders rendered.",
                    style("warning:").yellow().bold()
                ),
                RunOutcome::Skipped => println!(
                    "{} template has no card regions; page translated only.",
                    style("warning:").yellow().bold()
                ),
                RunOutcome::Stale => anyhow::bail!("render was superseded"),
            }

            session.publish(&output).await?;
            println!("Wrote {}", shellexpand(&output));
        }
        Commands::Lang { code } => {
            let lang = Lang::new(&code)?;
            let store = Store::new(&cfg.storage).await?;
            store.save_lang(&lang).await?;
            println!("Language set to {lang} ({}).", lang.dir());
        }
        Commands::Theme {
            action: ThemeAction::Show,
        } => {
            let store = Store::new(&cfg.storage).await?;
            let default_lang = Lang::new(&cfg.site.default_lang)?;
            println!("{}", store.ui_state(&default_lang).await?.theme);
        }
        Commands::Theme {
            action: ThemeAction::Toggle,
        } => {
            let output = cfg.page.output.clone();
            let session = Session::new(cfg).await?;
            let next = session.toggle_theme().await?;
            session.start().await?;
            session.publish(&output).await?;
            println!("Theme set to {next}; wrote {}", shellexpand(&output));
        }
        Commands::Storage { action } => {
            let store = Store::new(&cfg.storage).await?;
            match action {
                StorageAction::Get { key } => match store.get(&key).await? {
                    Some(value) => println!("{value}"),
                    None => anyhow::bail!("no value stored for '{key}'"),
                },
                StorageAction::Set { key, value } => {
                    if key == bookhub_storage::KEY_LANG {
                        Lang::new(&value)?;
                    }
                    store.set(&key, &value).await?;
                }
                StorageAction::Remove { key } => {
                    if !store.remove(&key).await? {
                        println!("'{key}' was not set.");
                    }
                }
            }
        }
        Commands::Status => print_status(&cli.config, &cfg).await?,
    }

    Ok(())
}

/// Install the stderr subscriber, plus a log file under
/// `<data_dir>/logs` when enabled.
fn init_logging(cfg: &BookhubConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    let stderr = fmt::layer().with_writer(std::io::stderr);

    if !cfg.log_file {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    }

    let dir = PathBuf::from(shellexpand(&cfg.data_dir)).join("logs");
    std::fs::create_dir_all(&dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, "bookhub.log"));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

async fn print_status(config_path: &str, cfg: &Config) -> anyhow::Result<()> {
    println!("{}\n", style("BookHub status").bold());
    println!("Config: {config_path}");
    println!(
        "Site:   {} ({})",
        cfg.site.base,
        if cfg.site.is_remote() { "http" } else { "local" }
    );

    let template = shellexpand(&cfg.page.template);
    let found = if Path::new(&template).exists() {
        style("found").green()
    } else {
        style("missing").red()
    };
    println!("Template: {template} ({found})");
    println!("Output:   {}", shellexpand(&cfg.page.output));
    println!();

    let default_lang = Lang::new(&cfg.site.default_lang)?;
    let store = Store::new(&cfg.storage).await?;
    let state = store.ui_state(&default_lang).await?;
    println!("  language: {} ({})", state.lang, state.lang.dir());
    println!("  theme:    {}", state.theme);
    println!(
        "  cached translations: {}",
        if store.cached_translations().await?.is_some() {
            "present"
        } else {
            "none"
        }
    );
    Ok(())
}
