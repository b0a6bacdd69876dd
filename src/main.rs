/*!
# Moodiary - A Mood Diary

Command-line front end for the entry store. It collects input for new
entries and comments, renders the newest-first list, and backs up or
restores the entries directory.

## Usage

```
moodiary [OPTIONS] <COMMAND>

Commands:
  add      Writes a new entry
  list     Lists entries, newest first
  show     Shows one entry with its comments
  comment  Appends a comment to an entry
  delete   Deletes an entry
  backup   Writes a compressed archive of every entry record
  restore  Restores entry records from an archive and reloads

Options:
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
```

## Configuration

- `MOODIARY_DIR`: The directory to store entries (defaults to "~/.moodiary/entries")
- `RUST_LOG`: Overrides the log filter
*/

use chrono::{Local, Utc};
use moodiary::cli::{CliArgs, Command};
use moodiary::config::Config;
use moodiary::constants::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
    VERBOSE_LOG_LEVEL,
};
use moodiary::entry::Entry;
use moodiary::errors::AppResult;
use moodiary::ops::{self, NewEntry};
use moodiary::store::EntryStore;
use tracing::{debug, error, info, info_span, Instrument};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Sets up the global tracing subscriber writing to stderr.
///
/// `RUST_LOG` wins over the verbosity flag when set.
fn init_tracing(verbose: bool, log_format: &str) {
    let default_level = if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(std::io::stderr);

    let result = if log_format == LOG_FORMAT_JSON {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose, &args.log_format);

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );

    if let Err(e) = run(args).instrument(root_span).await {
        error!(error = %e, "Application error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> AppResult<()> {
    info!("Starting moodiary");
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;

    let store = EntryStore::open_in(&config.entries_dir)?;
    store.ready().await?;
    run_with_store(&store, &config, args.command).await
}

async fn run_with_store(store: &EntryStore, config: &Config, command: Command) -> AppResult<()> {
    match command {
        Command::Add {
            mood,
            title,
            content,
            images,
            color,
            opacity,
        } => {
            let input = NewEntry {
                mood,
                title,
                content,
                images,
                color,
                opacity,
            };
            let entry = ops::compose_entry(&input, Utc::now())?;
            let id = entry.id();
            store.add(entry).await?;
            println!("{}", id);
        }
        Command::List => {
            let entries = store.entries();
            if entries.is_empty() {
                println!("No entries yet");
            }
            for entry in entries.iter() {
                println!(
                    "{}  {}  {}  {}",
                    entry.id(),
                    entry.created_at().with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    entry.mood_marker(),
                    entry.title()
                );
            }
        }
        Command::Show { id } => match find_entry(store, &id)? {
            Some(entry) => print_entry(&entry),
            None => println!("No entry with id {}", id),
        },
        Command::Comment { id, text } => {
            let resolved = ops::resolve_entry_id(&store.entries(), &id)?;
            match resolved {
                Some(entry_id) => {
                    match ops::comment_on_entry(store, entry_id, &text, Utc::now()).await? {
                        Some(entry) => {
                            println!("Added comment ({} total)", entry.comments().len())
                        }
                        None => println!("No entry with id {}", id),
                    }
                }
                None => println!("No entry with id {}", id),
            }
        }
        Command::Delete { id } => {
            let resolved = ops::resolve_entry_id(&store.entries(), &id)?;
            let deleted = match resolved {
                Some(entry_id) => store.delete_by_id(entry_id).await?,
                None => false,
            };
            if deleted {
                println!("Deleted {}", id);
            } else {
                println!("No entry with id {}", id);
            }
        }
        Command::Restore { archive } => {
            let report = ops::restore_backup(&archive, &config.entries_dir)?;
            let entries = store.reload_on_resume().await?;
            println!(
                "Restored {} records ({} skipped); {} entries loaded",
                report.entries_restored,
                report.skipped,
                entries.len()
            );
        }
        Command::Backup { output } => {
            let report = ops::create_backup(&config.entries_dir, &output)?;
            println!(
                "Backed up {} entries to {} ({} bytes)",
                report.total_entries,
                output.display(),
                report.archive_size
            );
            println!("checksum: {}", report.checksum);
        }
    }

    Ok(())
}

fn find_entry(store: &EntryStore, query: &str) -> AppResult<Option<Entry>> {
    Ok(ops::resolve_entry_id(&store.entries(), query)?.and_then(|id| store.get(id)))
}

fn print_entry(entry: &Entry) {
    println!("{} {}", entry.mood_marker(), entry.title());
    println!(
        "{}",
        entry.created_at().with_timezone(&Local).format("%A, %B %d, %Y %H:%M")
    );
    println!(
        "accent: {} @ {:.2}",
        entry.effective_accent(),
        entry.accent_opacity()
    );
    if !entry.images().is_empty() {
        println!("photos: {}", entry.images().len());
    }
    println!();
    println!("{}", entry.content());

    if !entry.comments().is_empty() {
        println!();
        for comment in entry.comments() {
            println!(
                "- [{}] {}",
                comment.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                comment.text
            );
        }
    }
}
