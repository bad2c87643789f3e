//! sheetdiff CLI - compare spreadsheets and manage upload history

mod config;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use sheetdiff::prelude::*;
use sheetdiff::{compare, compare_all, export_file, import_file, load_workbook, run_comparison};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{default_config_path, load_config, Config};

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(author, version, about = "Compare spreadsheets row by row")]
struct Cli {
    /// History database file
    #[arg(long, global = true, env = "SHEETDIFF_DB")]
    db: Option<PathBuf>,

    /// Configuration file (default: config.toml in the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two files
    Diff {
        /// Original file (xlsx, xlsm, csv)
        original: PathBuf,

        /// Modified file
        modified: PathBuf,

        /// Sheet to compare (default: every sheet present in both)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Also list unchanged rows
        #[arg(long)]
        all_rows: bool,
    },

    /// List the sheets of a file
    Sheets {
        /// Input file
        input: PathBuf,
    },

    /// Parse a file and store it in the history
    Import {
        /// Input file
        input: PathBuf,
    },

    /// Browse the upload history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Compare a sheet of two stored workbooks
    CompareIds {
        /// Id of the original workbook
        original: String,

        /// Id of the modified workbook
        modified: String,

        /// Sheet to compare
        #[arg(short, long)]
        sheet: String,

        /// Also list unchanged rows
        #[arg(long)]
        all_rows: bool,
    },

    /// Write a stored workbook to an xlsx file
    Export {
        /// Id of the stored workbook
        id: String,

        /// Output xlsx file
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List every entry, newest first
    List,

    /// Entries whose name contains the query (case-insensitive)
    Search {
        /// Text to look for
        query: String,
    },

    /// Remove an entry
    Remove {
        /// Id of the entry
        id: String,

        /// Also delete the stored workbook
        #[arg(long)]
        purge: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let config = load_config(&config_path)?;
    debug!("Loaded config from {}: {:?}", config_path.display(), config);

    let app = App {
        config,
        db: cli.db,
        json: cli.json,
    };

    match cli.command {
        Commands::Diff {
            original,
            modified,
            sheet,
            all_rows,
        } => app.diff(&original, &modified, sheet.as_deref(), all_rows).await,
        Commands::Sheets { input } => app.sheets(&input).await,
        Commands::Import { input } => app.import(&input).await,
        Commands::History { command } => match command {
            HistoryCommand::List => app.history_search("").await,
            HistoryCommand::Search { query } => app.history_search(&query).await,
            HistoryCommand::Remove { id, purge } => app.history_remove(&id, purge).await,
        },
        Commands::CompareIds {
            original,
            modified,
            sheet,
            all_rows,
        } => app.compare_ids(original, modified, sheet, all_rows).await,
        Commands::Export { id, output } => app.export(&id, &output).await,
    }
}

struct App {
    config: Config,
    db: Option<PathBuf>,
    json: bool,
}

impl App {
    fn open_store(&self) -> Result<HistoryStore> {
        let path = self.config.database_path(self.db.as_deref())?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        debug!("Opening history database {}", path.display());
        HistoryStore::open_path(&path)
            .with_context(|| format!("Failed to open history database '{}'", path.display()))
    }

    fn parse_options(&self) -> Result<ParseOptions> {
        let mut options = ParseOptions::default();
        if let Some(delimiter) = self.config.csv_delimiter()? {
            options.csv.delimiter = delimiter;
        }
        Ok(options)
    }

    async fn open(&self, path: &Path) -> Result<Workbook> {
        read_file(path, self.parse_options()?)
            .await
            .with_context(|| format!("Failed to open '{}'", path.display()))
    }

    async fn diff(
        &self,
        original: &Path,
        modified: &Path,
        sheet: Option<&str>,
        all_rows: bool,
    ) -> Result<()> {
        let original = self.open(original).await?;
        let modified = self.open(modified).await?;

        let results = match sheet {
            Some(name) => vec![compare(&original, &modified, name)?],
            None => {
                let results = compare_all(&original, &modified);
                if results.is_empty() {
                    eprintln!("Warning: the files have no sheet names in common");
                }
                results
            }
        };

        self.print_results(&results, all_rows)
    }

    async fn sheets(&self, input: &Path) -> Result<()> {
        let workbook = self.open(input).await?;

        if self.json {
            let sheets: Vec<serde_json::Value> = workbook
                .sheets()
                .iter()
                .map(|s| serde_json::json!({ "name": s.name(), "rows": s.row_count() }))
                .collect();
            return print_json(&sheets);
        }

        for (i, sheet) in workbook.sheets().iter().enumerate() {
            println!("{}\t{}\t{} rows", i, sheet.name(), sheet.row_count());
        }
        Ok(())
    }

    async fn import(&self, input: &Path) -> Result<()> {
        let store = self.open_store()?;
        let imported = import_file(&store, input, self.parse_options()?)
            .await
            .with_context(|| format!("Failed to import '{}'", input.display()))?;

        if self.json {
            return print_json(&imported.entry);
        }
        println!("{}", imported.entry.id);
        eprintln!(
            "Imported '{}' ({} sheets)",
            imported.entry.name,
            imported.workbook.sheet_count()
        );
        Ok(())
    }

    async fn history_search(&self, query: &str) -> Result<()> {
        let store = self.open_store()?;
        let entries = store.search(query).await?;

        if self.json {
            return print_json(&entries);
        }
        for entry in &entries {
            println!(
                "{}\t{}\t{}\t{} bytes",
                entry.id,
                entry.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
                entry.name,
                entry.size
            );
        }
        Ok(())
    }

    async fn history_remove(&self, id: &str, purge: bool) -> Result<()> {
        let store = self.open_store()?;
        let id = WorkbookId::from(id);

        let removed = store.remove(&id).await?;
        let purged = if purge {
            store.delete_workbook(&id).await?
        } else {
            false
        };

        if !removed && !purged {
            anyhow::bail!("No history entry with id {}", id);
        }
        if purged {
            eprintln!("Removed {} and its stored workbook", id);
        } else {
            eprintln!("Removed {}", id);
        }
        Ok(())
    }

    async fn compare_ids(
        &self,
        original: String,
        modified: String,
        sheet: String,
        all_rows: bool,
    ) -> Result<()> {
        let store = self.open_store()?;
        let request = ComparisonRequest::new(original, modified, sheet);
        let result = run_comparison(&store, &request).await?;
        self.print_results(&[result], all_rows)
    }

    async fn export(&self, id: &str, output: &Path) -> Result<()> {
        let store = self.open_store()?;
        let workbook = load_workbook(&store, &WorkbookId::from(id)).await?;
        export_file(&workbook, output)
            .await
            .with_context(|| format!("Failed to write '{}'", output.display()))?;
        eprintln!("Wrote '{}' to '{}'", workbook.name(), output.display());
        Ok(())
    }

    fn print_results(&self, results: &[DiffResult], all_rows: bool) -> Result<()> {
        if self.json {
            return print_json(&results);
        }

        let width = self.config.max_cell_width();
        let mut stdout = io::stdout().lock();
        for result in results {
            stdout
                .write_all(render::render_result(result, all_rows, width).as_bytes())
                .context("Failed to write to stdout")?;
        }
        Ok(())
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
    println!("{}", text);
    Ok(())
}
