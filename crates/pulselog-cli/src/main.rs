//! PulseLog operator CLI
//!
//! Inspect and maintain a PulseLog record store without the desktop shell:
//! list and filter records, export sheets, import device measurements,
//! take or restore backups, and inspect storage slots.
//!
//! Sheet files are CSV unless the extension names a workbook (`.xlsx`,
//! `.xls`, `.ods`, ...).

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pulselog_core::backup::{self, Backup};
use pulselog_core::config::{self, StoreConfig};
use pulselog_core::formatters::format_date_label;
use pulselog_core::interop::{self, SheetFormat, SheetReader, SheetWriter};
use pulselog_core::{
    ColumnMapping, Database, DateRange, Field, FilterSpec, ImportLayout, PatientRecord, Query,
    RecordStore, Sheet, SortSpec, Window,
};

#[derive(Parser)]
#[command(name = "pulselog")]
#[command(about = "Manage a PulseLog patient record store")]
#[command(version)]
struct Cli {
    /// Database file (defaults to the per-user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Fail on undecodable stored data instead of showing an empty list
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records
    List {
        /// Case-insensitive name substring
        #[arg(short, long)]
        name: Option<String>,

        /// Resident-number prefix
        #[arg(short, long)]
        resident: Option<String>,

        /// First creation day (YYYY-MM-DD, UTC)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last creation day (YYYY-MM-DD, UTC)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Sort field, e.g. name, createdAt, systolicBP
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Maximum rows to show (all when omitted)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Add a record
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        resident: String,

        #[arg(long, default_value = "")]
        phone: String,

        /// Height in cm
        #[arg(long)]
        height: Option<f64>,

        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Symptom (repeatable)
        #[arg(long = "symptom")]
        symptoms: Vec<String>,

        #[arg(long, default_value = "")]
        memo: String,
    },

    /// Delete records by ID
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Export records as CSV or xlsx
    Export {
        /// Output file, xlsx by extension (CSV to stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Include every field, waveform metrics too
        #[arg(long)]
        full: bool,
    },

    /// Import the latest device measurement into a record
    Import {
        /// Record ID
        #[arg(long)]
        id: String,

        /// Device sheet (CSV, or a workbook by extension)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Write a backup document
    Backup {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace all records from a backup document
    Restore {
        file: PathBuf,
    },

    /// List storage slots and when each was last written
    Slots,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

fn open_store(cli: &Cli) -> Result<RecordStore<Database>> {
    let path = match &cli.db {
        Some(path) => path.clone(),
        None => {
            let path = config::default_database_path()
                .context("No data directory on this platform; pass --db")?;
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            path
        }
    };

    tracing::debug!(path = %path.display(), "Opening record store");
    let db = Database::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(RecordStore::new(
        db,
        StoreConfig::default().with_lenient_read(!cli.strict),
    ))
}

fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let store = open_store(&cli)?;

    match cli.command {
        Commands::List {
            name,
            resident,
            from,
            to,
            sort,
            desc,
            limit,
        } => {
            let mut filter = FilterSpec::default();
            if let Some(name) = name {
                filter = filter.with_name(name);
            }
            if let Some(prefix) = resident {
                filter = filter.with_resident_prefix(prefix);
            }
            if let (Some(from), Some(to)) = (from, to) {
                let range = DateRange::days(from, to).context("Invalid date range")?;
                filter = filter.with_date_range(range);
            }

            let sort = match sort {
                Some(name) => {
                    let field = Field::from_name(&name).with_context(|| format!("Unknown field: {}", name))?;
                    Some(if desc {
                        SortSpec::descending(field)
                    } else {
                        SortSpec::ascending(field)
                    })
                }
                None => None,
            };

            let query = Query {
                filter,
                sort,
                window: limit.map(Window::new).unwrap_or_else(Window::unbounded),
            };
            let records = store.list_records()?;
            let result = query.run(&records);

            for stored in &result.rows {
                let local = stored.created_at.with_timezone(&chrono::Local);
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    stored.id,
                    format_date_label(&local),
                    stored.record.name,
                    stored.record.resident_number(),
                    stored.record.phone
                )?;
            }
            if result.has_more {
                writeln!(out, "... {} of {} shown", result.rows.len(), result.matched)?;
            }
        }

        Commands::Add {
            name,
            resident,
            phone,
            height,
            weight,
            symptoms,
            memo,
        } => {
            let mut record = PatientRecord::new(name, &resident);
            record.set_phone(&phone);
            record.set_body_measurements(height, weight);
            for symptom in &symptoms {
                record.add_symptom(symptom);
            }
            record.memo = memo;

            let stored = store.save_record(record)?;
            writeln!(out, "{}", stored.id)?;
        }

        Commands::Delete { ids } => {
            let before = store.list_records()?.len();
            let remaining = store.delete_records(&ids)?;
            writeln!(out, "Deleted {} record(s)", before - remaining.len())?;
        }

        Commands::Export { out: path, full } => {
            let mapping = if full {
                ColumnMapping::full()
            } else {
                ColumnMapping::standard()
            };
            let sheet = Sheet::from_records(&store.list_records()?, &mapping);
            match path {
                Some(path) => {
                    SheetFormat::from_path(&path)
                        .write_sheet(&sheet, &path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Exported {} record(s) to {}", sheet.rows.len(), path.display())?;
                }
                None => out.write_all(sheet.to_csv().as_bytes())?,
            }
        }

        Commands::Import { id, file } => {
            let stored = store
                .get_record(&id)?
                .with_context(|| format!("No record with ID {}", id))?;
            let sheet = SheetFormat::from_path(&file)
                .read_sheet(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut record = stored.record;
            let row = interop::import_latest_measurement(&sheet, &mut record, &ImportLayout::default())?;
            store.replace_record(&id, record)?;
            writeln!(
                out,
                "Imported measurement from {} (sheet row {})",
                row.measured_at,
                row.row_index + 1
            )?;
        }

        Commands::Backup { out: path } => {
            let json = backup::create_backup(&store)?.to_json()?;
            match path {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Backup written to {}", path.display())?;
                }
                None => writeln!(out, "{}", json)?,
            }
        }

        Commands::Restore { file } => {
            let parsed = read_backup(&file)?;
            let count = backup::restore_backup(&store, &parsed)?;
            writeln!(out, "Restored {} record(s)", count)?;
        }

        Commands::Slots => {
            let db = store.storage();
            for name in db.list_slots()? {
                let updated_at = db.slot_updated_at(&name)?.unwrap_or_default();
                let marker = if name == store.config().slot_name { "*" } else { "" };
                writeln!(out, "{}{}\t{}", name, marker, updated_at)?;
            }
        }
    }

    Ok(())
}

fn read_backup(path: &Path) -> Result<Backup> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(Backup::from_json(&text)?)
}
