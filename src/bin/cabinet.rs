//! File Cabinet CLI
//!
//! One-shot commands against a cabinet. Each invocation opens the store,
//! runs one operation, and exits.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use filecabinet::{
    CabinetError, Cabinet, Config, Field, Record, RecordParameters, Result, SearchOptions,
    Snapshot,
};
use tracing_subscriber::{fmt, EnvFilter};

/// File Cabinet
#[derive(Parser, Debug)]
#[command(name = "filecabinet")]
#[command(about = "Personal record cabinet with memory and flat-file storage")]
#[command(version)]
struct Args {
    /// Storage backend: memory or file
    #[arg(short, long, default_value = "file")]
    storage: String,

    /// Data file for the file backend
    #[arg(short, long, default_value = "cabinet.db")]
    data_file: String,

    /// Validation preset: default or custom
    #[arg(short = 'v', long, default_value = "default")]
    validation_rules: String,

    /// JSON file overriding preset validation bounds
    #[arg(long)]
    rules_file: Option<String>,

    /// Log every store call
    #[arg(long)]
    use_logger: bool,

    /// Time every store call
    #[arg(long)]
    use_stopwatch: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a record (fails if an explicit --id is taken)
    Create {
        first_name: String,
        last_name: String,
        /// MM/DD/YYYY or YYYY-MM-DD
        date_of_birth: String,
        height: String,
        cash_savings: String,
        favorite_letter: String,
        /// Explicit id
        #[arg(long)]
        id: Option<u32>,
    },

    /// Show one record
    Get { id: u32 },

    /// Show every record
    List,

    /// Show records matching --where conditions (all records if none)
    Select {
        #[arg(long = "where", value_parser = parse_pair)]
        conditions: Vec<(String, String)>,
        /// Combine conditions with OR instead of AND
        #[arg(long)]
        or: bool,
    },

    /// Assign --set field=value on records matching --where conditions
    Update {
        #[arg(long = "set", value_parser = parse_pair, required = true)]
        assignments: Vec<(String, String)>,
        #[arg(long = "where", value_parser = parse_pair, required = true)]
        conditions: Vec<(String, String)>,
        #[arg(long)]
        or: bool,
    },

    /// Delete records matching --where conditions
    Delete {
        #[arg(long = "where", value_parser = parse_pair, required = true)]
        conditions: Vec<(String, String)>,
        #[arg(long)]
        or: bool,
    },

    /// Delete one record by id
    Remove { id: u32 },

    /// Record counts
    Stat,

    /// Compact the data file
    Purge,

    /// Write a JSON snapshot of all records
    Export { path: String },

    /// Restore records from a JSON snapshot
    Import { path: String },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filecabinet=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut builder = Config::builder()
        .storage(args.storage.parse()?)
        .data_file(&args.data_file)
        .rule_set(args.validation_rules.parse()?)
        .use_logger(args.use_logger)
        .use_stopwatch(args.use_stopwatch);
    if let Some(path) = &args.rules_file {
        builder = builder.rules_file(path);
    }

    let mut cabinet = Cabinet::open(builder.build())?;
    let store = cabinet.store();

    match args.command {
        Commands::Create {
            first_name,
            last_name,
            date_of_birth,
            height,
            cash_savings,
            favorite_letter,
            id,
        } => {
            let mut params = RecordParameters::default();
            params.assign(Field::FirstName, &first_name)?;
            params.assign(Field::LastName, &last_name)?;
            params.assign(Field::DateOfBirth, &date_of_birth)?;
            params.assign(Field::Height, &height)?;
            params.assign(Field::CashSavings, &cash_savings)?;
            params.assign(Field::FavoriteLetter, &favorite_letter)?;
            params.id = id;

            let id = store.insert(&params)?;
            println!("Record #{} is created.", id);
        }
        Commands::Get { id } => print_record(&store.get_by_id(id)?),
        Commands::List => store.get_all()?.iter().for_each(print_record),
        Commands::Select { conditions, or } => {
            let options = search_options(conditions, or)?;
            store.select_by_options(&options)?.iter().for_each(print_record);
        }
        Commands::Update {
            assignments,
            conditions,
            or,
        } => {
            let options = search_options(conditions, or)?;
            let ids = store.update(&assignments, &options)?;
            println!("Records {} are updated.", format_ids(&ids));
        }
        Commands::Delete { conditions, or } => {
            let options = search_options(conditions, or)?;
            let ids = store.delete(&options)?;
            println!("Records {} are deleted.", format_ids(&ids));
        }
        Commands::Remove { id } => {
            if store.remove(id)? {
                println!("Record #{} is removed.", id);
            } else {
                println!("Record #{} doesn't exist.", id);
            }
        }
        Commands::Stat => {
            let stat = store.stat()?;
            println!("{} ({} active)", stat, stat.active());
        }
        Commands::Purge => println!("{}.", store.purge()?),
        Commands::Export { path } => {
            let snapshot = store.make_snapshot()?;
            let writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(writer, &snapshot)
                .map_err(|e| CabinetError::Serialization(e.to_string()))?;
            println!("{} records were exported to {}.", snapshot.len(), path);
        }
        Commands::Import { path } => {
            let reader = BufReader::new(File::open(&path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)
                .map_err(|e| CabinetError::Serialization(e.to_string()))?;
            let imported = store.restore(&snapshot)?;
            println!("{} records were imported from {}.", imported, path);
        }
    }

    Ok(())
}

/// Parse a `field=value` argument
fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected field=value, got '{}'", s))
}

fn search_options(conditions: Vec<(String, String)>, or: bool) -> Result<SearchOptions> {
    let connective = match (conditions.is_empty(), or) {
        (true, _) => "*",
        (false, true) => "or",
        (false, false) => "and",
    };
    SearchOptions::parse(conditions, connective)
}

fn format_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| format!("#{}", id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_record(record: &Record) {
    println!(
        "#{}, {}, {}, {}, {}, {}, {}",
        record.id(),
        record.first_name,
        record.last_name,
        record.date_of_birth.format("%Y-%m-%d"),
        record.height,
        record.cash_savings,
        record.favorite_letter
    );
}
