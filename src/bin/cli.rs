//! jsonrepo CLI
//!
//! Command-line access to a file-backed record collection.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jsonrepo::{
    AddOutcome, Config, QueryParams, Record, Repository, Result, SchemaModel, UpdateOutcome,
};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// jsonrepo CLI
#[derive(Parser, Debug)]
#[command(name = "jsonrepo-cli")]
#[command(about = "CRUD and queries over a JSON record store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: String,

    /// Record type name (the store file is `<type>s.json`)
    #[arg(short = 't', long = "type")]
    type_name: String,

    /// Field whose value must be unique
    #[arg(short, long)]
    key: Option<String>,

    /// Declared (queryable) field; repeatable
    #[arg(short, long = "field")]
    fields: Vec<String>,

    /// Field that must be present and non-blank; repeatable
    #[arg(short, long)]
    required: Vec<String>,

    /// Write indented JSON
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a record given as a JSON object
    Add {
        /// The record, e.g. '{"Name":"Alice"}'
        json: String,
    },

    /// Replace a record (the JSON must carry its Id)
    Update {
        /// The record, e.g. '{"Id":1,"Name":"Alice"}'
        json: String,
    },

    /// Remove a record by Id
    Remove {
        /// The Id to remove
        id: u64,
    },

    /// Get a record by Id
    Get {
        /// The Id to get
        id: u64,
    },

    /// List records, optionally filtered and sorted
    List {
        /// Query string, e.g. 'Name=a*&sort=Id,desc'
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Find the first record whose field equals a JSON value
    Find {
        /// Field name
        field: String,

        /// Value as JSON, e.g. '"alice@example.com"' or 42
        value: String,
    },
}

const EXIT_NOT_FOUND: u8 = 2;
const EXIT_CONFLICT: u8 = 3;
const EXIT_INVALID: u8 = 4;

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jsonrepo=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut builder = SchemaModel::builder(&args.type_name);
    for field in &args.fields {
        builder = builder.field(field);
    }
    for field in &args.required {
        builder = builder.required(field);
    }
    if let Some(key) = &args.key {
        builder = builder.key(key);
    }

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .pretty(args.pretty)
        .build();

    let mut repo = Repository::new(builder.build(), &config)?;
    tracing::debug!("Using store {}", repo.store_path().display());

    let code = match args.command {
        Commands::Add { json } => match repo.add(json.parse::<Record>()?)? {
            AddOutcome::Added(record) => print_json(&record.to_value())?,
            AddOutcome::Conflict(record) => {
                print_json(&record.to_value())?;
                ExitCode::from(EXIT_CONFLICT)
            }
            AddOutcome::Invalid => ExitCode::from(EXIT_INVALID),
        },
        Commands::Update { json } => match repo.update(json.parse::<Record>()?)? {
            UpdateOutcome::Ok => ExitCode::SUCCESS,
            UpdateOutcome::Conflict => ExitCode::from(EXIT_CONFLICT),
            UpdateOutcome::NotFound => ExitCode::from(EXIT_NOT_FOUND),
            UpdateOutcome::Invalid => ExitCode::from(EXIT_INVALID),
        },
        Commands::Remove { id } => {
            if repo.remove(id)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_NOT_FOUND)
            }
        }
        Commands::Get { id } => match repo.get(id)? {
            Some(record) => print_json(&record.to_value())?,
            None => ExitCode::from(EXIT_NOT_FOUND),
        },
        Commands::List { query } => {
            let params = query.as_deref().map(QueryParams::parse).transpose()?;
            let records = repo.get_all(params.as_ref())?;
            let values: Vec<Value> = records.iter().map(Record::to_value).collect();
            print_json(&Value::Array(values))?
        }
        Commands::Find { field, value } => {
            let value: Value = serde_json::from_str(&value)?;
            match repo.find_by_field(&field, &value, None)? {
                Some(record) => print_json(&record.to_value())?,
                None => ExitCode::from(EXIT_NOT_FOUND),
            }
        }
    };

    Ok(code)
}

fn print_json(value: &Value) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}
