//! CLI command definitions.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use sheetbridge_props::PropertyScope;
use sheetbridge_sheets::SheetPurpose;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Store and load objects in the chunked cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Store and load objects in chunked properties
    Props {
        #[command(subcommand)]
        command: PropsCommands,
    },

    /// Remove duplicate items from a JSON array
    Dedup {
        /// JSON file holding an array of rows or objects
        file: PathBuf,

        /// Unique column index of array rows
        #[arg(long, conflicts_with = "property", required_unless_present = "property")]
        column: Option<usize>,

        /// Unique property of object items
        #[arg(long)]
        property: Option<String>,
    },

    /// Work with local spreadsheets
    Sheets {
        #[command(subcommand)]
        command: SheetCommands,
    },

    /// Query the configured database
    Sql {
        #[command(subcommand)]
        command: SqlCommands,
    },

    /// Track accumulated execution time
    Runtime {
        #[command(subcommand)]
        command: RuntimeCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Cache the JSON contents of a file
    Put {
        key: String,

        /// JSON file to cache
        file: PathBuf,

        /// Time to live in minutes
        #[arg(long)]
        ttl_minutes: Option<u32>,
    },

    /// Print a cached object
    Get { key: String },
}

#[derive(Subcommand)]
pub enum PropsCommands {
    /// Store the JSON contents of a file
    Put {
        name: String,

        /// JSON file to store
        file: PathBuf,

        #[arg(short, long, default_value = "script")]
        scope: PropertyScope,
    },

    /// Print a stored object
    Get {
        name: String,

        #[arg(short, long, default_value = "script")]
        scope: PropertyScope,
    },

    /// Delete every property in every scope
    Clear,
}

#[derive(Subcommand)]
pub enum SheetCommands {
    /// Apply write directives from a JSON file
    Write {
        /// JSON array of write directives
        directives: PathBuf,
    },

    /// Print the values of a sheet
    Read { spreadsheet: String, sheet: String },

    /// Apply the standard formatting to a sheet
    Format {
        spreadsheet: String,
        sheet: String,

        #[arg(short, long, default_value = "script")]
        purpose: SheetPurpose,

        /// Only size the last N rows
        #[arg(long)]
        rows_limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum SqlCommands {
    /// Run a query and print its rows
    Query {
        query: String,

        #[arg(long, default_value_t = 1000)]
        max_rows: u32,

        /// Print column names first
        #[arg(long)]
        header: bool,
    },
}

#[derive(Subcommand)]
pub enum RuntimeCommands {
    /// Add the time since START to the accumulated runtime
    Stop {
        /// RFC 3339 start time
        started: DateTime<Utc>,
    },

    /// Append the accumulated runtime to a spreadsheet and reset it
    Record { spreadsheet: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Key
        key: String,

        /// Value
        value: String,
    },
}
