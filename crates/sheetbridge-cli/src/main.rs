//! SheetBridge CLI entrypoint.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod handlers;

use commands::{
    CacheCommands, Commands, ConfigCommands, PropsCommands, RuntimeCommands, SheetCommands,
    SqlCommands,
};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "sheetbridge")]
#[command(author, version, about = "Move data between spreadsheets, SQL, and size-limited stores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().unwrap_or_default();

    match cli.command {
        Commands::Cache { command } => match command {
            CacheCommands::Put {
                key,
                file,
                ttl_minutes,
            } => handlers::cache_put(&config, &key, &file, ttl_minutes).await?,
            CacheCommands::Get { key } => handlers::cache_get(&config, &key).await?,
        },
        Commands::Props { command } => match command {
            PropsCommands::Put { name, file, scope } => {
                handlers::props_put(&config, &name, &file, scope).await?
            }
            PropsCommands::Get { name, scope } => handlers::props_get(&config, &name, scope).await?,
            PropsCommands::Clear => handlers::props_clear(&config).await?,
        },
        Commands::Dedup {
            file,
            column,
            property,
        } => handlers::dedup(&config, &file, column, property)?,
        Commands::Sheets { command } => match command {
            SheetCommands::Write { directives } => {
                handlers::sheets_write(&config, &directives).await?
            }
            SheetCommands::Read { spreadsheet, sheet } => {
                handlers::sheets_read(&config, &spreadsheet, &sheet).await?
            }
            SheetCommands::Format {
                spreadsheet,
                sheet,
                purpose,
                rows_limit,
            } => handlers::sheets_format(&config, &spreadsheet, &sheet, purpose, rows_limit).await?,
        },
        Commands::Sql { command } => match command {
            SqlCommands::Query {
                query,
                max_rows,
                header,
            } => handlers::sql_query(&config, &query, max_rows, header).await?,
        },
        Commands::Runtime { command } => match command {
            RuntimeCommands::Stop { started } => handlers::runtime_stop(&config, started).await?,
            RuntimeCommands::Record { spreadsheet } => {
                handlers::runtime_record(&config, &spreadsheet).await?
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => handlers::show_config(&config)?,
            ConfigCommands::Set { key, value } => handlers::set_config(&key, &value)?,
        },
    }

    Ok(())
}
