//! Command handlers.

use crate::config::{CliConfig, OutputFormat};
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use serde_json::Value;
use sheetbridge_cache::{CacheClient, CacheLookup, FilesystemBackend, ProcessLock, StoreLayout};
use sheetbridge_core::WriteDirective;
use sheetbridge_core::ports::SpreadsheetService;
use sheetbridge_db::{Database, read_table, write_directives};
use sheetbridge_props::{Properties, PropertyScope, get_from_props, put_in_props};
use sheetbridge_sheets::{
    DedupKey, FileSpreadsheets, SheetPurpose, convert_millis, deduplicate, format_sheet,
    read_select, record_runtime, runtime_count_stop, write_to_sheets,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_value<T: Serialize>(config: &CliConfig, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = match config.output_format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn cache_client(config: &CliConfig) -> Result<CacheClient, Box<dyn std::error::Error>> {
    config.cache.validate()?;
    let dir = config.cache_dir()?;
    debug!(dir = %dir.display(), "Using filesystem cache");
    let backend = Arc::new(FilesystemBackend::new(dir));
    Ok(CacheClient::new(backend, ProcessLock::new(), config.cache.clone()))
}

fn properties(config: &CliConfig) -> Result<Properties, Box<dyn std::error::Error>> {
    Ok(Properties::in_dir(&config.props_dir()?))
}

async fn database(config: &CliConfig) -> Result<Database, Box<dyn std::error::Error>> {
    let url = config
        .database_url
        .as_deref()
        .ok_or("database_url is not configured; run `sheetbridge config set database_url <url>`")?;
    Ok(Database::connect(url).await?)
}

/// Cache the JSON contents of a file.
pub async fn cache_put(
    config: &CliConfig,
    key: &str,
    file: &Path,
    ttl_minutes: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let value: Value = read_json(file)?;
    let layout = cache_client(config)?.put(key, &value, ttl_minutes).await?;

    let described = match layout {
        StoreLayout::Inline => "inline".to_string(),
        StoreLayout::Compressed => "compressed".to_string(),
        StoreLayout::Multipart { parts } => format!("{} parts", parts),
    };
    println!("{} Cached {} ({})", style("✓").green(), style(key).bold(), described);
    Ok(())
}

/// Print a cached object.
pub async fn cache_get(config: &CliConfig, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    match cache_client(config)?.get::<Value>(key).await? {
        CacheLookup::Hit(value) => print_value(config, &value),
        CacheLookup::Miss => {
            println!("{} No cached value for {}", style("i").blue(), style(key).bold());
            Ok(())
        }
        CacheLookup::Corrupt { expected, actual } => Err(format!(
            "Cached value for {} is corrupt (checksum {} != {})",
            key, actual, expected
        )
        .into()),
    }
}

/// Store the JSON contents of a file as chunked properties.
pub async fn props_put(
    config: &CliConfig,
    name: &str,
    file: &Path,
    scope: PropertyScope,
) -> Result<(), Box<dyn std::error::Error>> {
    let value: Value = read_json(file)?;
    let props = properties(config)?;
    let chunks = put_in_props(props.scope(scope).as_ref(), &value, name).await?;
    println!(
        "{} Stored {} in {} properties ({} chunks)",
        style("✓").green(),
        style(name).bold(),
        scope,
        chunks
    );
    Ok(())
}

/// Print an object stored as chunked properties.
pub async fn props_get(
    config: &CliConfig,
    name: &str,
    scope: PropertyScope,
) -> Result<(), Box<dyn std::error::Error>> {
    let props = properties(config)?;
    match get_from_props::<Value>(props.scope(scope).as_ref(), name).await? {
        Some(value) => print_value(config, &value),
        None => {
            println!("{} No {} property named {}", style("i").blue(), scope, style(name).bold());
            Ok(())
        }
    }
}

/// Delete every property in every scope.
pub async fn props_clear(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = properties(config)?.clear_all().await?;
    println!(
        "{} Cleared properties (script: {}, document: {}, user: {})",
        style("✓").green(),
        report.script,
        report.document,
        report.user
    );
    Ok(())
}

/// Remove duplicates from a JSON array file.
pub fn dedup(
    config: &CliConfig,
    file: &Path,
    column: Option<usize>,
    property: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let items: Vec<Value> = read_json(file)?;
    let key = match (column, property) {
        (Some(column), _) => DedupKey::Column(column),
        (None, Some(property)) => DedupKey::Property(property),
        (None, None) => return Err("Either --column or --property is required".into()),
    };
    print_value(config, &deduplicate(&items, &key))
}

/// Apply write directives to local spreadsheets, then to SQL when asked.
pub async fn sheets_write(config: &CliConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let directives: Vec<WriteDirective> = read_json(path)?;
    let sheets = FileSpreadsheets::new(config.sheets_dir()?);

    // Directives may target spreadsheets that have never been saved.
    for directive in &directives {
        let workbook = sheets.open_or_create(&directive.sheet_id).await?;
        if workbook.sheets.is_empty() {
            sheets.save(&workbook).await?;
        }
    }

    let wants_sql = directives.first().is_some_and(|d| d.sql_write);
    debug!(directives = directives.len(), sql = wants_sql, "Applying write directives");
    let (sheet_reports, sql_reports) = if wants_sql {
        let db = database(config).await?;
        write_directives(&sheets, &db.tables(), &directives).await?
    } else {
        (write_to_sheets(&sheets, &directives).await?, vec![])
    };

    for report in &sheet_reports {
        println!(
            "{} {}!{}: {} rows at row {}{}",
            style("✓").green(),
            report.sheet_id,
            style(&report.sheet_name).bold(),
            report.rows_written,
            report.start_row,
            if report.created { " (new sheet)" } else { "" }
        );
    }
    for report in &sql_reports {
        println!(
            "{} {}: {} rows{}",
            style("✓").green(),
            style(&report.table).bold(),
            report.rows_inserted,
            if report.truncated { " (truncated)" } else { "" }
        );
    }
    Ok(())
}

/// Print the values of a local sheet.
pub async fn sheets_read(
    config: &CliConfig,
    spreadsheet: &str,
    sheet: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let sheets = FileSpreadsheets::new(config.sheets_dir()?);
    print_value(config, &read_select(&sheets, spreadsheet, sheet).await?)
}

/// Apply the standard formatting to a local sheet.
pub async fn sheets_format(
    config: &CliConfig,
    spreadsheet: &str,
    sheet: &str,
    purpose: SheetPurpose,
    rows_limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sheets = FileSpreadsheets::new(config.sheets_dir()?);
    let mut workbook = sheets.open(spreadsheet).await?;
    let target = workbook
        .sheet_mut(sheet)
        .ok_or_else(|| format!("No sheet named {} in {}", sheet, spreadsheet))?;

    format_sheet(target, purpose, rows_limit);
    sheets.save(&workbook).await?;
    println!("{} Formatted {}", style("✓").green(), style(sheet).bold());
    Ok(())
}

/// Run a query against the configured database.
pub async fn sql_query(
    config: &CliConfig,
    query: &str,
    max_rows: u32,
    header: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = database(config).await?;
    print_value(config, &read_table(&db.tables(), query, max_rows, header).await?)
}

/// Add the time since `started` to the accumulated runtime.
pub async fn runtime_stop(
    config: &CliConfig,
    started: DateTime<Utc>,
) -> Result<(), Box<dyn std::error::Error>> {
    let props = properties(config)?;
    let total = runtime_count_stop(props.script(), started).await?;
    println!(
        "{} Accumulated runtime {}",
        style("✓").green(),
        convert_millis(total.max(0) as u64)
    );
    Ok(())
}

/// Record the accumulated runtime into a local spreadsheet.
pub async fn runtime_record(
    config: &CliConfig,
    spreadsheet: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let props = properties(config)?;
    let sheets = FileSpreadsheets::new(config.sheets_dir()?);
    let workbook = sheets.open_or_create(spreadsheet).await?;
    sheets.save(&workbook).await?;

    match record_runtime(&sheets, spreadsheet, props.script()).await? {
        Some(ms) => println!(
            "{} Recorded runtime {}",
            style("✓").green(),
            convert_millis(ms.max(0) as u64)
        ),
        None => println!("{} Recorded empty runtime", style("i").blue()),
    }
    Ok(())
}

/// Show current configuration.
pub fn show_config(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", style("Current configuration:").bold());
    println!("  Config file: {}", CliConfig::config_path()?.display());
    println!("  Data dir: {}", config.data_dir()?.display());
    println!(
        "  Database: {}",
        config.database_url.as_deref().unwrap_or("(not set)")
    );
    println!("  Output format: {:?}", config.output_format);
    println!(
        "  Cache: ttl {} min, lock timeout {} ms, {:?} / {:?}",
        config.cache.default_ttl_minutes,
        config.cache.lock_timeout_ms,
        config.cache.compression,
        config.cache.digest
    );
    Ok(())
}

/// Set a configuration value.
pub fn set_config(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::load().unwrap_or_default();
    config.set(key, value)?;
    config.save()?;
    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}
