//! Licdir CLI - licensed contractor directory search

use clap::{Parser, Subcommand};
use licdir_core::api::{SearchRequest, SearchService, SearchType};
use licdir_core::config::Config;
use licdir_core::contractors::{Contractor, ContractorRepository};
use licdir_core::storage::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "licdir")]
#[command(author, version, about = "Licensed contractor directory search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the contractor directory
    Search {
        /// Free-text search phrase
        query: String,
        /// Search type (smart, name, license, city)
        #[arg(short = 't', long, default_value = "smart")]
        search_type: String,
        /// Restrict name/license searches to a city
        #[arg(short, long)]
        city: Option<String>,
        /// Result page, starting at 1
        #[arg(short, long)]
        page: Option<i64>,
        /// Results per page
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Manage contractor records
    Contractors {
        #[command(subcommand)]
        action: ContractorAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ContractorAction {
    /// Show a contractor by license number
    Show { license_no: String },
    /// Import contractor records from a JSON file
    Import { file: String },
    /// Count contractor records
    Count,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("licdir=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let get_db = || async {
        let db_config = match &config.database.path {
            Some(path) => DatabaseConfig::with_path(path),
            None => DatabaseConfig::default(),
        };
        Database::new(db_config).await
    };

    match cli.command {
        Commands::Search {
            query,
            search_type,
            city,
            page,
            limit,
        } => {
            let db = get_db().await?;
            cmd_search(
                &db, &config, &query, &search_type, city, page, limit, cli.format, cli.quiet,
            )
            .await
        }

        Commands::Contractors { action } => {
            let db = get_db().await?;
            cmd_contractors(&db, action, cli.format, cli.quiet).await
        }

        Commands::Config { action } => cmd_config(config.clone(), action),

        Commands::Doctor => {
            let db = get_db().await?;
            cmd_doctor(&db, cli.quiet).await
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

#[allow(clippy::too_many_arguments)]
async fn cmd_search(
    db: &Database,
    config: &Config,
    query: &str,
    search_type: &str,
    city: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let service = SearchService::new(db.clone(), config);
    let request = SearchRequest {
        search_term: query.to_string(),
        search_type: SearchType::parse(search_type)?,
        city,
        state: None,
        page,
        limit,
    };

    tracing::debug!(query, search_type, "Running search");
    let response = service.search(&request).await?;
    tracing::info!(
        total = response.pagination.total,
        page = response.pagination.page,
        "Search complete"
    );

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.contractors.is_empty() {
        if !quiet {
            println!("No contractors found for '{}'.", query);
        }
        return Ok(());
    }

    if !quiet {
        println!(
            "Found {} contractor(s), page {} of {}:",
            response.pagination.total, response.pagination.page, response.pagination.total_pages
        );
    }
    for contractor in &response.contractors {
        println!("  {}", contractor_line(contractor));
    }
    Ok(())
}

async fn cmd_contractors(
    db: &Database,
    action: ContractorAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let repo = ContractorRepository::new(db);

    match action {
        ContractorAction::Show { license_no } => {
            match repo.get_by_license(&license_no).await? {
                Some(contractor) => {
                    if format == OutputFormat::Json {
                        println!("{}", serde_json::to_string_pretty(&contractor)?);
                    } else {
                        println!("Contractor: {}", contractor.business_name);
                        println!("  License: {}", contractor.license_no);
                        println!("  Status: {}", contractor.status.as_str());
                        if let Some(city) = &contractor.city {
                            println!("  City: {}", city);
                        }
                        if let Some(classification) = &contractor.classification {
                            println!("  Classification: {}", classification);
                        }
                        if let Some(trade) = &contractor.trade {
                            println!("  Trade: {}", trade);
                        }
                        if let Some(phone) = &contractor.phone {
                            println!("  Phone: {}", phone);
                        }
                        if let Some(expire) = contractor.expire_date {
                            println!("  Expires: {}", expire);
                        }
                    }
                }
                None => {
                    return Err(licdir_core::Error::ContractorNotFound(license_no).into());
                }
            }
        }
        ContractorAction::Import { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let records: Vec<Contractor> = serde_json::from_str(&contents)?;
            let total = records.len();

            for record in &records {
                repo.upsert(record).await?;
            }
            tracing::info!(count = total, file, "Imported contractor records");
            if !quiet {
                println!("Imported {} contractor record(s) from {}.", total, file);
            }
        }
        ContractorAction::Count => {
            let count = repo.count().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "count": count }));
            } else {
                println!("{} contractor record(s).", count);
            }
        }
    }
    Ok(())
}

fn cmd_config(mut config: Config, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::List => {
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(db: &Database, quiet: bool) -> anyhow::Result<()> {
    db.health_check().await?;
    let status = db.migration_status().await?;
    let repo = ContractorRepository::new(db);
    let count = repo.count().await?;

    if !quiet {
        println!("Database: ok ({})", db.path().display());
        println!(
            "Schema: v{} (target v{}){}",
            status.current_version,
            status.target_version,
            if status.needs_migration {
                " - migration needed"
            } else {
                ""
            }
        );
        println!("Contractors: {}", count);
    }
    Ok(())
}

/// One-line text rendering of a search hit
fn contractor_line(contractor: &Contractor) -> String {
    let mut line = format!("{} - {}", contractor.license_no, contractor.business_name);
    if let Some(trade) = &contractor.trade {
        line.push_str(&format!(" ({})", trade));
    }
    if let Some(city) = &contractor.city {
        line.push_str(&format!(", {}", city));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contractor_line_full() {
        let contractor = Contractor::new("996518", "Valley Plumbing")
            .with_city("Fresno")
            .with_classification("C-36", "Plumbing");
        assert_eq!(
            contractor_line(&contractor),
            "996518 - Valley Plumbing (Plumbing), Fresno"
        );
    }

    #[test]
    fn test_contractor_line_minimal() {
        let contractor = Contractor::new("123456", "Acme Builders");
        assert_eq!(contractor_line(&contractor), "123456 - Acme Builders");
    }

    #[tokio::test]
    async fn test_show_unknown_license_is_typed_error() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let err = cmd_contractors(
            &db,
            ContractorAction::Show {
                license_no: "000000".to_string(),
            },
            OutputFormat::Text,
            true,
        )
        .await
        .expect_err("missing contractor must be an error");

        match err.downcast_ref::<licdir_core::Error>() {
            Some(licdir_core::Error::ContractorNotFound(license)) => {
                assert_eq!(license, "000000");
            }
            other => panic!("expected ContractorNotFound, got {other:?}"),
        }
    }
}
