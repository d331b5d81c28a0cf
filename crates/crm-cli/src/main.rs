use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crm_config::{secrets, LoadedConfig};

#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "crm service operator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        /// Layered config paths in merge order (default: $CRM_CONFIG)
        #[arg(long = "config", global = true)]
        config_paths: Vec<String>,

        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Config utilities
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    /// Connectivity check + presence of the customers/orders tables.
    Status,

    /// Apply embedded SQL migrations (idempotent).
    Migrate,
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Compute layered config hash + print canonical JSON
    Show {
        /// Paths in merge order (base -> env overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Db { config_paths, cmd } => {
            let loaded = load_config(&config_paths)?;
            let db = &loaded.settings.database;
            let secrets = secrets::resolve_database_secrets(db)?;
            let pool = crm_db::connect(&secrets.url, db.max_connections).await?;

            match cmd {
                DbCmd::Status => {
                    let s = crm_db::status(&pool).await?;
                    println!(
                        "db_ok={} has_customers_table={} has_orders_table={}",
                        s.ok, s.has_customers_table, s.has_orders_table
                    );
                }
                DbCmd::Migrate => {
                    crm_db::migrate(&pool).await?;
                    println!("migrations_applied=true");
                }
            }
        }

        Commands::Config { cmd } => match cmd {
            ConfigCmd::Show { paths } => {
                let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
                let loaded = crm_config::load_layered_yaml(&path_refs)?;
                println!("config_hash={}", loaded.config_hash);
                println!("{}", loaded.canonical_json);
            }
        },
    }

    Ok(())
}

/// Explicit `--config` paths win; otherwise `$CRM_CONFIG` (possibly unset).
fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    if paths.is_empty() {
        return crm_config::load_from_env().context("config load failed");
    }
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    crm_config::load_layered_yaml(&path_refs)
}
