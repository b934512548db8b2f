use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use finplan_lib::backend::Backend;
use finplan_lib::calc::{self, format_chf};
use finplan_lib::config::{BackendConfig, Config};
use finplan_lib::{db, export, logging, migrate, networth, Services};

const CLI_LOG_FILTER: &str = "finplan=warn,sqlx=warn";

#[derive(Debug, Parser)]
#[command(name = "finplan", about = "Client financial-planning data tools", version)]
struct Cli {
    /// Local SQLite file; overrides FINPLAN_DB and any remote configuration.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Local database maintenance.
    #[command(subcommand)]
    Db(DbCommand),
    /// Client roster commands.
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// Write the full planning record of one client as JSON.
    Export {
        client_id: String,
        /// Destination file; stdout when omitted.
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Aggregate assets and liabilities of one client.
    NetWorth {
        client_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Monthly budget of one client: income, expenses, savings and balance.
    Budget {
        client_id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply pending schema migrations.
    Migrate,
    /// List embedded migrations and whether each has been applied.
    Status,
}

#[derive(Debug, Subcommand)]
enum ClientsCommand {
    /// List every client, ordered by name.
    List {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };
    let filter = config.log_filter.as_deref().unwrap_or(CLI_LOG_FILTER);
    let log_guard = match &config.log_dir {
        Some(dir) => match logging::init_with_file(dir, Some(filter)) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("Error: log file setup in {}: {err:#}", dir.display());
                process::exit(1);
            }
        },
        None => {
            logging::init(Some(filter));
            None
        }
    };

    let code = match handle_cli(cli, config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            1
        }
    };
    // flush the file sink before exiting
    drop(log_guard);
    process::exit(code);
}

fn handle_cli(cli: Cli, config: Config) -> Result<i32> {
    let backend = match cli.db {
        Some(db_path) => BackendConfig::Local { db_path },
        None => config.backend,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    runtime.block_on(async move {
        match (cli.command, backend) {
            (Commands::Db(command), BackendConfig::Local { db_path }) => {
                handle_db_command(command, db_path).await
            }
            (Commands::Db(_), BackendConfig::Remote(_)) => {
                anyhow::bail!("db commands operate on a local database; pass --db PATH")
            }
            (command, BackendConfig::Local { db_path }) => {
                ensure_parent_dir(&db_path)?;
                let services = finplan_lib::open_local(&db_path).await?;
                handle_data_command(&services, command).await
            }
            (command, BackendConfig::Remote(remote)) => {
                let services = finplan_lib::open_remote(&remote)?;
                handle_data_command(&services, command).await
            }
        }
    })
}

fn ensure_parent_dir(db_path: &std::path::Path) -> Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("create database parent directory {}", parent.display())
        })?;
    }
    Ok(())
}

async fn handle_db_command(command: DbCommand, db_path: PathBuf) -> Result<i32> {
    ensure_parent_dir(&db_path)?;
    let pool = db::open_sqlite_pool(&db_path).await?;
    let code = match command {
        DbCommand::Migrate => {
            let ran = migrate::apply_migrations(&pool)
                .await
                .with_context(|| format!("migrate {}", db_path.display()))?;
            println!("applied {ran} migration(s) to {}", db_path.display());
            0
        }
        DbCommand::Status => {
            let applied = migrate::applied_migrations(&pool).await?;
            let mut pending = 0;
            for version in migrate::known_versions() {
                match applied.iter().find(|m| m.version == version) {
                    Some(m) => println!("applied  {version}  {}", m.applied_at),
                    None => {
                        pending += 1;
                        println!("pending  {version}");
                    }
                }
            }
            if pending > 0 {
                2
            } else {
                0
            }
        }
    };
    pool.close().await;
    Ok(code)
}

async fn handle_data_command<B: Backend>(services: &Services<B>, command: Commands) -> Result<i32> {
    match command {
        Commands::Clients(ClientsCommand::List { json }) => {
            let clients = services.clients.list_all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&clients)?);
            } else if clients.is_empty() {
                println!("no clients");
            } else {
                for client in &clients {
                    println!("{}  {}", client.id, client.display_name());
                }
            }
        }
        Commands::Export { client_id, out } => match out {
            Some(path) => {
                export::export_client_to_file(services, &client_id, &path).await?;
                println!("exported {client_id} to {}", path.display());
            }
            None => println!("{}", export::export_client_json(services, &client_id).await?),
        },
        Commands::NetWorth { client_id, json } => {
            if services.clients.get(&client_id).await?.is_none() {
                anyhow::bail!("client {client_id} not found");
            }
            let worth = networth::calculate(services, &client_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&worth)?);
            } else {
                let b = &worth.breakdown;
                for (label, value) in [
                    ("bank accounts", b.bank_accounts),
                    ("securities", b.securities),
                    ("real estate", b.real_estate),
                    ("other assets", b.other_assets),
                    ("pillar 2", b.pillar2),
                    ("pillar 3", b.pillar3),
                    ("life insurance", b.life_insurance),
                ] {
                    println!("{label:<16}{:>18}", format_chf(value));
                }
                println!("{:<16}{:>18}", "total assets", format_chf(worth.total_assets));
                println!("{:<16}{:>18}", "liabilities", format_chf(worth.total_liabilities));
                println!("{:<16}{:>18}", "net worth", format_chf(worth.net_worth));
            }
        }
        Commands::Budget { client_id, json } => {
            if services.clients.get(&client_id).await?.is_none() {
                anyhow::bail!("client {client_id} not found");
            }
            let (budget, investment, incomes) = tokio::try_join!(
                services.budget.get_by_client_id(&client_id),
                services.investment.get_by_client_id(&client_id),
                services.income_details.get_by_client_id(&client_id),
            )?;
            let summary = calc::budget_summary(&budget, Some(&investment));
            let recurring = calc::yearly_recurring_income(&incomes);
            if json {
                let doc = serde_json::json!({
                    "summary": summary,
                    "yearlyRecurringIncome": recurring,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                for (label, value) in [
                    ("monthly income", summary.monthly_income),
                    ("expenses", summary.total_expenses),
                    ("savings", summary.savings_rate),
                    ("balance", summary.balance),
                    ("income lines/yr", recurring),
                ] {
                    println!("{label:<16}{:>18}", format_chf(value));
                }
                println!(
                    "{:<16}{:>18}",
                    "savings rate",
                    calc::format_percent(summary.savings_rate_percent / 100.0)
                );
            }
        }
        Commands::Db(_) => anyhow::bail!("db commands operate on a local database only"),
    }
    Ok(0)
}
