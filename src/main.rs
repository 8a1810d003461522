use clap::{Parser, Subcommand};
use roman_churches_lib::config::DashboardConfig;
use roman_churches_lib::dashboard::DashboardService;
use roman_churches_lib::models::Dataset;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roman-churches-insights")]
#[command(about = "Century-level insights over Roman churches and city population")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "ROMAN_CHURCHES_CONFIG", default_value = "roman-churches.yaml")]
    config: PathBuf,

    /// SQLite database path (overrides config file)
    #[arg(short, long, env = "ROMAN_CHURCHES_DB")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the full dashboard snapshot as JSON
    Snapshot,
    /// Print the churches built in one century
    Details {
        #[arg(long, allow_hyphen_values = true)]
        century: i32,
    },
    /// Load a JSON dataset of churches and population rows
    Import {
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(&cli.config)?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    roman_churches_lib::init_tracing(&config)?;

    tracing::info!(
        config = %cli.config.display(),
        database = %config.database_path.display(),
        "starting roman-churches-insights"
    );

    let service = DashboardService::new(config)?;
    match cli.command {
        Command::Snapshot => {
            let snapshot = service.snapshot()?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Details { century } => {
            let details = service.church_details(century)?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Command::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let dataset: Dataset = serde_json::from_str(&raw)?;
            let summary = service.import(&dataset)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
