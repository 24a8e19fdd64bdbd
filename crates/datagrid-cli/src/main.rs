use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "datagrid")]
#[command(about = "Replica management for the datagrid catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Truncate a replica of a data object to a given size in bytes
    Truncate {
        /// Logical path of the data object
        logical_path: String,

        /// Set the replica size to SIZE bytes
        #[arg(short, long, value_name = "SIZE_IN_BYTES")]
        size: i64,

        /// Root resource of the hierarchy with the replica to target.
        /// Incompatible with -n
        #[arg(short = 'R', long)]
        resource: Option<String>,

        /// Number of the replica to target. Incompatible with -R
        #[arg(short = 'n', long)]
        replica_number: Option<i32>,

        /// Execute with elevated privileges. Can only be used by
        /// administrators
        #[arg(short = 'M', long, default_value_t = false)]
        admin_mode: bool,

        /// Path to the configuration file
        #[arg(short, long, default_value = "datagrid.yaml")]
        config: String,
    },

    /// Show a data object's replicas
    Describe {
        /// Logical path of the data object
        logical_path: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to the configuration file
        #[arg(short, long, default_value = "datagrid.yaml")]
        config: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    // Priority: RUST_LOG env var > verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Truncate {
            logical_path,
            size,
            resource,
            replica_number,
            admin_mode,
            config,
        } => {
            commands::truncate::run(
                &config,
                &logical_path,
                size,
                resource.as_deref(),
                replica_number,
                admin_mode,
            )
            .await
        }
        Commands::Describe {
            logical_path,
            format,
            config,
        } => commands::describe::run(&config, &logical_path, &format).await,
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
