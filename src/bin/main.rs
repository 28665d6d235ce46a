use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moviedb-server")]
#[command(about = "Read-only JSON API over a SQLite movie table", long_about = None)]
struct Args {
    /// YAML config file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,
    /// Listen port, overrides both the config file and $PORT
    #[arg(short, long)]
    port: Option<String>,
    /// SQLite database file, overrides the config file
    #[arg(short, long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviedb_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match moviedb_rs::config::Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(path) = args.config.as_deref() {
        info!("Using config file: {}", path);
    }
    config.set_port(args.port);
    if let Some(database) = args.database {
        config.database.sqlite.filename = database;
    }

    if let Err(e) = moviedb_rs::run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
