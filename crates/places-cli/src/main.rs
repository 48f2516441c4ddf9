use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Env var holding the log filter (e.g. `PLACES_LOG=debug`).
const LOG_ENV: &str = "PLACES_LOG";

#[derive(Parser)]
#[command(name = "places")]
#[command(about = "Adventure Map - discover places, review them and share lists", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/places/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding config.toml and session.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        username: String,
        password: String,
        /// Accept the privacy policy
        #[arg(long)]
        agree: bool,
    },
    /// Log in and remember the session
    Login { username: String, password: String },
    /// Forget the session
    Logout,
    /// Show the current session
    Whoami,
    /// Browse the places catalog
    Places {
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Only places whose name contains this text
        #[arg(long)]
        name: Option<String>,
    },
    /// Show a place with its reviews
    Place { id: i64 },
    /// Edit a place; omitted fields keep their current value
    EditPlace {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Comma-separated categories
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        work_hours: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Review a place (score 1-10)
    Review {
        place_id: i64,
        score: u8,
        text: String,
    },
    /// Show your lists
    Lists,
    /// Create a list
    CreateList { name: String },
    /// Show a list with its places and members
    List { id: i64 },
    /// Add the first place matching a name to a list
    ListAddPlace { id: i64, name: String },
    /// Remove a place from a list
    ListRemovePlace { id: i64, place_id: i64 },
    /// Share a list with a user
    ListAddUser { id: i64, username: String },
    /// Remove a user from a list
    ListRemoveUser { id: i64, user_id: i64 },
    /// Save a place from a map search result stored as JSON
    SavePlace { file: PathBuf },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut shell = commands::Shell::open(cli.config, cli.data_dir).await?;

    let result = match cli.command {
        Commands::Register {
            username,
            password,
            agree,
        } => commands::auth::register(&shell, &username, &password, agree).await,
        Commands::Login { username, password } => {
            commands::auth::login(&shell, &username, &password).await
        }
        Commands::Logout => commands::auth::logout(&shell).await,
        Commands::Whoami => commands::auth::whoami(&shell).await,
        Commands::Places { page, name } => {
            commands::places::catalog(&shell, page, name.as_deref()).await
        }
        Commands::Place { id } => commands::places::show(&shell, id).await,
        Commands::EditPlace {
            id,
            name,
            address,
            category,
            description,
            work_hours,
            website,
            phone,
        } => {
            let changes = commands::places::PlaceChanges {
                name,
                address,
                category,
                description,
                work_hours,
                website,
                phone,
            };
            commands::places::edit(&shell, id, changes).await
        }
        Commands::Review {
            place_id,
            score,
            text,
        } => commands::places::review(&shell, place_id, score, &text).await,
        Commands::Lists => commands::lists::mine(&shell).await,
        Commands::CreateList { name } => commands::lists::create(&shell, &name).await,
        Commands::List { id } => commands::lists::show(&shell, id).await,
        Commands::ListAddPlace { id, name } => commands::lists::add_place(&shell, id, &name).await,
        Commands::ListRemovePlace { id, place_id } => {
            commands::lists::remove_place(&shell, id, place_id).await
        }
        Commands::ListAddUser { id, username } => {
            commands::lists::add_user(&shell, id, &username).await
        }
        Commands::ListRemoveUser { id, user_id } => {
            commands::lists::remove_user(&shell, id, user_id).await
        }
        Commands::SavePlace { file } => commands::places::save_from_file(&shell, &file).await,
    };

    shell.flush_notices();
    result
}
