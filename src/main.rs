//! synodl binary: clap surface over the library operations.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use synodl::download_station::ActionResult;
use synodl::{BatchOptions, Config, SubmitSource, SynoClient, submit_batch};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "synodl", version)]
#[command(about = "Client for Synology Download Station and File Station")]
struct Cli {
    /// Path to the JSON config file (default: ~/.synodl.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create download tasks from a file, one source URI per line
    File {
        /// File with one source per line; empty lines are skipped
        path: PathBuf,
    },
    /// Create a download task from a single URL
    Url {
        /// Source URI (http, ftp, magnet, ...)
        uri: String,
    },
    /// List download tasks
    List,
    /// Show info for specific task ids
    Info {
        /// Task ids separated by comma
        ids: String,
    },
    /// Delete tasks
    Delete {
        /// Task ids separated by comma
        ids: String,
    },
    /// Pause tasks
    Pause {
        /// Task ids separated by comma
        ids: String,
    },
    /// Resume tasks
    Resume {
        /// Task ids separated by comma
        ids: String,
    },
    /// Move a file to another directory on the NAS
    Move {
        /// Full path of the source file
        source: String,
        /// Destination directory
        dest_dir: String,
    },
    /// Rename a file on the NAS
    Rename {
        /// Full path of the file
        path: String,
        /// New name
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        // Partial failure: diagnostics were already streamed per item
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> synodl::Result<bool> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    let mut client = SynoClient::new(&config)?;
    client.login().await?;
    let client = Arc::new(client);

    let outcome = dispatch(&client, cli.command).await;

    // Teardown runs regardless of the command's outcome; the session must
    // outlive every in-flight request, which dispatch guarantees by joining
    // the pipeline before returning.
    if let Err(e) = client.logout().await {
        tracing::warn!(error = %e, "logout failed");
    }

    outcome
}

async fn dispatch(client: &Arc<SynoClient>, command: Commands) -> synodl::Result<bool> {
    match command {
        Commands::File { path } => {
            let source = SubmitSource::File(path);
            let options = BatchOptions::for_source(&source);
            let report = submit_batch(client.clone(), source, options).await?;
            Ok(report.is_clean())
        }
        Commands::Url { uri } => {
            let source = SubmitSource::Url(uri);
            let options = BatchOptions::for_source(&source);
            let report = submit_batch(client.clone(), source, options).await?;
            Ok(report.is_clean())
        }
        Commands::List => {
            let tasks = client.list_tasks().await?;
            print_tasks(&tasks);
            Ok(true)
        }
        Commands::Info { ids } => {
            let tasks = client.get_tasks(&ids).await?;
            print_tasks(&tasks);
            Ok(true)
        }
        Commands::Delete { ids } => {
            let results = client.delete_tasks(&ids).await?;
            Ok(print_action_results(&results, "delete", "deleted"))
        }
        Commands::Pause { ids } => {
            let results = client.pause_tasks(&ids).await?;
            Ok(print_action_results(&results, "pause", "paused"))
        }
        Commands::Resume { ids } => {
            let results = client.resume_tasks(&ids).await?;
            Ok(print_action_results(&results, "resume", "resumed"))
        }
        Commands::Move { source, dest_dir } => {
            client.move_file(&source, &dest_dir).await?;
            println!("Moved {source} to {dest_dir}.");
            Ok(true)
        }
        Commands::Rename { path, name } => {
            let new_path = client.rename_file(&path, &name).await?;
            println!("Renamed to {new_path}.");
            Ok(true)
        }
    }
}

fn print_tasks(tasks: &[synodl::DownloadTask]) {
    if tasks.is_empty() {
        println!("No download tasks found.");
    } else {
        println!("{}", synodl::format::render_tasks(tasks));
    }
}

/// Print one line per id; returns whether every action succeeded.
fn print_action_results(results: &[ActionResult], verb: &str, done: &str) -> bool {
    let mut all_ok = true;
    for result in results {
        match result.failure_reason() {
            None => println!("Task {} {}.", result.id, done),
            Some(reason) => {
                all_ok = false;
                println!("Could not {} task id {}: {}", verb, result.id, reason);
            }
        }
    }
    all_ok
}
