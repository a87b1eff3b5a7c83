use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use url::Url;

use jono::backend::action::{InputType, JobAction};
use jono::backend::client::BackendClient;
use jono::config::{Settings, MIN_RELOAD_RATE_MS};
use jono::coordinator::alert::{Alert, AlertVariant};
use jono::coordinator::manager::Coordinator;
use jono::coordinator::workdir::WorkingDirectory;

/// Manage a Slurm job queue through its HTTP backend
#[derive(Debug, Parser)]
#[command(name = "jono", version, about)]
struct Cli {
    /// Base URL of the backend, e.g. http://localhost:8888/slurm
    #[arg(long, env = "JONO_URL")]
    url: Url,

    /// Authorization token passed with every request
    #[arg(long, env = "JONO_TOKEN", hide_env_values = true, default_value = "")]
    token: String,

    /// Path to a JSON settings file
    #[arg(long, env = "JONO_CONFIG")]
    config: Option<PathBuf>,

    /// Show all jobs, not only the current user's
    #[arg(long)]
    all_users: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current queue snapshot
    Queue {
        /// Keep reloading on the configured auto-reload timer
        #[arg(long)]
        watch: bool,
    },
    /// Submit a batch job via sbatch
    Submit {
        /// Script path, or raw script text with --input-type contents
        input: String,
        #[arg(long, value_enum, default_value_t = InputType::Path)]
        input_type: InputType,
    },
    /// Cancel jobs via scancel
    Kill { job_ids: Vec<String> },
    /// Hold jobs via scontrol hold
    Hold { job_ids: Vec<String> },
    /// Release held jobs via scontrol release
    Release { job_ids: Vec<String> },
    /// Print the username the backend runs as
    User,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("terve! starting up :)");

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("invalid settings file {}", path.display()))?,
        None => Settings::default(),
    };
    if cli.all_users {
        settings.user_only = false;
    }

    let client = BackendClient::new(cli.url.clone(), cli.token.clone());
    let mut coordinator = Coordinator::new(client, settings);

    let cwd = std::env::current_dir().context("can't read the working directory")?;
    coordinator.set_working_dir(WorkingDirectory::new(cwd.display().to_string(), ""));

    match cli.command {
        Command::Queue { watch } => {
            if coordinator.settings().user_only {
                coordinator
                    .fetch_user()
                    .await
                    .context("couldn't fetch the backend user")?;
            }
            coordinator.fetch_queue().await.context("squeue failed")?;
            print_queue(&coordinator);
            if watch {
                watch_queue(&mut coordinator).await?;
            }
        }
        Command::Submit { input, input_type } => {
            match coordinator.submit_job(&input, input_type).await {
                Ok(Some(job_id)) => info!("Submitted job {job_id}"),
                Ok(None) => info!("Submitted job"),
                Err(_) => {} // already surfaced as an alert
            }
            if drain_alerts(&mut coordinator) {
                std::process::exit(1);
            }
        }
        Command::Kill { job_ids } => run_action(&mut coordinator, JobAction::Kill, job_ids).await?,
        Command::Hold { job_ids } => run_action(&mut coordinator, JobAction::Hold, job_ids).await?,
        Command::Release { job_ids } => {
            run_action(&mut coordinator, JobAction::Release, job_ids).await?
        }
        Command::User => {
            let user = coordinator
                .fetch_user()
                .await
                .context("couldn't fetch the backend user")?;
            println!("{user}");
        }
    }

    Ok(())
}

async fn run_action(
    coordinator: &mut Coordinator,
    action: JobAction,
    job_ids: Vec<String>,
) -> anyhow::Result<()> {
    anyhow::ensure!(!job_ids.is_empty(), "no job ids given for {action}");
    coordinator.dispatch_jobs(action, job_ids).await;
    let failed = drain_alerts(coordinator);
    print_queue(coordinator);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Reload on the settings timer until interrupted
///
/// The timer is soft: it sleeps after the previous fetch completes, so fetch
/// latency extends the effective period and fetches never overlap.
async fn watch_queue(coordinator: &mut Coordinator) -> anyhow::Result<()> {
    let rate = Duration::from_millis(coordinator.settings().auto_reload_rate);
    let floor = Duration::from_millis(MIN_RELOAD_RATE_MS);
    info!("Watching the queue every {rate:?}");
    loop {
        tokio::time::sleep(rate).await;
        let reloaded = coordinator
            .fetch_queue_limited(floor)
            .await
            .context("squeue failed")?;
        if reloaded {
            print_queue(coordinator);
        }
    }
}

fn print_queue(coordinator: &Coordinator) {
    let columns = &coordinator.settings().queue_cols;
    let rows = coordinator.visible_rows();

    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    for row in &rows {
        for (idx, width) in widths.iter_mut().enumerate() {
            if let Some(field) = row.field(idx) {
                *width = (*width).max(field.len());
            }
        }
    }

    println!("{}", format_row(columns.iter().map(String::as_str), &widths));
    for row in &rows {
        let fields = (0..columns.len()).map(|idx| row.field(idx).unwrap_or(""));
        println!("{}", format_row(fields, &widths));
    }
    if rows.is_empty() {
        println!("No jobs currently queued.");
    }
    println!(
        "Last updated: {}",
        coordinator
            .snapshot()
            .fetched_at()
            .format("%Y-%m-%d %H:%M:%S")
    );
}

fn format_row<'a>(fields: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    fields
        .zip(widths.iter().copied())
        .map(|(field, width)| format!("{field:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Print accumulated alerts; returns true when any were failures
fn drain_alerts(coordinator: &mut Coordinator) -> bool {
    let alerts = coordinator.alerts_mut().drain();
    let mut failed = false;
    for Alert { message, variant } in alerts {
        match variant {
            AlertVariant::Success => println!("ok: {message}"),
            AlertVariant::Warning => eprintln!("warning: {message}"),
            AlertVariant::Danger => {
                failed = true;
                eprintln!("error: {message}");
            }
        }
    }
    failed
}
