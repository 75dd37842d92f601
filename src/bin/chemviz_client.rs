//! chemviz-client - command-line client for the chemviz API
//!
//! # Usage
//!
//! ```bash
//! # Get a session token
//! chemviz-client --username admin --password admin login
//!
//! # Upload a CSV and print summary + type distribution
//! CHEMVIZ_TOKEN=... chemviz-client upload equipment.csv
//!
//! # List history, download a report
//! chemviz-client files
//! chemviz-client report 3 --out report_3.pdf
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chemviz::client::{display, ChemvizClient, Credentials};
use chemviz::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "chemviz-client")]
#[command(about = "Upload chemical equipment CSV files and fetch reports")]
#[command(version)]
struct CliArgs {
    /// Server base URL
    #[arg(long, env = "CHEMVIZ_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    #[arg(long, env = "CHEMVIZ_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "CHEMVIZ_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Session token from `login` (used instead of username/password)
    #[arg(long, env = "CHEMVIZ_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange username/password for a session token
    Login,

    /// Upload a CSV file and print its summary
    Upload {
        file: PathBuf,
    },

    /// List the most recent uploads
    Files,

    /// Show one upload's summary
    Show {
        id: u64,
    },

    /// Download the report document for an upload
    Report {
        id: u64,
        /// pdf or txt
        #[arg(long, default_value = "pdf")]
        format: ReportFormat,
        /// Output path (default: report_<id>.<format>)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn credentials(args: &CliArgs) -> Result<Credentials> {
    if let Some(token) = &args.token {
        return Ok(Credentials::Token(token.clone()));
    }
    match (&args.username, &args.password) {
        (Some(username), Some(password)) => Ok(Credentials::Basic {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => bail!("credentials required: pass --token or --username and --password"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let client = ChemvizClient::new(&args.server, credentials(&args)?)
        .context("Failed to build HTTP client")?;

    match &args.command {
        Command::Login => {
            let (Some(username), Some(password)) = (&args.username, &args.password) else {
                bail!("login requires --username and --password");
            };
            let token = client
                .login(username, password)
                .await
                .context("Login failed")?;
            println!("{token}");
        }
        Command::Upload { file } => {
            let resp = client
                .upload_file(file)
                .await
                .with_context(|| format!("Upload of {} failed", file.display()))?;
            print!("{}", display::format_upload(&resp));
        }
        Command::Files => {
            let files = client.list_files().await.context("Failed to list uploads")?;
            print!("{}", display::format_files(&files));
        }
        Command::Show { id } => {
            let detail = client
                .get_file(*id)
                .await
                .with_context(|| format!("Failed to fetch upload {id}"))?;
            println!("Upload {} ({})", detail.id, detail.filename);
            println!("Checksum: {}", detail.checksum);
            println!("Row errors: {}\n", detail.error_count);
            print!("{}", display::format_summary(&detail.summary));
            println!("\nEquipment Type Distribution");
            print!("{}", display::bar_chart(&detail.summary));
        }
        Command::Report { id, format, out } => {
            let bytes = client
                .download_report(*id, *format)
                .await
                .with_context(|| format!("Failed to download report {id}"))?;
            let path = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("report_{id}.{}", format.extension())));
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved {} ({} bytes)", path.display(), bytes.len());
        }
    }

    Ok(())
}
