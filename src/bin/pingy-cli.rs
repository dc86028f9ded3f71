use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "pingy-cli")]
#[command(about = "Query a running pingy daemon", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8581")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Every target and the aggregate
    Status,
    /// List target reachability and latency
    Targets,
    /// Show a single target
    Target {
        /// Target identifier as configured
        identifier: String,
    },
    /// Show the aggregate status
    Aggregate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = match &cli.command {
        Commands::Status => endpoint(&cli.url, &["status"])?,
        Commands::Targets => endpoint(&cli.url, &["targets"])?,
        Commands::Target { identifier } => endpoint(&cli.url, &["targets", identifier.as_str()])?,
        Commands::Aggregate => endpoint(&cli.url, &["aggregate"])?,
    };

    let res = client.get(url).send().await?;
    print_response(res).await
}

/// Append percent-encoded path segments to the API base URL.
fn endpoint(base: &str, segments: &[&str]) -> Result<reqwest::Url, Box<dyn std::error::Error>> {
    let mut url = reqwest::Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be used as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        eprintln!("Not found (unknown target, or aggregation disabled)");
        return Ok(());
    }
    if !status.is_success() {
        eprintln!("Error: status API returned {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
