use clap::{Parser, Subcommand};
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "spend-cli")]
#[command(about = "Query a running spend-tracker shell", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "SPEND_TRACKER_URL")]
    url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all spending categories
    Categories,
    /// Show one category by id
    Category { id: String },
    /// Find the category id for a localized label
    Label { label: String },
    /// List the compiled page routes in match order
    Routes,
    /// Resolve a URL path to its page route
    Resolve { path: String },
    /// Build the URL of a named route
    Href {
        name: String,
        /// Route params as key=value
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| "base URL cannot have path segments")?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = match cli.command {
        Commands::Categories => endpoint(&cli.url, &["api", "categories"])?,
        Commands::Category { id } => endpoint(&cli.url, &["api", "categories", &id])?,
        Commands::Label { label } => {
            endpoint(&cli.url, &["api", "categories", "by-label", &label])?
        }
        Commands::Routes => endpoint(&cli.url, &["api", "routes"])?,
        Commands::Resolve { path } => {
            let mut url = endpoint(&cli.url, &["api", "resolve"])?;
            url.query_pairs_mut().append_pair("path", &path);
            url
        }
        Commands::Href { name, params } => {
            let mut url = endpoint(&cli.url, &["api", "href", &name])?;
            if !params.is_empty() {
                url.query_pairs_mut().extend_pairs(params.iter());
            }
            url
        }
    };

    let res = client.get(url).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
