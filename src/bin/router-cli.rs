use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Query a running experiment-router dev server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the served route table
    Routes,
    /// Resolve a location, showing the fallback when nothing matches
    Resolve { location: String },
    /// Build the href of a named route
    Href {
        name: String,
        /// Parameter as `name=value`, repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Check the server is up
    Health,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Routes => {
            let res = client.get(format!("{base}/api/routes")).send().await?;
            print_response(res).await?;
        }
        Commands::Resolve { location } => {
            let res = client
                .get(format!("{base}/api/resolve"))
                .query(&[("location", location)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Href { name, params } => {
            let res = client
                .get(format!("{base}/api/href/{}", urlencoding::encode(&name)))
                .query(&params)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{base}/health")).send().await?;
            println!("{} {}", res.status(), res.text().await?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Server returned status {status}");
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
