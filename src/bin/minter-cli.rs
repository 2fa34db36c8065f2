use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "minter-cli")]
#[command(about = "Command line client for the imx-minter service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is up
    Status,
    /// Register the configured user on ImmutableX, or fetch it if it exists
    SignIn,
    /// Mint a batch of tokens
    Mint {
        /// Recipient wallet; the service default is used when omitted
        #[arg(short, long)]
        wallet: Option<String>,

        /// Number of tokens; the service default is used when omitted
        #[arg(short, long)]
        number: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/", base)).send().await?;
            let status = res.status();
            println!("{} {}", status, res.text().await?);
        }
        Commands::SignIn => {
            let res = client.get(format!("{}/signInUser", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Mint { wallet, number } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(wallet) = wallet {
                query.push(("wallet", wallet));
            }
            if let Some(number) = number {
                query.push(("number", number.to_string()));
            }
            let res = client
                .get(format!("{}/mint", base))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
