//! ImmutableX minting service (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ handlers ──┬──▶ users::UserService ──────┐
//!                    (request id,                │                              │
//!                     trace, timeout)            └──▶ minting::MintService ─────┤
//!                                                          │                    ▼
//!                                                          │             imx::LazyLayer2
//!                                                          ▼              (REST + contract)
//!                                              blockchain::ConfirmationWaiter
//!                                                 (receipt polling over RPC)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use imx_minter::blockchain::{BlockchainClient, ConfirmationWaiter, ReceiptSource};
use imx_minter::config::load_config;
use imx_minter::http::{AppState, HttpServer};
use imx_minter::imx::{ImxClientParams, LazyLayer2};
use imx_minter::lifecycle::{wait_for_signal, Shutdown};
use imx_minter::minting::MintService;
use imx_minter::observability::{logging, metrics};
use imx_minter::users::UserService;

#[derive(Parser)]
#[command(name = "imx-minter")]
#[command(
    about = "HTTP service for ImmutableX user registration and bulk minting",
    long_about = None
)]
struct Args {
    /// Optional TOML file; environment variables override it.
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability);
    tracing::info!("imx-minter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address(),
        network = %config.chain.network,
        chain_id = config.chain.chain_id,
        bulk_mint_max = config.mint.bulk_mint_max,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let chain = Arc::new(BlockchainClient::new(&config.chain)?);
    // Every signature binds CHAIN_ID; refuse to start against another network.
    chain.verify_chain_id().await?;
    tracing::info!(chain_id = config.chain.chain_id, "Connected chain verified");
    let waiter = ConfirmationWaiter::from_config(chain as Arc<dyn ReceiptSource>, &config.chain);

    let register_user = Arc::new(LazyLayer2::imx(ImxClientParams {
        imx: config.imx.clone(),
        chain: config.chain.clone(),
        private_key: config.accounts.register_user_key.clone(),
        stark_public_key: config.accounts.register_user_stark_key.clone(),
    }));
    let owner = Arc::new(LazyLayer2::imx(ImxClientParams {
        imx: config.imx.clone(),
        chain: config.chain.clone(),
        private_key: config.accounts.owner_private_key.clone(),
        stark_public_key: config.accounts.owner_stark_key.clone(),
    }));

    let state = AppState {
        users: UserService::new(register_user),
        minter: MintService::new(owner, waiter, config.mint.clone()),
    };
    let server = HttpServer::new(&config.server, state);

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
