//! Shared utilities for integration tests.
//!
//! Spawns the real router on a unique local port with scripted
//! layer-2 and receipt collaborators behind it.

#![allow(dead_code)]

use alloy::primitives::Address;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use imx_minter::blockchain::{
    BlockchainError, BlockchainResult, ConfirmationWaiter, ExplorerLinks, Receipt, ReceiptSource,
};
use imx_minter::config::{MintConfig, ServerConfig};
use imx_minter::http::{AppState, HttpServer};
use imx_minter::imx::{
    LazyLayer2, Layer2, Layer2Error, Layer2Result, MintRequest, RegistrationResult, UserRecord,
};
use imx_minter::lifecycle::Shutdown;
use imx_minter::minting::MintService;
use imx_minter::users::UserService;

pub const STARK_KEY: &str = "0x04a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f";
pub const TOKEN_ADDRESS: &str = "0x1111111111111111111111111111111111111111";
pub const DEFAULT_WALLET: &str = "0x84daa703e1cbad82416a1122c7c4e213b64eba44";

/// Scripted layer-2 platform.
pub struct ScriptedPlatform {
    pub known_user: bool,
    pub registration_tx: String,
    pub fail_mint: bool,
    pub get_user_calls: AtomicU32,
    pub register_calls: AtomicU32,
    pub mint_calls: AtomicU32,
    pub minted: Mutex<Vec<MintRequest>>,
}

impl ScriptedPlatform {
    pub fn new(known_user: bool) -> Self {
        Self {
            known_user,
            registration_tx: String::new(),
            fail_mint: false,
            get_user_calls: AtomicU32::new(0),
            register_calls: AtomicU32::new(0),
            mint_calls: AtomicU32::new(0),
            minted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_registration_tx(mut self, tx: &str) -> Self {
        self.registration_tx = tx.to_string();
        self
    }

    pub fn failing_mint(mut self) -> Self {
        self.fail_mint = true;
        self
    }

    pub fn total_calls(&self) -> u32 {
        self.get_user_calls.load(Ordering::SeqCst)
            + self.register_calls.load(Ordering::SeqCst)
            + self.mint_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Layer2 for ScriptedPlatform {
    fn address(&self) -> Address {
        Address::repeat_byte(0x42)
    }

    fn stark_public_key(&self) -> &str {
        STARK_KEY
    }

    async fn get_user(&self, _user: Address) -> Layer2Result<UserRecord> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);
        if self.known_user {
            Ok(UserRecord {
                accounts: vec![STARK_KEY.to_string()],
            })
        } else {
            Err(Layer2Error::NotFound("user not found".to_string()))
        }
    }

    async fn register_imx(
        &self,
        _ether_key: Address,
        _stark_key: &str,
    ) -> Layer2Result<RegistrationResult> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        Ok(RegistrationResult {
            tx_hash: self.registration_tx.clone(),
        })
    }

    async fn mint_v2(&self, requests: &[MintRequest]) -> Layer2Result<serde_json::Value> {
        self.mint_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mint {
            return Err(Layer2Error::Api {
                status: 500,
                message: "mint backend unavailable".to_string(),
            });
        }
        let mut minted = self.minted.lock().unwrap();
        minted.extend(requests.iter().cloned());

        let result: Vec<serde_json::Value> = requests
            .iter()
            .flat_map(|r| {
                r.users.iter().flat_map(move |u| {
                    u.tokens.iter().map(move |t| {
                        serde_json::json!({
                            "contract_address": r.contract_address,
                            "token_id": t.id,
                            "tx_id": 1,
                        })
                    })
                })
            })
            .collect();
        Ok(serde_json::json!({ "result": result }))
    }
}

/// Receipts that are mined on the first poll.
pub struct InstantReceipts {
    pub status: bool,
}

#[async_trait]
impl ReceiptSource for InstantReceipts {
    async fn receipt(&self, tx_id: &str) -> BlockchainResult<Option<Receipt>> {
        if tx_id.is_empty() {
            return Err(BlockchainError::InvalidTxHash(tx_id.to_string()));
        }
        Ok(Some(Receipt {
            status: self.status,
            block_number: 1,
        }))
    }
}

pub fn mint_config(max: u64) -> MintConfig {
    MintConfig {
        token_address: TOKEN_ADDRESS.to_string(),
        base_token_id: 100,
        bulk_mint_max: max,
        default_wallet: DEFAULT_WALLET.to_string(),
        default_count: 1,
        ..Default::default()
    }
}

/// Handle to a running test server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on `port` with `users` answering sign-in and
/// `owner` answering mints.
pub async fn start_server(
    port: u16,
    users: Arc<ScriptedPlatform>,
    owner: Arc<ScriptedPlatform>,
    receipts: InstantReceipts,
    mint: MintConfig,
) -> TestServer {
    let addr: SocketAddr = format!("127.0.0.1:{}", port).parse().unwrap();

    let waiter = ConfirmationWaiter::new(
        Arc::new(receipts),
        ExplorerLinks::new("ropsten"),
        Duration::from_millis(10),
        Duration::from_secs(5),
    );
    let state = AppState {
        users: UserService::new(Arc::new(LazyLayer2::ready(users))),
        minter: MintService::new(Arc::new(LazyLayer2::ready(owner)), waiter, mint),
    };
    let server = HttpServer::new(&ServerConfig::default(), state);

    let shutdown = Shutdown::new();
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    TestServer { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
