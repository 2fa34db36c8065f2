//! In-memory layer-2 double for flow tests.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::imx::client::Layer2;
use crate::imx::error::{Layer2Error, Layer2Result};
use crate::imx::types::{MintRequest, RegistrationResult, UserRecord};

/// How `get_user` answers.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Lookup {
    Found,
    NotFound,
    Unavailable,
}

pub(crate) struct FakeLayer2 {
    address: Address,
    lookup: Lookup,
    registration_tx: Option<String>,
    mint_fails: bool,
    minted: Mutex<Vec<MintRequest>>,
    pub(crate) get_user_calls: AtomicU32,
    pub(crate) register_calls: AtomicU32,
    pub(crate) mint_calls: AtomicU32,
}

impl FakeLayer2 {
    /// `registration_tx == None` makes `register_imx` fail.
    pub(crate) fn new(lookup: Lookup, registration_tx: Option<String>) -> Self {
        Self {
            address: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap(),
            lookup,
            registration_tx,
            mint_fails: false,
            minted: Mutex::new(Vec::new()),
            get_user_calls: AtomicU32::new(0),
            register_calls: AtomicU32::new(0),
            mint_calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn failing_mint(mut self) -> Self {
        self.mint_fails = true;
        self
    }

    pub(crate) fn minted(&self) -> Vec<MintRequest> {
        self.minted.lock().unwrap().clone()
    }

    pub(crate) fn total_calls(&self) -> u32 {
        self.get_user_calls.load(Ordering::SeqCst)
            + self.register_calls.load(Ordering::SeqCst)
            + self.mint_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Layer2 for FakeLayer2 {
    fn address(&self) -> Address {
        self.address
    }

    fn stark_public_key(&self) -> &str {
        "0x0f"
    }

    async fn get_user(&self, _user: Address) -> Layer2Result<UserRecord> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);
        match self.lookup {
            Lookup::Found => Ok(UserRecord {
                accounts: vec!["0x0f".to_string()],
            }),
            Lookup::NotFound => Err(Layer2Error::NotFound("user".to_string())),
            Lookup::Unavailable => Err(Layer2Error::Transport("connection reset".to_string())),
        }
    }

    async fn register_imx(
        &self,
        _ether_key: Address,
        _stark_key: &str,
    ) -> Layer2Result<RegistrationResult> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        match &self.registration_tx {
            Some(tx_hash) => Ok(RegistrationResult {
                tx_hash: tx_hash.clone(),
            }),
            None => Err(Layer2Error::Api {
                status: 400,
                message: "invalid signature".to_string(),
            }),
        }
    }

    async fn mint_v2(&self, requests: &[MintRequest]) -> Layer2Result<serde_json::Value> {
        self.mint_calls.fetch_add(1, Ordering::SeqCst);
        if self.mint_fails {
            return Err(Layer2Error::Api {
                status: 500,
                message: "mint backend down".to_string(),
            });
        }
        self.minted.lock().unwrap().extend_from_slice(requests);

        let result: Vec<_> = requests
            .iter()
            .flat_map(|r| {
                r.users.iter().flat_map(move |u| {
                    u.tokens.iter().map(move |t| {
                        json!({
                            "contract_address": r.contract_address,
                            "token_id": t.id,
                            "tx_id": 1,
                        })
                    })
                })
            })
            .collect();
        Ok(json!({ "result": result }))
    }
}
