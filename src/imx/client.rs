//! Layer-2 platform client.
//!
//! # Responsibilities
//! - Look up users by ether key
//! - Register a stark key on-chain when it is not yet bound
//! - Submit signed batch mint requests
//!
//! The platform is an opaque collaborator: requests go out over its public
//! REST API and the registration contract, nothing is cached locally.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::blockchain::{RegistrationContract, Wallet};
use crate::config::{ChainConfig, ImxConfig, Secret};
use crate::imx::error::{Layer2Error, Layer2Result};
use crate::imx::signing::{auth_headers, sign_mint_request, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::imx::types::{
    ether_key, parse_stark_key, MintRequest, RegistrationResult, SignableRegistrationRequest,
    SignableRegistrationResponse, SignedMintRequest, UserRecord,
};

/// Operations the service needs from the layer-2 platform.
#[async_trait]
pub trait Layer2: Send + Sync {
    /// Ether address of the signing identity.
    fn address(&self) -> Address;

    /// Stark public key of the signing identity.
    fn stark_public_key(&self) -> &str;

    /// Fetch a user; [`Layer2Error::NotFound`] when unknown.
    async fn get_user(&self, user: Address) -> Layer2Result<UserRecord>;

    /// Bind `stark_key` to `ether_key`; empty `tx_hash` when already bound.
    async fn register_imx(
        &self,
        ether_key: Address,
        stark_key: &str,
    ) -> Layer2Result<RegistrationResult>;

    /// Submit one batched mint; the platform's answer is returned verbatim.
    async fn mint_v2(&self, requests: &[MintRequest]) -> Layer2Result<serde_json::Value>;
}

/// Shared handle to a layer-2 client.
pub type Layer2Handle = Arc<dyn Layer2>;

/// Everything needed to build an [`ImxClient`] for one identity.
#[derive(Debug, Clone)]
pub struct ImxClientParams {
    pub imx: ImxConfig,
    pub chain: ChainConfig,
    pub private_key: Secret,
    pub stark_public_key: String,
}

/// REST + contract backed layer-2 client.
pub struct ImxClient {
    http: reqwest::Client,
    api_url: url::Url,
    wallet: Wallet,
    stark_public_key: String,
    registration: RegistrationContract,
}

impl ImxClient {
    /// Build a client for the identity in `params`.
    pub fn build(params: &ImxClientParams) -> Layer2Result<Self> {
        let mut base = params.imx.public_api_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_url: url::Url = base
            .parse()
            .map_err(|e| Layer2Error::Setup(format!("Invalid public API URL: {}", e)))?;

        let wallet = Wallet::from_secret(&params.private_key, params.chain.chain_id)?;
        let registration = RegistrationContract::new(&params.chain, &params.imx, &wallet)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(params.imx.api_timeout_secs))
            .build()
            .map_err(|e| Layer2Error::Setup(e.to_string()))?;

        tracing::info!(
            address = %wallet.address(),
            api_url = %api_url,
            stark_contract = %params.imx.stark_contract_address,
            registration_contract = %registration.address(),
            "Layer-2 client built"
        );

        Ok(Self {
            http,
            api_url,
            wallet,
            stark_public_key: params.stark_public_key.clone(),
            registration,
        })
    }

    fn endpoint(&self, path: &str) -> Layer2Result<url::Url> {
        self.api_url
            .join(path)
            .map_err(|e| Layer2Error::Setup(format!("Invalid endpoint '{}': {}", path, e)))
    }

    async fn signable_registration(
        &self,
        ether_key: Address,
        stark_key: &str,
    ) -> Layer2Result<Bytes> {
        let body = SignableRegistrationRequest {
            ether_key: crate::imx::types::ether_key(ether_key),
            stark_key: stark_key.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("v1/signable-registration")?)
            .json(&body)
            .send()
            .await?;
        let signable: SignableRegistrationResponse = read_json(response).await?;

        signable
            .operator_signature
            .parse()
            .map_err(|_| Layer2Error::Decode("operator_signature is not hex".to_string()))
    }
}

#[async_trait]
impl Layer2 for ImxClient {
    fn address(&self) -> Address {
        self.wallet.address()
    }

    fn stark_public_key(&self) -> &str {
        &self.stark_public_key
    }

    async fn get_user(&self, user: Address) -> Layer2Result<UserRecord> {
        let url = self.endpoint(&format!("v1/users/{}", ether_key(user)))?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Layer2Error::NotFound(format!("user {}", ether_key(user))));
        }
        read_json(response).await
    }

    async fn register_imx(
        &self,
        ether_key: Address,
        stark_key: &str,
    ) -> Layer2Result<RegistrationResult> {
        let stark = parse_stark_key(stark_key)?;

        if self.registration.is_registered(stark).await? {
            tracing::debug!(ether_key = %ether_key, "Stark key already registered");
            return Ok(RegistrationResult::already_registered());
        }

        let operator_signature = self.signable_registration(ether_key, stark_key).await?;
        let tx_hash = self
            .registration
            .register_user(ether_key, stark, operator_signature)
            .await?;

        Ok(RegistrationResult { tx_hash })
    }

    async fn mint_v2(&self, requests: &[MintRequest]) -> Layer2Result<serde_json::Value> {
        let mut body = Vec::with_capacity(requests.len());
        for request in requests {
            body.push(SignedMintRequest {
                request,
                auth_signature: sign_mint_request(&self.wallet, request).await?,
            });
        }

        let (timestamp, signature) = auth_headers(&self.wallet).await?;
        let response = self
            .http
            .post(self.endpoint("v2/mints")?)
            .header(TIMESTAMP_HEADER, timestamp)
            .header(SIGNATURE_HEADER, signature)
            .json(&body)
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Layer2Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(Layer2Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

type Layer2Init = Box<dyn Fn() -> Layer2Result<Layer2Handle> + Send + Sync>;

/// A layer-2 client built on first use and shared afterwards.
pub struct LazyLayer2 {
    cell: OnceCell<Layer2Handle>,
    init: Layer2Init,
}

impl LazyLayer2 {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Layer2Result<Layer2Handle> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(init),
        }
    }

    /// Lazily build an [`ImxClient`] from `params`.
    pub fn imx(params: ImxClientParams) -> Self {
        Self::new(move || Ok(Arc::new(ImxClient::build(&params)?) as Layer2Handle))
    }

    /// Wrap an already built client.
    pub fn ready(client: Layer2Handle) -> Self {
        Self::new(move || Ok(client.clone()))
    }

    /// The shared client, building it if this is the first call.
    ///
    /// A failed build is not cached; the next call tries again.
    pub async fn get(&self) -> Layer2Result<Layer2Handle> {
        self.cell
            .get_or_try_init(|| async { (self.init)() })
            .await
            .cloned()
    }
}

impl std::fmt::Debug for LazyLayer2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyLayer2")
            .field("initialized", &self.cell.initialized())
            .finish()
    }
}
