//! On-chain user registration contract.

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::{ChainConfig, ImxConfig};

sol! {
    #[sol(rpc)]
    contract Registration {
        function registerUser(address ethKey, uint256 starkKey, bytes calldata signature) external;
        function isRegistered(uint256 starkKey) external view returns (bool);
    }
}

/// Registration contract bound to a signing wallet.
#[derive(Clone)]
pub struct RegistrationContract {
    provider: DynProvider<Ethereum>,
    address: Address,
    gas_limit: Option<u64>,
    gas_price: Option<u128>,
}

impl RegistrationContract {
    pub fn new(chain: &ChainConfig, imx: &ImxConfig, wallet: &Wallet) -> BlockchainResult<Self> {
        let url: url::Url = chain
            .endpoint()
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL: {}", e)))?;
        let address: Address = imx.registration_address.parse().map_err(|_| {
            BlockchainError::Rpc(format!(
                "Invalid registration contract address '{}'",
                imx.registration_address
            ))
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            address,
            gas_limit: imx.gas_limit,
            gas_price: imx.gas_price,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether `stark_key` already has an ether key bound on-chain.
    pub async fn is_registered(&self, stark_key: U256) -> BlockchainResult<bool> {
        let contract = Registration::new(self.address, self.provider.clone());
        contract
            .isRegistered(stark_key)
            .call()
            .await
            .map_err(|e| BlockchainError::ContractCall {
                function: "isRegistered",
                reason: e.to_string(),
            })
    }

    /// Broadcast `registerUser` and return the transaction hash.
    pub async fn register_user(
        &self,
        ether_key: Address,
        stark_key: U256,
        operator_signature: Bytes,
    ) -> BlockchainResult<String> {
        let contract = Registration::new(self.address, self.provider.clone());
        let mut call = contract.registerUser(ether_key, stark_key, operator_signature);
        if let Some(gas_limit) = self.gas_limit {
            call = call.gas(gas_limit);
        }
        if let Some(gas_price) = self.gas_price {
            call = call.gas_price(gas_price);
        }

        let pending = call.send().await.map_err(|e| BlockchainError::ContractCall {
            function: "registerUser",
            reason: e.to_string(),
        })?;

        let tx_hash = pending.tx_hash().to_string();
        tracing::info!(
            contract = %self.address,
            ether_key = %ether_key,
            tx_hash = %tx_hash,
            "Registration transaction submitted"
        );
        Ok(tx_hash)
    }
}

impl std::fmt::Debug for RegistrationContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationContract")
            .field("address", &self.address)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price", &self.gas_price)
            .finish()
    }
}
