use crate::errors::error::AppError;
use crate::infrastructure::adapter::EthAdapter;
use crate::infrastructure::protocol::SafeContract;
use crate::models::SafeVersion;
use ethers_core::abi::Token;
use ethers_core::types::{Address, U256};
use std::sync::Arc;

/// 已部署的 Safe 账户句柄，只能由 SafeFactory 在确认链上代码后创建
#[derive(Clone)]
pub struct Safe {
    eth_adapter: Arc<dyn EthAdapter>,
    contract: SafeContract,
}

impl std::fmt::Debug for Safe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Safe")
            .field("address", &self.contract.get_address())
            .field("version", &self.contract.get_version())
            .field("chain_id", &self.contract.get_chain_id())
            .finish()
    }
}

impl Safe {
    pub(crate) fn new(eth_adapter: Arc<dyn EthAdapter>, singleton: &SafeContract, address: Address) -> Self {
        Self {
            eth_adapter,
            contract: singleton.at(address),
        }
    }

    pub fn get_address(&self) -> Address {
        self.contract.get_address()
    }

    pub fn get_version(&self) -> SafeVersion {
        self.contract.get_version()
    }

    pub fn get_chain_id(&self) -> u64 {
        self.contract.get_chain_id()
    }

    pub fn get_eth_adapter(&self) -> Arc<dyn EthAdapter> {
        self.eth_adapter.clone()
    }

    pub async fn is_deployed(&self) -> Result<bool, AppError> {
        self.eth_adapter.is_contract_deployed(self.get_address()).await
    }

    async fn read(&self, name: &str) -> Result<Token, AppError> {
        let data = self.contract.encode(name, &[])?;
        let raw = self.eth_adapter.call(self.get_address(), data).await?;
        self.contract
            .decode_output(name, &raw)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Abi(format!("{} returned nothing", name)))
    }

    pub async fn get_owners(&self) -> Result<Vec<Address>, AppError> {
        let token = self.read("getOwners").await?;
        token
            .into_array()
            .ok_or_else(|| AppError::Abi("getOwners: expected address[]".to_string()))?
            .into_iter()
            .map(|t| {
                t.into_address()
                    .ok_or_else(|| AppError::Abi("getOwners: expected address".to_string()))
            })
            .collect()
    }

    pub async fn get_threshold(&self) -> Result<U256, AppError> {
        self.read("getThreshold")
            .await?
            .into_uint()
            .ok_or_else(|| AppError::Abi("getThreshold: expected uint256".to_string()))
    }

    pub async fn get_nonce(&self) -> Result<U256, AppError> {
        self.read("nonce")
            .await?
            .into_uint()
            .ok_or_else(|| AppError::Abi("nonce: expected uint256".to_string()))
    }
}
