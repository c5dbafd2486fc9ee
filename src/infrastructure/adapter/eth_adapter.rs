use crate::errors::error::AppError;
use crate::infrastructure::protocol::deployments::SafeDeployment;
use crate::infrastructure::protocol::{SafeContract, SafeProxyFactoryContract};
use crate::models::{SafeVersion, TransactionOptions};
use async_trait::async_trait;
use ethers_core::types::{Address, Bytes, TransactionReceipt};

/// 链适配器：部署流程与具体链交互之间的边界
///
/// 实现方负责签名、广播和确认等待；超时也由实现方决定。
#[async_trait]
pub trait EthAdapter: Send + Sync {
    /// 每次调用都实时查询，不缓存
    async fn get_chain_id(&self) -> Result<u64, AppError>;

    async fn get_signer_address(&self) -> Result<Address, AppError>;

    async fn is_contract_deployed(&self, address: Address) -> Result<bool, AppError>;

    async fn get_safe_contract(
        &self,
        version: SafeVersion,
        chain_id: u64,
        deployment: Option<&SafeDeployment>,
        custom_address: Option<Address>,
        custom_abi: Option<&str>,
    ) -> Result<SafeContract, AppError> {
        SafeContract::from_deployment(version, chain_id, deployment, custom_address, custom_abi)
    }

    async fn get_safe_proxy_factory_contract(
        &self,
        version: SafeVersion,
        chain_id: u64,
        deployment: Option<&SafeDeployment>,
        custom_address: Option<Address>,
        custom_abi: Option<&str>,
    ) -> Result<SafeProxyFactoryContract, AppError> {
        SafeProxyFactoryContract::from_deployment(
            version,
            chain_id,
            deployment,
            custom_address,
            custom_abi,
        )
    }

    /// 只读 eth_call
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, AppError>;

    /// 签名、广播并等待回执；回执 status 为 0 时返回 TransactionReverted
    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        options: TransactionOptions,
    ) -> Result<TransactionReceipt, AppError>;
}
