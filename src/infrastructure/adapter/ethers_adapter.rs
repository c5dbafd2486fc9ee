use crate::errors::error::AppError;
use crate::infrastructure::adapter::EthAdapter;
use crate::infrastructure::provider::ProviderTrait;
use crate::log_debug;
use crate::models::TransactionOptions;
use crate::services::tx::{TxContext, TxOptions};
use crate::services::tx_service::TxService;
use crate::utils::u256_to_u64;
use async_trait::async_trait;
use ethers_core::types::{Address, Bytes, TransactionReceipt, TransactionRequest, U256};
use std::sync::Arc;

/// 基于 ethers Provider + 本地签名器的链适配器
pub struct EthersAdapter {
    provider: Arc<dyn ProviderTrait>,
    tx_service: Arc<TxService>,
    tx_options: TxOptions,
}

impl EthersAdapter {
    pub fn new(
        provider: Arc<dyn ProviderTrait>,
        tx_service: Arc<TxService>,
        tx_options: TxOptions,
    ) -> Self {
        Self {
            provider,
            tx_service,
            tx_options,
        }
    }
}

#[async_trait]
impl EthAdapter for EthersAdapter {
    async fn get_chain_id(&self) -> Result<u64, AppError> {
        u256_to_u64(self.provider.get_chain_id().await?)
    }

    async fn get_signer_address(&self) -> Result<Address, AppError> {
        Ok(self.tx_service.signer.address())
    }

    async fn is_contract_deployed(&self, address: Address) -> Result<bool, AppError> {
        let code = self.provider.get_code(address).await?;
        log_debug!("{:#x} code size = {}", address, code.len());
        Ok(!code.is_empty())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, AppError> {
        let req = TransactionRequest::new().to(to).data(data);
        self.provider.call(&req.into()).await
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        options: TransactionOptions,
    ) -> Result<TransactionReceipt, AppError> {
        options.validate()?;
        let ctx = TxContext {
            to,
            value: U256::zero(),
            data,
            overrides: options,
            options: self.tx_options.clone(),
        };
        let result = self.tx_service.execute(ctx).await?;
        Ok(result.receipt)
    }
}
