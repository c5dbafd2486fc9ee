use crate::errors::error::AppError;
use async_trait::async_trait;
use ethers_core::types::{H160, Signature, transaction::eip2718::TypedTransaction};

#[async_trait]
pub trait TxSigner: Send + Sync {
    async fn sign_tx(&self, tx: &TypedTransaction) -> Result<Signature, AppError>;
    fn address(&self) -> H160;
    fn chain_id(&self) -> Option<u64>; // 返回 None 表示不强制 chain_id
}
