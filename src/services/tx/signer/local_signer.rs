// services/tx/signer/local_signer.rs

use crate::errors::error::AppError;
use crate::services::tx::signer::TxSigner;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{H160, Signature};
use ethers_signers::{LocalWallet, Signer};
use std::sync::Arc;

#[derive(Clone)]
pub struct LocalSigner {
    wallet: Arc<LocalWallet>,
}

impl LocalSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self {
            wallet: Arc::new(wallet),
        }
    }

    /// 十六进制私钥（可带 0x）+ 链 ID
    pub fn from_private_key(key: &str, chain_id: u64) -> Result<Self, AppError> {
        let wallet = key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| AppError::Signer(format!("无效的私钥: {}", e)))?
            .with_chain_id(chain_id);
        Ok(Self::new(wallet))
    }
}

#[async_trait::async_trait]
impl TxSigner for LocalSigner {
    async fn sign_tx(&self, tx: &TypedTransaction) -> Result<Signature, AppError> {
        self.wallet
            .sign_transaction(tx)
            .await
            .map_err(|e| AppError::Signer(format!("Signing failed: {}", e)))
    }

    fn address(&self) -> H160 {
        self.wallet.address()
    }

    fn chain_id(&self) -> Option<u64> {
        Some(self.wallet.chain_id())
    }
}
