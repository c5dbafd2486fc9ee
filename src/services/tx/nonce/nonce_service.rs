// services/tx/nonce/nonce_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::utils::u256_to_u64;
use ethers_core::types::H160;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

// 每个签名地址创建一次并共享：
// let nonce_service = Arc::new(NonceService::new(&*provider, signer.address()).await?);
pub struct NonceService {
    address: H160,
    /// 本地维护的下一个可用 nonce（原子操作，适合并发预占）
    current_nonce: AtomicU64,
    /// 防止并发同步链上 nonce 时冲突
    sync_lock: Mutex<()>,
}

impl NonceService {
    /// 创建实例并从链上初始化 nonce
    pub async fn new(provider: &dyn ProviderTrait, address: H160) -> Result<Self, AppError> {
        let chain_nonce = provider.get_transaction_count(address).await?;
        Ok(Self::with_nonce(address, u256_to_u64(chain_nonce)?))
    }

    pub fn with_nonce(address: H160, nonce: u64) -> Self {
        Self {
            address,
            current_nonce: AtomicU64::new(nonce),
            sync_lock: Mutex::new(()),
        }
    }

    /// 预占一个 nonce
    pub fn acquire(&self) -> u64 {
        self.current_nonce.fetch_add(1, Ordering::SeqCst)
    }

    /// 交易在广播前失败时归还 nonce；广播后失败改用 sync
    pub fn rollback(&self) {
        let _ = self
            .current_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// 强制从链上同步最新 nonce（只会前进，不会回退）
    pub async fn sync(&self, provider: &dyn ProviderTrait) -> Result<(), AppError> {
        let _guard = self.sync_lock.lock().await;

        let chain_nonce = u256_to_u64(provider.get_transaction_count(self.address).await?)?;
        self.current_nonce.fetch_max(chain_nonce, Ordering::SeqCst);
        Ok(())
    }

    pub fn current(&self) -> u64 {
        self.current_nonce.load(Ordering::SeqCst)
    }
}
