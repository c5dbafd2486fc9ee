use super::ethereum_provider::{EthereumProvider, ProviderTrait};
use crate::errors::error::AppError;
use crate::log_warn;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, H256, TransactionReceipt, U256};
use ethers_providers::{Http, Middleware, Provider, ProviderError};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// 读请求指数退避重试；广播交易不重试（重复提交同一 salt 的部署没有意义）
pub struct RetryAdapter {
    provider: Arc<EthereumProvider>,
    max_retries: usize,
    base_delay: Duration,
}

/// 第 attempt 次重试前的基础等待：base * 2^(attempt-1)，指数上限 2^10
pub fn backoff_delay_ms(base_ms: u64, attempt: usize) -> u64 {
    if attempt == 0 {
        return 0;
    }
    let exponent = (attempt - 1).min(10);
    base_ms.saturating_mul(1u64 << exponent)
}

impl RetryAdapter {
    pub fn new(provider: Arc<EthereumProvider>, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            provider,
            // 至少尝试一次
            max_retries: max_retries.max(1),
            base_delay,
        }
    }

    async fn retry_call<T, Fut, F>(&self, mut f: F) -> Result<T, AppError>
    where
        F: FnMut(Arc<Provider<Http>>) -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, ProviderError>> + Send,
    {
        let mut last_error: Option<ProviderError> = None;
        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay_ms = backoff_delay_ms(self.base_delay.as_millis() as u64, attempt);
                // 0~10% 随机抖动，避免多个任务同时打到 RPC 节点
                let jitter = rand::thread_rng().gen_range(0..=(delay_ms / 10 + 1));
                let final_delay = Duration::from_millis(delay_ms + jitter);

                log_warn!(
                    "RPC 尝试失败，正在进行第 {} 次重试，等待 {:?}...",
                    attempt + 1,
                    final_delay
                );
                sleep(final_delay).await;
            }
            match f(self.provider.get_provider()).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    log_warn!("RPC 调用失败 (第 {} 次): {:?}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }
        Err(AppError::ProviderError(format!(
            "重试 {} 次失败，最后错误: {:?}",
            self.max_retries, last_error
        )))
    }
}

#[async_trait]
impl ProviderTrait for RetryAdapter {
    async fn get_chain_id(&self) -> Result<U256, AppError> {
        self.retry_call(|p| async move { p.get_chainid().await })
            .await
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, AppError> {
        self.retry_call(move |p| async move { p.get_code(address, None).await })
            .await
    }

    async fn get_transaction_count(&self, address: Address) -> Result<U256, AppError> {
        self.retry_call(move |p| async move { p.get_transaction_count(address, None).await })
            .await
    }

    async fn estimate_eip1559_fees(
        &self,
        estimator: Option<fn(U256, Vec<Vec<U256>>) -> (U256, U256)>,
    ) -> Result<(U256, U256), AppError> {
        self.retry_call(move |p| async move { p.estimate_eip1559_fees(estimator).await })
            .await
    }

    async fn broadcast_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError> {
        self.provider.broadcast_raw_transaction(rlp).await
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout_secs: u64,
        confirmations: usize,
    ) -> Result<TransactionReceipt, AppError> {
        self.provider
            .wait_for_receipt(tx_hash, timeout_secs, confirmations)
            .await
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.retry_call(move |p| {
            let tx = tx.clone();
            async move { p.call(&tx, None).await }
        })
        .await
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError> {
        self.retry_call(move |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(&tx, None).await }
        })
        .await
    }
}
