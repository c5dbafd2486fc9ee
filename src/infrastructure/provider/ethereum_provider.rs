use crate::config::EthereumConfig;
use crate::errors::error::AppError;
use crate::log_info;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, H256, TransactionReceipt, U256};
use ethers_providers::{Http, Middleware, PendingTransaction, Provider};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::timeout;
use url::Url;

#[async_trait]
pub trait ProviderTrait: Send + Sync {
    async fn get_chain_id(&self) -> Result<U256, AppError>;
    async fn get_code(&self, address: Address) -> Result<Bytes, AppError>;
    async fn get_transaction_count(&self, address: Address) -> Result<U256, AppError>;

    async fn estimate_eip1559_fees(
        &self,
        estimator: Option<fn(U256, Vec<Vec<U256>>) -> (U256, U256)>,
    ) -> Result<(U256, U256), AppError>;
    /// 只负责广播；返回 Ok 后 nonce 即视为已被占用
    async fn broadcast_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError>;
    /// 等待确认并检查回执状态
    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout_secs: u64,
        confirmations: usize,
    ) -> Result<TransactionReceipt, AppError>;
    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError>;
    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError>;
}

/// 多个 RPC 端点轮询（每个 api key 一个 Provider）
pub struct EthereumProvider {
    providers: Vec<Arc<Provider<Http>>>,
    index: AtomicUsize,
}

/// api key 拼接到 RPC 路径上；没有 key 时直接使用 rpc_url
pub fn build_endpoints(rpc_url: &str, api_keys: &str) -> Result<Vec<Url>, AppError> {
    let base = Url::parse(rpc_url).map_err(|e| AppError::InvalidUrl(format!("{}: {}", rpc_url, e)))?;
    let keys: Vec<&str> = api_keys
        .split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();

    if keys.is_empty() {
        return Ok(vec![base]);
    }

    keys.into_iter()
        .map(|key| {
            let joined = if rpc_url.ends_with('/') {
                format!("{}{}", rpc_url, key)
            } else {
                format!("{}/{}", rpc_url, key)
            };
            Url::parse(&joined).map_err(|e| AppError::InvalidUrl(format!("{}: {}", joined, e)))
        })
        .collect()
}

impl EthereumProvider {
    pub fn new(config: &EthereumConfig) -> Result<Self, AppError> {
        let providers = build_endpoints(&config.rpc_url, &config.api_keys)?
            .into_iter()
            .map(|url| {
                Provider::<Http>::try_from(url.as_str())
                    .map(Arc::new)
                    .map_err(|e| AppError::InvalidUrl(format!("{}: {}", url, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log_info!("成功初始化 {} 个RPC Provider", providers.len());

        Ok(Self {
            providers,
            index: AtomicUsize::new(0),
        })
    }

    pub fn get_provider(&self) -> Arc<Provider<Http>> {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        self.providers[i % self.providers.len()].clone()
    }
}

/// 等待确认并检查回执状态（status == 0 视为回滚）
pub(crate) fn check_receipt(receipt: TransactionReceipt) -> Result<TransactionReceipt, AppError> {
    if receipt.status == Some(0u64.into()) {
        return Err(AppError::TransactionReverted(format!(
            "Hash: {:?}",
            receipt.transaction_hash
        )));
    }
    log_info!(
        "交易执行成功: hash={:?}, block={:?}",
        receipt.transaction_hash,
        receipt.block_number
    );
    Ok(receipt)
}

#[async_trait]
impl ProviderTrait for EthereumProvider {
    async fn get_chain_id(&self) -> Result<U256, AppError> {
        self.get_provider()
            .get_chainid()
            .await
            .map_err(AppError::from)
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, AppError> {
        self.get_provider()
            .get_code(address, None)
            .await
            .map_err(AppError::from)
    }

    async fn get_transaction_count(&self, address: Address) -> Result<U256, AppError> {
        self.get_provider()
            .get_transaction_count(address, None)
            .await
            .map_err(AppError::from)
    }

    async fn estimate_eip1559_fees(
        &self,
        estimator: Option<fn(U256, Vec<Vec<U256>>) -> (U256, U256)>,
    ) -> Result<(U256, U256), AppError> {
        self.get_provider()
            .estimate_eip1559_fees(estimator)
            .await
            .map_err(|e| AppError::ProviderError(format!("EIP1559 费用估算失败: {}", e)))
    }

    async fn broadcast_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError> {
        let provider = self.get_provider();
        let pending_tx = provider
            .send_raw_transaction(rlp)
            .await
            .map_err(|e| AppError::ProviderError(format!("Broadcast failed: {}", e)))?;
        Ok(pending_tx.tx_hash())
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout_secs: u64,
        confirmations: usize,
    ) -> Result<TransactionReceipt, AppError> {
        // 持有 provider 的 Arc，保证 await 期间 Http Client 不被释放
        let provider = self.get_provider();
        let pending_tx = PendingTransaction::new(tx_hash, &*provider).confirmations(confirmations);

        let receipt = timeout(std::time::Duration::from_secs(timeout_secs), pending_tx)
            .await
            .map_err(|_| AppError::Internal("Transaction confirmation timeout".to_string()))?
            .map_err(|e| AppError::Internal(format!("Wait receipt error: {}", e)))?
            .ok_or_else(|| AppError::Internal("Transaction dropped from mempool".to_string()))?;

        check_receipt(receipt)
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.get_provider()
            .call(tx, None)
            .await
            .map_err(|e| AppError::ProviderError(format!("Call simulation failed: {}", e)))
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError> {
        self.get_provider()
            .estimate_gas(tx, None)
            .await
            .map_err(|e| AppError::ProviderError(format!("estimate_gas failed: {}", e)))
    }
}
