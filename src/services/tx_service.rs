// services/tx_service.rs
use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::services::tx::gas::GasService;
use crate::services::tx::nonce::NonceService;
use crate::services::tx::signer::TxSigner;
use crate::services::tx::simulation::SimulationService;
use crate::services::tx::types::{TxContext, TxResult};
use crate::utils::u256_to_u64;
use crate::{log_debug, log_info, log_warn};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Eip1559TransactionRequest, TransactionRequest, U256};
use std::sync::Arc;

/// 交易流水线：模拟 → 费用 → nonce → gas → 签名 → 广播
pub struct TxService {
    pub signer: Arc<dyn TxSigner>,
    pub nonce_svc: Arc<NonceService>,
    pub gas_svc: Arc<GasService>,
    pub simulation: Arc<SimulationService>,
    pub provider: Arc<dyn ProviderTrait>,
}

impl TxService {
    pub fn new(
        signer: Arc<dyn TxSigner>,
        nonce_svc: Arc<NonceService>,
        gas_svc: Arc<GasService>,
        simulation: Arc<SimulationService>,
        provider: Arc<dyn ProviderTrait>,
    ) -> Self {
        Self {
            signer,
            nonce_svc,
            gas_svc,
            simulation,
            provider,
        }
    }

    pub async fn execute(&self, mut ctx: TxContext) -> Result<TxResult, AppError> {
        // 本地签名器只能替自己的地址签名
        let signer_address = self.signer.address();
        match ctx.overrides.from {
            Some(from) if from != signer_address => {
                return Err(AppError::Signer(format!(
                    "sender {:#x} does not match signer {:#x}",
                    from, signer_address
                )));
            }
            _ => ctx.overrides.from = Some(signer_address),
        }

        // 1. 预执行模拟
        self.simulation.run(&ctx, &*self.provider).await?;

        // 2. 构建交易（显式 gas_price 走 legacy，否则 EIP-1559）
        let mut typed_tx = self.build_typed_tx(&ctx).await?;

        // 3. nonce：显式指定时不占用本地计数器
        let reserved = match ctx.overrides.nonce {
            Some(nonce) => {
                typed_tx.set_nonce(nonce);
                false
            }
            None => {
                typed_tx.set_nonce(self.nonce_svc.acquire());
                true
            }
        };
        let rollback = |e: AppError| {
            if reserved {
                self.nonce_svc.rollback();
            }
            e
        };

        // 4. Gas Limit：显式值优先，否则估算 + buffer
        let gas_limit = match ctx.overrides.fixed_gas() {
            Some(gas) => gas,
            None => {
                let estimated = self
                    .provider
                    .estimate_gas(&typed_tx)
                    .await
                    .map_err(|e| AppError::Internal(format!("Gas estimation failed: {}", e)))
                    .map_err(rollback)?;
                estimated * U256::from(ctx.options.gas_limit_buffer) / U256::from(100)
            }
        };
        typed_tx.set_gas(gas_limit);
        log_debug!("交易 gas limit = {}, nonce = {:?}", gas_limit, typed_tx.nonce());

        // 5. 签名
        let signature = self.signer.sign_tx(&typed_tx).await.map_err(rollback)?;
        let signed_rlp = typed_tx.rlp_signed(&signature);

        // 6. 广播：节点拒收时 nonce 未被占用，可以归还
        let tx_hash = self
            .provider
            .broadcast_raw_transaction(signed_rlp)
            .await
            .map_err(rollback)?;
        log_debug!("交易已广播: hash={:?}", tx_hash);

        // 7. 等待确认：此时 nonce 已在链上或交易池中，只能向前同步
        let receipt = match self
            .provider
            .wait_for_receipt(
                tx_hash,
                ctx.options.timeout_secs,
                ctx.options.confirmations as usize,
            )
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                if reserved {
                    if let Err(sync_err) = self.nonce_svc.sync(&*self.provider).await {
                        log_warn!("广播后同步 nonce 失败: {}", sync_err);
                    }
                }
                return Err(e);
            }
        };

        log_info!(
            "交易已上链: to={:#x}, hash={:?}, gas_used={:?}",
            ctx.to,
            receipt.transaction_hash,
            receipt.gas_used
        );
        Ok(TxResult {
            tx_hash: receipt.transaction_hash,
            receipt,
        })
    }

    async fn build_typed_tx(&self, ctx: &TxContext) -> Result<TypedTransaction, AppError> {
        let overrides = &ctx.overrides;
        let chain_id = self.signer.chain_id();

        let mut typed_tx: TypedTransaction = if let Some(gas_price) = overrides.gas_price {
            TransactionRequest::new()
                .to(ctx.to)
                .value(ctx.value)
                .data(ctx.data.clone())
                .gas_price(gas_price)
                .into()
        } else {
            let (max_fee, tip) = match (overrides.max_fee_per_gas, overrides.max_priority_fee_per_gas) {
                (Some(max_fee), Some(tip)) => (max_fee, tip),
                (explicit_max, explicit_tip) => {
                    let (node_max, node_tip) = self
                        .gas_svc
                        .resolve_fees(&*self.provider, ctx.options.priority)
                        .await?;
                    merge_fees(explicit_max, explicit_tip, node_max, node_tip)
                }
            };
            Eip1559TransactionRequest::new()
                .to(ctx.to)
                .value(ctx.value)
                .data(ctx.data.clone())
                .max_fee_per_gas(max_fee)
                .max_priority_fee_per_gas(tip)
                .into()
        };

        if let Some(from) = overrides.from {
            typed_tx.set_from(from);
        }
        if let Some(chain_id) = chain_id {
            typed_tx.set_chain_id(chain_id);
        } else {
            let chain_id = u256_to_u64(self.provider.get_chain_id().await?)?;
            typed_tx.set_chain_id(chain_id);
        }
        Ok(typed_tx)
    }
}

/// 只给了一半 EIP-1559 费用时与节点建议值合并，保证 tip <= max_fee
fn merge_fees(
    explicit_max: Option<U256>,
    explicit_tip: Option<U256>,
    node_max: U256,
    node_tip: U256,
) -> (U256, U256) {
    match (explicit_max, explicit_tip) {
        (Some(max_fee), _) => (max_fee, explicit_tip.unwrap_or(node_tip).min(max_fee)),
        (None, Some(tip)) => (node_max.max(tip), tip),
        (None, None) => (node_max, node_tip),
    }
}
