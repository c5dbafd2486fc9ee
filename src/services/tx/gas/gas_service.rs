// services/tx/gas/gas_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::services::tx::gas::gas_strategy::TxPriority;
use ethers_core::types::U256;

/// Gas 费用计算服务（纯整数运算，无浮点风险）
#[derive(Clone, Copy, Debug)]
pub struct GasService {
    /// 全局对 tip 的额外调整百分比（100 = 无调整，110 = +10%）
    base_tip_percent: u128,
}

impl Default for GasService {
    fn default() -> Self {
        Self::new(100)
    }
}

impl GasService {
    pub fn new(base_tip_percent: u128) -> Self {
        Self { base_tip_percent }
    }

    /// 根据优先级计算 EIP-1559 费用 (max_fee_per_gas, max_priority_fee_per_gas)
    pub async fn resolve_fees(
        &self,
        provider: &dyn ProviderTrait,
        priority: TxPriority,
    ) -> Result<(U256, U256), AppError> {
        let (max_fee_per_gas, base_priority_fee) = provider.estimate_eip1559_fees(None).await?;
        self.apply_priority(max_fee_per_gas, base_priority_fee, priority)
    }

    /// tip 按优先级放大；max_fee 至少覆盖调整后的 tip，且抬升幅度受上限约束
    pub fn apply_priority(
        &self,
        max_fee_per_gas: U256,
        base_priority_fee: U256,
        priority: TxPriority,
    ) -> Result<(U256, U256), AppError> {
        let total_multiplier = self
            .base_tip_percent
            .checked_mul(priority.tip_multiplier_percent())
            .ok_or_else(|| AppError::Internal("Tip multiplier overflow".to_string()))?
            / 100;

        let adjusted_priority_fee = base_priority_fee
            .checked_mul(U256::from(total_multiplier))
            .ok_or_else(|| AppError::Internal("Adjusted priority fee overflow".to_string()))?
            / U256::from(100);

        let tip_delta = adjusted_priority_fee.saturating_sub(base_priority_fee);
        let cap = max_fee_per_gas
            .checked_mul(U256::from(priority.max_fee_cap_multiplier_percent()))
            .ok_or_else(|| AppError::Internal("Max fee cap calculation overflow".to_string()))?
            / U256::from(100);

        let raised = max_fee_per_gas.saturating_add(tip_delta).min(cap);
        let final_max_fee = raised.max(max_fee_per_gas).max(adjusted_priority_fee);

        Ok((final_max_fee, adjusted_priority_fee))
    }
}
