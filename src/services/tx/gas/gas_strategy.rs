// services/tx/gas/gas_strategy.rs

use serde::{Deserialize, Serialize};

/// 交易优先级策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TxPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl TxPriority {
    /// tip 调整百分比（100 = 无调整）
    pub fn tip_multiplier_percent(&self) -> u128 {
        match self {
            TxPriority::Low => 80,
            TxPriority::Normal => 100,
            TxPriority::High => 150,
            TxPriority::Urgent => 300,
        }
    }

    /// max_fee_per_gas 相对链上建议值的上浮上限（百分比）
    pub fn max_fee_cap_multiplier_percent(&self) -> u128 {
        match self {
            TxPriority::Low => 100,
            TxPriority::Normal => 120,
            TxPriority::High => 150,
            TxPriority::Urgent => 200,
        }
    }
}
