use crate::errors::error::AppError;
use ethers_core::types::{Address, U256};

/// 调用方可覆盖的交易字段，全部可选
///
/// `gas` 与 `gas_limit` 是同一概念的两种写法，只能二选一。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub from: Option<Address>,
    pub gas: Option<U256>,
    pub gas_limit: Option<U256>,
    /// 设置后发送 legacy 交易
    pub gas_price: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub nonce: Option<U256>,
}

impl TransactionOptions {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.gas.is_some() && self.gas_limit.is_some() {
            return Err(AppError::ConflictingGasOptions);
        }
        Ok(())
    }

    /// 固定 gas 上限（gas 或 gas_limit），None 表示需要估算
    pub fn fixed_gas(&self) -> Option<U256> {
        self.gas.or(self.gas_limit)
    }

    /// 未显式指定 from 时使用签名者地址
    pub fn merge_sender(mut self, signer: Address) -> Self {
        if self.from.is_none() {
            self.from = Some(signer);
        }
        self
    }
}
