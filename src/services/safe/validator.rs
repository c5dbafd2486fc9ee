use crate::errors::error::AppError;
use crate::models::{SafeAccountConfig, SafeVersion};
use ethers_core::types::Address;
use std::collections::HashSet;

/// Safe 合约 owner 链表的哨兵地址 0x…01，不能作为 owner
pub fn sentinel_owners() -> Address {
    Address::from_low_u64_be(1)
}

/// 纯校验，不访问网络
pub fn validate_safe_account_config(config: &SafeAccountConfig) -> Result<(), AppError> {
    if config.owners.is_empty() {
        return Err(AppError::invalid_config(
            "owner list must have at least one owner",
        ));
    }

    let mut seen = HashSet::with_capacity(config.owners.len());
    for owner in &config.owners {
        if owner.is_zero() {
            return Err(AppError::invalid_config("owner cannot be the zero address"));
        }
        if *owner == sentinel_owners() {
            return Err(AppError::invalid_config(format!(
                "owner cannot be the sentinel address {:#x}",
                owner
            )));
        }
        if !seen.insert(*owner) {
            return Err(AppError::invalid_config(format!(
                "duplicate owner {:#x}",
                owner
            )));
        }
    }

    if config.threshold < 1 {
        return Err(AppError::invalid_config(
            "threshold must be greater than or equal to 1",
        ));
    }
    if config.threshold > config.owners.len() as u64 {
        return Err(AppError::invalid_config(format!(
            "threshold {} must be lower than or equal to owners length {}",
            config.threshold,
            config.owners.len()
        )));
    }
    Ok(())
}

/// 版本相关的额外约束
pub fn validate_for_version(
    config: &SafeAccountConfig,
    version: SafeVersion,
) -> Result<(), AppError> {
    validate_safe_account_config(config)?;
    if config.fallback_handler.is_some() && !version.supports_fallback_handler() {
        return Err(AppError::invalid_config(format!(
            "Safe {} does not support a fallback handler",
            version
        )));
    }
    Ok(())
}
