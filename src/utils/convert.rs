use crate::errors::error::AppError;
use ethers_core::types::{Address, Bytes, U256};
use std::str::FromStr;

/// 解析十六进制地址（支持 0x 前缀），失败返回 InvalidAddress
pub fn parse_address(value: &str) -> Result<Address, AppError> {
    let trimmed = value.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex_part.len() != 40 {
        return Err(AppError::InvalidAddress(value.to_string()));
    }
    Address::from_str(trimmed).map_err(|_| AppError::InvalidAddress(value.to_string()))
}

pub fn parse_optional_address(value: Option<&str>) -> Result<Option<Address>, AppError> {
    value.map(parse_address).transpose()
}

/// 十进制或 0x 十六进制字符串转 U256
pub fn parse_u256(value: &str) -> Result<U256, AppError> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(hex_part) => U256::from_str_radix(hex_part, 16).map_err(|e| e.to_string()),
        None => U256::from_dec_str(trimmed).map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| AppError::InvalidNumber(format!("{}: {}", value, e)))
}

pub fn parse_hex_bytes(value: &str) -> Result<Bytes, AppError> {
    let trimmed = value.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(hex_part)
        .map(Bytes::from)
        .map_err(|e| AppError::ConversionError(format!("无效的十六进制数据 {}: {}", value, e)))
}

/// U256 转 u64（chain id 等场景），超出范围报错
pub fn u256_to_u64(value: U256) -> Result<u64, AppError> {
    if value > U256::from(u64::MAX) {
        return Err(AppError::ConversionError(format!(
            "U256({}) 超出u64范围",
            value
        )));
    }
    Ok(value.as_u64())
}

/// 地址左补零到 32 字节（等价于 abi.encode(uint256(uint160(addr)))）
pub fn address_to_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

pub fn u256_to_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}
