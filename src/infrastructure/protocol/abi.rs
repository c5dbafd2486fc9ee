//! 各版本 Safe 合约的可读 ABI 片段（只包含部署流程用到的函数/事件）
use crate::errors::error::AppError;
use crate::models::SafeVersion;
use ethers_core::abi::{Abi, parse_abi};

const SAFE_COMMON: &[&str] = &[
    "function getOwners() external view returns (address[])",
    "function getThreshold() external view returns (uint256)",
    "function nonce() external view returns (uint256)",
    "function VERSION() external view returns (string)",
];

const SAFE_SETUP_V1_0_0: &str = "function setup(address[] _owners, uint256 _threshold, address to, bytes data, address paymentToken, uint256 payment, address paymentReceiver) external";

const SAFE_SETUP: &str = "function setup(address[] _owners, uint256 _threshold, address to, bytes data, address fallbackHandler, address paymentToken, uint256 payment, address paymentReceiver) external";

const FACTORY_COMMON: &[&str] = &[
    "function createProxyWithNonce(address _singleton, bytes initializer, uint256 saltNonce) external returns (address proxy)",
    "function proxyCreationCode() external pure returns (bytes)",
];

// ProxyCreation 事件在不同版本的工厂里形态不同
const PROXY_CREATION_V1_1_1: &str = "event ProxyCreation(address proxy)";
const PROXY_CREATION_V1_3_0: &str = "event ProxyCreation(address proxy, address singleton)";
const PROXY_CREATION_V1_4_1: &str = "event ProxyCreation(address indexed proxy, address singleton)";

pub fn safe_singleton_abi(version: SafeVersion) -> Result<Abi, AppError> {
    let setup = match version {
        SafeVersion::V1_0_0 => SAFE_SETUP_V1_0_0,
        _ => SAFE_SETUP,
    };
    let mut fragments = SAFE_COMMON.to_vec();
    fragments.push(setup);
    Ok(parse_abi(&fragments)?)
}

pub fn proxy_factory_abi(version: SafeVersion) -> Result<Abi, AppError> {
    let event = match version {
        SafeVersion::V1_0_0 | SafeVersion::V1_1_1 | SafeVersion::V1_2_0 => PROXY_CREATION_V1_1_1,
        SafeVersion::V1_3_0 => PROXY_CREATION_V1_3_0,
        SafeVersion::V1_4_1 => PROXY_CREATION_V1_4_1,
    };
    let mut fragments = FACTORY_COMMON.to_vec();
    fragments.push(event);
    Ok(parse_abi(&fragments)?)
}

/// 自定义 ABI（JSON 字符串）优先，否则使用内置片段
pub fn resolve_abi(
    custom_abi: Option<&str>,
    builtin: impl FnOnce() -> Result<Abi, AppError>,
) -> Result<Abi, AppError> {
    match custom_abi {
        Some(json) => Ok(serde_json::from_str::<Abi>(json)?),
        None => builtin(),
    }
}
