use ethers_core::types::Address;
use ethers_providers::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// 账户配置不合法（owners / threshold 等），在任何网络请求之前抛出
    #[error("Invalid Safe configuration: {0}")]
    InvalidConfiguration(String),

    /// 单例合约或代理工厂合约在目标链上没有代码
    #[error("{contract} contract is not deployed on chain {chain_id} at {address:#x}")]
    ContractNotDeployed {
        contract: &'static str,
        address: Address,
        chain_id: u64,
    },

    #[error("Cannot specify gas and gas_limit together")]
    ConflictingGasOptions,

    /// 交易已提交，但预期地址上没有代码
    #[error("Safe deployment verification failed: {0}")]
    DeploymentVerificationFailed(String),

    /// 内置部署表中没有该版本/链，且未提供自定义地址
    #[error("Safe {version} {contract} has no known deployment on chain {chain_id}")]
    UnsupportedNetwork {
        contract: &'static str,
        version: String,
        chain_id: u64,
    },

    #[error("类型转换错误: {0}")]
    ConversionError(String),

    #[error("ABI 错误: {0}")]
    Abi(String),

    #[error("签名错误: {0}")]
    Signer(String),

    #[error("交易回滚: {0}")]
    TransactionReverted(String),

    #[error("配置错误: {0}")]
    Config(String),

    /// 内部不可预期错误（兜底）
    #[error("内部错误: {0}")]
    Internal(String),

    #[error("无效的provider: {0}")]
    ProviderError(String),

    #[error("无效的URL: {0}")]
    InvalidUrl(String),

    #[error("无效的地址: {0}")]
    InvalidAddress(String),

    #[error("无效的数字: {0}")]
    InvalidNumber(String),
}

impl AppError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        AppError::InvalidConfiguration(message.into())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl From<ethers_core::abi::Error> for AppError {
    fn from(err: ethers_core::abi::Error) -> Self {
        AppError::Abi(err.to_string())
    }
}

impl From<ethers_core::abi::ParseError> for AppError {
    fn from(err: ethers_core::abi::ParseError) -> Self {
        AppError::Abi(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Abi(format!("ABI JSON 解析失败: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
