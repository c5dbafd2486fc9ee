use crate::config::contract_networks::ContractNetworksConfig;
use crate::errors::error::AppError;
use crate::models::{SafeAccountConfig, SafeDeploymentConfig, SafeVersion};
use crate::services::tx::TxOptions;
use crate::utils::{parse_address, parse_hex_bytes, parse_optional_address, parse_u256};
use config::{Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub ethereum: EthereumConfig,
    #[serde(default)]
    pub tx: TxOptions,
    #[serde(default)]
    pub safe: SafeConfig,
    pub deployment: DeploymentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EthereumConfig {
    pub rpc_url: String,
    /// 逗号分隔，可为空
    #[serde(default)]
    pub api_keys: String,
    /// 期望的链 ID，与节点返回不一致时告警
    pub chain_id: Option<u64>,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,
}

fn default_max_retries() -> usize {
    3
}

fn default_base_delay_secs() -> u64 {
    1
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SafeConfig {
    pub version: Option<SafeVersion>,
    pub is_l1_safe_singleton: Option<bool>,
    #[serde(default)]
    pub contract_networks: ContractNetworksConfig,
}

/// 配置文件里的部署请求（地址、数值均为字符串）
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DeploymentConfig {
    pub owners: Vec<String>,
    pub threshold: u64,
    pub salt_nonce: Option<String>,
    pub to: Option<String>,
    pub data: Option<String>,
    pub fallback_handler: Option<String>,
    pub payment_token: Option<String>,
    pub payment: Option<String>,
    pub payment_receiver: Option<String>,
    /// 部署前打印预测地址（需要 salt_nonce）
    #[serde(default)]
    pub predict_address: bool,
}

impl DeploymentConfig {
    pub fn to_account_config(&self) -> Result<SafeAccountConfig, AppError> {
        let owners = self
            .owners
            .iter()
            .map(|o| parse_address(o))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SafeAccountConfig {
            owners,
            threshold: self.threshold,
            to: parse_optional_address(self.to.as_deref())?,
            data: self.data.as_deref().map(parse_hex_bytes).transpose()?,
            fallback_handler: parse_optional_address(self.fallback_handler.as_deref())?,
            payment_token: parse_optional_address(self.payment_token.as_deref())?,
            payment: self.payment.as_deref().map(parse_u256).transpose()?,
            payment_receiver: parse_optional_address(self.payment_receiver.as_deref())?,
        })
    }

    pub fn to_deployment_config(&self) -> Result<SafeDeploymentConfig, AppError> {
        Ok(SafeDeploymentConfig {
            salt_nonce: self.salt_nonce.as_deref().map(parse_u256).transpose()?,
        })
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
