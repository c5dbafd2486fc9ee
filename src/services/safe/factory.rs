use crate::config::ContractNetworksConfig;
use crate::errors::error::AppError;
use crate::infrastructure::adapter::EthAdapter;
use crate::infrastructure::protocol::{CreateProxyProps, SafeContract, SafeProxyFactoryContract};
use crate::models::{
    SafeAccountConfig, SafeDeploymentConfig, SafeVersion, SetupParams, TransactionOptions,
};
use crate::services::safe::account::Safe;
use crate::services::safe::resolver::{resolve_proxy_factory_contract, resolve_safe_contract};
use crate::services::safe::salt::calculate_proxy_address;
use crate::services::safe::validator::validate_for_version;
use crate::{log_debug, log_info};
use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes};
use std::sync::Arc;

/// SafeFactory 构造参数；未设置的字段使用默认值
pub struct SafeFactoryConfig {
    pub eth_adapter: Arc<dyn EthAdapter>,
    /// 默认 1.3.0
    pub safe_version: Option<SafeVersion>,
    /// 默认 false（1.3.0 起使用 L2 单例）
    pub is_l1_safe_singleton: Option<bool>,
    pub contract_networks: Option<ContractNetworksConfig>,
}

impl SafeFactoryConfig {
    pub fn new(eth_adapter: Arc<dyn EthAdapter>) -> Self {
        Self {
            eth_adapter,
            safe_version: None,
            is_l1_safe_singleton: None,
            contract_networks: None,
        }
    }
}

/// Safe 部署编排器，构造完成后状态不可变，可通过 Arc 并发调用 deploy_safe
pub struct SafeFactory {
    eth_adapter: Arc<dyn EthAdapter>,
    safe_version: SafeVersion,
    is_l1_safe_singleton: bool,
    contract_networks: Option<ContractNetworksConfig>,
    safe_contract: SafeContract,
    safe_proxy_factory_contract: SafeProxyFactoryContract,
}

impl SafeFactory {
    /// 解析并校验单例与代理工厂；任一未部署则构造失败
    pub async fn create(config: SafeFactoryConfig) -> Result<Self, AppError> {
        let SafeFactoryConfig {
            eth_adapter,
            safe_version,
            is_l1_safe_singleton,
            contract_networks,
        } = config;
        let safe_version = safe_version.unwrap_or_default();
        let is_l1_safe_singleton = is_l1_safe_singleton.unwrap_or(false);

        let chain_id = eth_adapter.get_chain_id().await?;
        log_info!(
            "初始化 SafeFactory: version={}, chain_id={}, l1_singleton={}",
            safe_version,
            chain_id,
            is_l1_safe_singleton
        );

        let safe_contract = resolve_safe_contract(
            &*eth_adapter,
            safe_version,
            chain_id,
            is_l1_safe_singleton,
            contract_networks.as_ref(),
        )
        .await?;
        let safe_proxy_factory_contract = resolve_proxy_factory_contract(
            &*eth_adapter,
            safe_version,
            chain_id,
            contract_networks.as_ref(),
        )
        .await?;

        Ok(Self {
            eth_adapter,
            safe_version,
            is_l1_safe_singleton,
            contract_networks,
            safe_contract,
            safe_proxy_factory_contract,
        })
    }

    pub fn get_eth_adapter(&self) -> Arc<dyn EthAdapter> {
        self.eth_adapter.clone()
    }

    pub fn get_safe_version(&self) -> SafeVersion {
        self.safe_version
    }

    pub fn is_l1_safe_singleton(&self) -> bool {
        self.is_l1_safe_singleton
    }

    pub fn get_contract_networks(&self) -> Option<&ContractNetworksConfig> {
        self.contract_networks.as_ref()
    }

    pub fn get_safe_contract(&self) -> &SafeContract {
        &self.safe_contract
    }

    pub fn get_proxy_factory_contract(&self) -> &SafeProxyFactoryContract {
        &self.safe_proxy_factory_contract
    }

    /// 代理工厂合约地址（不是未来 Safe 的地址）
    pub fn get_address(&self) -> Address {
        self.safe_proxy_factory_contract.get_address()
    }

    pub async fn get_chain_id(&self) -> Result<u64, AppError> {
        self.eth_adapter.get_chain_id().await
    }

    /// 校验 + 填充默认值 + 编码 setup 调用
    pub fn encode_setup_call_data(&self, config: &SafeAccountConfig) -> Result<Bytes, AppError> {
        validate_for_version(config, self.safe_version)?;
        let params = config.with_defaults();
        self.safe_contract
            .encode("setup", &setup_tokens(&params, self.safe_version))
    }

    /// 本地推算 CREATE2 地址，必须显式提供 salt
    pub async fn predict_safe_address(
        &self,
        account_config: &SafeAccountConfig,
        deployment_config: &SafeDeploymentConfig,
    ) -> Result<Address, AppError> {
        let salt_nonce = deployment_config.salt_nonce.ok_or_else(|| {
            AppError::invalid_config("predicting a Safe address requires an explicit salt_nonce")
        })?;
        let initializer = self.encode_setup_call_data(account_config)?;
        let creation_code = self
            .safe_proxy_factory_contract
            .proxy_creation_code(&*self.eth_adapter)
            .await?;

        Ok(calculate_proxy_address(
            self.get_address(),
            self.safe_contract.get_address(),
            &initializer,
            salt_nonce,
            &creation_code,
        ))
    }

    pub async fn deploy_safe(
        &self,
        account_config: SafeAccountConfig,
        deployment_config: Option<SafeDeploymentConfig>,
        options: Option<TransactionOptions>,
    ) -> Result<Safe, AppError> {
        // 1. 本地校验，失败时不发出任何网络请求
        validate_for_version(&account_config, self.safe_version)?;
        let deployment_config = deployment_config.unwrap_or_default();
        let options = options.unwrap_or_default();
        options.validate()?;

        // 2. 签名者地址
        let signer_address = self.eth_adapter.get_signer_address().await?;

        // 3. setup 初始化数据
        let initializer = self.encode_setup_call_data(&account_config)?;

        // 4. salt
        let salt_nonce = deployment_config.salt_nonce_or_default();
        log_debug!(
            "deploy_safe: owners={}, threshold={}, salt_nonce={}, initializer={} bytes",
            account_config.owners.len(),
            account_config.threshold,
            salt_nonce,
            initializer.len()
        );

        // 5~6. 提交 createProxyWithNonce
        let safe_address = self
            .safe_proxy_factory_contract
            .create_proxy(
                &*self.eth_adapter,
                CreateProxyProps {
                    safe_singleton_address: self.safe_contract.get_address(),
                    initializer,
                    salt_nonce,
                    options: options.merge_sender(signer_address),
                },
            )
            .await?;

        // 7. 确认代理地址上有代码
        if !self.eth_adapter.is_contract_deployed(safe_address).await? {
            return Err(AppError::DeploymentVerificationFailed(format!(
                "SafeProxy contract is not deployed at {:#x}",
                safe_address
            )));
        }

        log_info!(
            "✅ Safe 部署成功: address={:#x}, version={}",
            safe_address,
            self.safe_version
        );
        Ok(Safe::new(
            self.eth_adapter.clone(),
            &self.safe_contract,
            safe_address,
        ))
    }
}

/// 1.0.0 的 setup 没有 fallbackHandler
fn setup_tokens(params: &SetupParams, version: SafeVersion) -> Vec<Token> {
    let mut tokens = vec![
        Token::Array(params.owners.iter().copied().map(Token::Address).collect()),
        Token::Uint(params.threshold),
        Token::Address(params.to),
        Token::Bytes(params.data.to_vec()),
    ];
    if version.supports_fallback_handler() {
        tokens.push(Token::Address(params.fallback_handler));
    }
    tokens.extend([
        Token::Address(params.payment_token),
        Token::Uint(params.payment),
        Token::Address(params.payment_receiver),
    ]);
    tokens
}
