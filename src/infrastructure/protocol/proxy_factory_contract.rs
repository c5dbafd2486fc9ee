use crate::errors::error::AppError;
use crate::infrastructure::adapter::EthAdapter;
use crate::infrastructure::protocol::abi::{proxy_factory_abi, resolve_abi};
use crate::infrastructure::protocol::deployments::SafeDeployment;
use crate::models::{SafeVersion, TransactionOptions};
use crate::utils::parse_address;
use crate::{log_debug, log_info};
use ethers_core::abi::{Abi, RawLog, Token};
use ethers_core::types::{Address, Bytes, TransactionReceipt, U256};

/// createProxyWithNonce 的入参
#[derive(Debug, Clone)]
pub struct CreateProxyProps {
    pub safe_singleton_address: Address,
    pub initializer: Bytes,
    pub salt_nonce: U256,
    pub options: TransactionOptions,
}

/// 代理工厂合约句柄
#[derive(Debug, Clone)]
pub struct SafeProxyFactoryContract {
    address: Address,
    version: SafeVersion,
    chain_id: u64,
    abi: Abi,
}

impl SafeProxyFactoryContract {
    pub fn new(address: Address, version: SafeVersion, chain_id: u64, abi: Abi) -> Self {
        Self {
            address,
            version,
            chain_id,
            abi,
        }
    }

    pub fn from_deployment(
        version: SafeVersion,
        chain_id: u64,
        deployment: Option<&SafeDeployment>,
        custom_address: Option<Address>,
        custom_abi: Option<&str>,
    ) -> Result<Self, AppError> {
        let address = match (custom_address, deployment) {
            (Some(address), _) => address,
            (None, Some(d)) => parse_address(d.default_address)?,
            (None, None) => {
                return Err(AppError::UnsupportedNetwork {
                    contract: "SafeProxyFactory",
                    version: version.to_string(),
                    chain_id,
                });
            }
        };
        let abi = resolve_abi(custom_abi, || proxy_factory_abi(version))?;
        Ok(Self::new(address, version, chain_id, abi))
    }

    pub fn get_address(&self) -> Address {
        self.address
    }

    pub fn get_version(&self) -> SafeVersion {
        self.version
    }

    pub fn get_chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn encode_create_proxy(&self, props: &CreateProxyProps) -> Result<Bytes, AppError> {
        let function = self.abi.function("createProxyWithNonce")?;
        let data = function.encode_input(&[
            Token::Address(props.safe_singleton_address),
            Token::Bytes(props.initializer.to_vec()),
            Token::Uint(props.salt_nonce),
        ])?;
        Ok(data.into())
    }

    /// 提交 createProxyWithNonce 交易，从回执的 ProxyCreation 事件中取出代理地址
    pub async fn create_proxy(
        &self,
        adapter: &dyn EthAdapter,
        props: CreateProxyProps,
    ) -> Result<Address, AppError> {
        props.options.validate()?;
        let data = self.encode_create_proxy(&props)?;

        log_info!(
            "提交 createProxyWithNonce: factory={:#x}, singleton={:#x}, salt_nonce={}",
            self.address,
            props.safe_singleton_address,
            props.salt_nonce
        );
        let receipt = adapter
            .send_transaction(self.address, data, props.options)
            .await?;
        log_debug!(
            "createProxyWithNonce 已确认: hash={:?}, block={:?}",
            receipt.transaction_hash,
            receipt.block_number
        );

        self.parse_proxy_address(&receipt)
    }

    pub fn parse_proxy_address(&self, receipt: &TransactionReceipt) -> Result<Address, AppError> {
        let event = self.abi.event("ProxyCreation")?;
        let topic = event.signature();

        for log in &receipt.logs {
            if log.address != self.address || log.topics.first() != Some(&topic) {
                continue;
            }
            let parsed = event.parse_log(RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            })?;
            let proxy = parsed
                .params
                .into_iter()
                .find(|p| p.name == "proxy")
                .and_then(|p| p.value.into_address());
            if let Some(proxy) = proxy {
                return Ok(proxy);
            }
        }

        Err(AppError::DeploymentVerificationFailed(format!(
            "no ProxyCreation event from factory {:#x} in transaction {:?}",
            self.address, receipt.transaction_hash
        )))
    }

    /// 工厂部署代理时使用的 creation code，用于本地推算 CREATE2 地址
    pub async fn proxy_creation_code(&self, adapter: &dyn EthAdapter) -> Result<Bytes, AppError> {
        let function = self.abi.function("proxyCreationCode")?;
        let raw = adapter
            .call(self.address, function.encode_input(&[])?.into())
            .await?;
        let code = function
            .decode_output(&raw)?
            .into_iter()
            .next()
            .and_then(Token::into_bytes)
            .ok_or_else(|| AppError::Abi("proxyCreationCode returned no bytes".to_string()))?;
        Ok(code.into())
    }
}
