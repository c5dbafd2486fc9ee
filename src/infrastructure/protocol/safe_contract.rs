use crate::errors::error::AppError;
use crate::infrastructure::protocol::abi::{resolve_abi, safe_singleton_abi};
use crate::infrastructure::protocol::deployments::SafeDeployment;
use crate::models::SafeVersion;
use crate::utils::parse_address;
use ethers_core::abi::{Abi, Token};
use ethers_core::types::{Address, Bytes};

/// Safe 单例合约句柄：地址 + 版本 + ABI，只负责编解码，不持有连接
#[derive(Debug, Clone)]
pub struct SafeContract {
    address: Address,
    version: SafeVersion,
    chain_id: u64,
    abi: Abi,
}

impl SafeContract {
    pub fn new(address: Address, version: SafeVersion, chain_id: u64, abi: Abi) -> Self {
        Self {
            address,
            version,
            chain_id,
            abi,
        }
    }

    /// 自定义地址 / ABI 优先于内置部署记录
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
                    contract: "Safe singleton",
                    version: version.to_string(),
                    chain_id,
                });
            }
        };
        let abi = resolve_abi(custom_abi, || safe_singleton_abi(version))?;
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

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// 同一份 ABI 绑定到代理地址（代理 delegatecall 到单例）
    pub fn at(&self, address: Address) -> Self {
        Self {
            address,
            ..self.clone()
        }
    }

    pub fn encode(&self, name: &str, args: &[Token]) -> Result<Bytes, AppError> {
        let function = self.abi.function(name)?;
        Ok(function.encode_input(args)?.into())
    }

    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<Token>, AppError> {
        let function = self.abi.function(name)?;
        Ok(function.decode_output(data)?)
    }
}
