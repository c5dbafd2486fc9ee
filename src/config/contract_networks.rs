use serde::Deserialize;
use std::collections::HashMap;

/// 单条链的自定义合约地址 / ABI（ABI 为 JSON 字符串）
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ContractNetworkConfig {
    pub safe_singleton_address: Option<String>,
    pub safe_singleton_abi: Option<String>,
    pub safe_proxy_factory_address: Option<String>,
    pub safe_proxy_factory_abi: Option<String>,
}

/// chain id → 自定义合约配置；键是字符串，兼容 toml/json 的 map key
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ContractNetworksConfig(HashMap<String, ContractNetworkConfig>);

impl ContractNetworksConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chain_id: u64, config: ContractNetworkConfig) {
        self.0.insert(chain_id.to_string(), config);
    }

    pub fn with_network(mut self, chain_id: u64, config: ContractNetworkConfig) -> Self {
        self.insert(chain_id, config);
        self
    }

    pub fn get(&self, chain_id: u64) -> Option<&ContractNetworkConfig> {
        self.0.get(&chain_id.to_string())
    }
}
