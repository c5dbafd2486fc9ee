pub mod config;
pub mod contract_networks;

pub use config::{Config, DeploymentConfig, EthereumConfig, SafeConfig};
pub use contract_networks::{ContractNetworkConfig, ContractNetworksConfig};
