pub mod eth_adapter;
pub mod ethers_adapter;

pub use eth_adapter::EthAdapter;
pub use ethers_adapter::EthersAdapter;
