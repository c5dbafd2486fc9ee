pub mod ethereum_provider;
mod retry_adapter;

pub use ethereum_provider::{EthereumProvider, ProviderTrait};
pub use retry_adapter::{RetryAdapter, backoff_delay_ms};
