pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use errors::{AppError, Result};
pub use infrastructure::adapter::{EthAdapter, EthersAdapter};
pub use models::{SafeAccountConfig, SafeDeploymentConfig, SafeVersion, TransactionOptions};
pub use services::safe::{Safe, SafeFactory, SafeFactoryConfig};
