pub mod safe_config;
pub mod transaction_options;
pub mod version;

pub use safe_config::{SafeAccountConfig, SafeDeploymentConfig, SetupParams, default_salt_nonce};
pub use transaction_options::TransactionOptions;
pub use version::SafeVersion;
