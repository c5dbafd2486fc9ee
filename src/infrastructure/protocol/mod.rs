pub mod abi;
pub mod deployments;
pub mod proxy_factory_contract;
pub mod safe_contract;

pub use deployments::SafeDeployment;
pub use proxy_factory_contract::{CreateProxyProps, SafeProxyFactoryContract};
pub use safe_contract::SafeContract;
