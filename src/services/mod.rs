pub mod safe;
pub mod tx;
pub mod tx_service;

pub use safe::{Safe, SafeFactory, SafeFactoryConfig};
pub use tx_service::TxService;
