pub mod gas;
pub mod nonce;
pub mod signer;
pub mod simulation;
pub mod types;

pub use types::{TxContext, TxOptions, TxResult};
