pub mod adapter;
pub mod protocol;
pub mod provider;
