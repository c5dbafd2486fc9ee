pub mod account;
pub mod factory;
pub mod resolver;
pub mod salt;
pub mod validator;

pub use account::Safe;
pub use factory::{SafeFactory, SafeFactoryConfig};
pub use salt::calculate_proxy_address;
pub use validator::validate_safe_account_config;
