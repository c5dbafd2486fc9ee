use ethers_core::types::{Address, Bytes, U256};
use rand::Rng;

/// Safe 账户初始化配置，可选字段在编码前通过 `with_defaults` 填充
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeAccountConfig {
    pub owners: Vec<Address>,
    pub threshold: u64,
    /// delegate call 目标合约，默认零地址
    pub to: Option<Address>,
    /// delegate call 数据，默认空
    pub data: Option<Bytes>,
    /// 默认零地址
    pub fallback_handler: Option<Address>,
    /// 部署费用支付代币，零地址表示 ETH
    pub payment_token: Option<Address>,
    pub payment: Option<U256>,
    pub payment_receiver: Option<Address>,
}

/// `setup` 调用的完整参数（所有默认值已填充）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupParams {
    pub owners: Vec<Address>,
    pub threshold: U256,
    pub to: Address,
    pub data: Bytes,
    pub fallback_handler: Address,
    pub payment_token: Address,
    pub payment: U256,
    pub payment_receiver: Address,
}

impl SafeAccountConfig {
    pub fn new(owners: Vec<Address>, threshold: u64) -> Self {
        Self {
            owners,
            threshold,
            ..Default::default()
        }
    }

    pub fn with_fallback_handler(mut self, handler: Address) -> Self {
        self.fallback_handler = Some(handler);
        self
    }

    pub fn with_delegate_call(mut self, to: Address, data: Bytes) -> Self {
        self.to = Some(to);
        self.data = Some(data);
        self
    }

    pub fn with_payment(mut self, token: Address, payment: U256, receiver: Address) -> Self {
        self.payment_token = Some(token);
        self.payment = Some(payment);
        self.payment_receiver = Some(receiver);
        self
    }

    pub fn with_defaults(&self) -> SetupParams {
        SetupParams {
            owners: self.owners.clone(),
            threshold: U256::from(self.threshold),
            to: self.to.unwrap_or_else(Address::zero),
            data: self.data.clone().unwrap_or_default(),
            fallback_handler: self.fallback_handler.unwrap_or_else(Address::zero),
            payment_token: self.payment_token.unwrap_or_else(Address::zero),
            payment: self.payment.unwrap_or_default(),
            payment_receiver: self.payment_receiver.unwrap_or_else(Address::zero),
        }
    }
}

/// 部署参数：salt nonce 决定最终代理地址
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeDeploymentConfig {
    pub salt_nonce: Option<U256>,
}

impl SafeDeploymentConfig {
    pub fn with_salt_nonce(salt_nonce: impl Into<U256>) -> Self {
        Self {
            salt_nonce: Some(salt_nonce.into()),
        }
    }

    /// 未指定时使用 “当前毫秒时间 * 1000 + 随机数”，只能降低碰撞概率，
    /// 需要可复现地址的调用方必须显式传入 salt
    pub fn salt_nonce_or_default(&self) -> U256 {
        self.salt_nonce.unwrap_or_else(default_salt_nonce)
    }
}

pub fn default_salt_nonce() -> U256 {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let jitter = rand::thread_rng().gen_range(0..1000u64);
    U256::from(millis) * U256::from(1000u64) + U256::from(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let owner = Address::from_low_u64_be(0xa);
        let params = SafeAccountConfig::new(vec![owner], 1).with_defaults();
        assert_eq!(params.owners, vec![owner]);
        assert_eq!(params.threshold, U256::one());
        assert_eq!(params.to, Address::zero());
        assert!(params.data.is_empty());
        assert_eq!(params.fallback_handler, Address::zero());
        assert_eq!(params.payment_token, Address::zero());
        assert_eq!(params.payment, U256::zero());
        assert_eq!(params.payment_receiver, Address::zero());
    }

    #[test]
    fn explicit_salt_is_kept() {
        let cfg = SafeDeploymentConfig::with_salt_nonce(42u64);
        assert_eq!(cfg.salt_nonce_or_default(), U256::from(42));
    }

    #[test]
    fn default_salt_tracks_wall_clock() {
        let before = chrono::Utc::now().timestamp_millis() as u64;
        let salt = SafeDeploymentConfig::default().salt_nonce_or_default();
        assert!(salt >= U256::from(before) * U256::from(1000u64));
    }
}
