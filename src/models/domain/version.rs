use crate::errors::error::AppError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Safe 合约协议版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SafeVersion {
    V1_0_0,
    V1_1_1,
    V1_2_0,
    #[default]
    V1_3_0,
    V1_4_1,
}

impl SafeVersion {
    pub const ALL: [SafeVersion; 5] = [
        SafeVersion::V1_0_0,
        SafeVersion::V1_1_1,
        SafeVersion::V1_2_0,
        SafeVersion::V1_3_0,
        SafeVersion::V1_4_1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SafeVersion::V1_0_0 => "1.0.0",
            SafeVersion::V1_1_1 => "1.1.1",
            SafeVersion::V1_2_0 => "1.2.0",
            SafeVersion::V1_3_0 => "1.3.0",
            SafeVersion::V1_4_1 => "1.4.1",
        }
    }

    /// 1.3.0 起才区分 L1 / L2 单例
    pub fn has_l2_singleton(&self) -> bool {
        *self >= SafeVersion::V1_3_0
    }

    /// 1.0.0 的 setup 没有 fallbackHandler 参数
    pub fn supports_fallback_handler(&self) -> bool {
        *self >= SafeVersion::V1_1_1
    }
}

impl fmt::Display for SafeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafeVersion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('v');
        SafeVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| AppError::invalid_config(format!("unsupported Safe version: {}", s)))
    }
}

impl Serialize for SafeVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SafeVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
