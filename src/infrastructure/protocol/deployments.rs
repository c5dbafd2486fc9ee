//! 内置部署表：协议版本 + 链 ID → 单例 / 代理工厂的规范地址
//!
//! 地址来自 Safe 官方 singleton factory 部署，在所列网络上一致。
//! 表里没有的网络需要通过 `contract_networks` 配置覆盖。
use crate::models::SafeVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeDeployment {
    pub contract_name: &'static str,
    pub version: SafeVersion,
    pub default_address: &'static str,
}

// 1.0.0 只部署在少量早期网络
const NETWORKS_V1_0_0: &[u64] = &[1, 4, 5, 42, 100];

const NETWORKS_V1_1_1: &[u64] = &[1, 4, 5, 10, 42, 56, 100, 137, 246, 42161, 43114];

const NETWORKS_V1_3_0: &[u64] = &[
    1, 5, 10, 56, 100, 137, 1101, 8453, 17000, 42161, 43114, 59144, 84532, 11155111,
];

const NETWORKS_V1_4_1: &[u64] = &[1, 10, 56, 100, 137, 8453, 42161, 43114, 84532, 11155111];

fn networks(version: SafeVersion) -> &'static [u64] {
    match version {
        SafeVersion::V1_0_0 => NETWORKS_V1_0_0,
        SafeVersion::V1_1_1 | SafeVersion::V1_2_0 => NETWORKS_V1_1_1,
        SafeVersion::V1_3_0 => NETWORKS_V1_3_0,
        SafeVersion::V1_4_1 => NETWORKS_V1_4_1,
    }
}

pub fn is_network_supported(version: SafeVersion, chain_id: u64) -> bool {
    networks(version).contains(&chain_id)
}

/// `is_l1_safe_singleton` 为 false 且版本 >= 1.3.0 时返回 L2 单例
pub fn get_safe_singleton_deployment(
    version: SafeVersion,
    chain_id: u64,
    is_l1_safe_singleton: bool,
) -> Option<SafeDeployment> {
    if !is_network_supported(version, chain_id) {
        return None;
    }
    let use_l2 = version.has_l2_singleton() && !is_l1_safe_singleton;
    let (contract_name, default_address) = match (version, use_l2) {
        (SafeVersion::V1_0_0, _) => ("GnosisSafe", "0xb6029EA3B2c51D09a50B53CA8012FeEB05bDa35A"),
        (SafeVersion::V1_1_1, _) => ("GnosisSafe", "0x34CfAC646f301356fAa8B21e94227e3583Fe3F5F"),
        (SafeVersion::V1_2_0, _) => ("GnosisSafe", "0x6851D6fDFAfD08c0295C392436245E5bc78B0185"),
        (SafeVersion::V1_3_0, false) => {
            ("GnosisSafe", "0xd9Db270c1B5E3Bd161E8c8503c55cEABeE709552")
        }
        (SafeVersion::V1_3_0, true) => {
            ("GnosisSafeL2", "0x3E5c63644E683549055b9Be8653de26E0B4CD36E")
        }
        (SafeVersion::V1_4_1, false) => ("Safe", "0x41675C099F32341bf84BFc5382aF534df5C7461a"),
        (SafeVersion::V1_4_1, true) => ("SafeL2", "0x29fcB43b46531BcA003ddC8FCB67FFE91900C762"),
    };
    Some(SafeDeployment {
        contract_name,
        version,
        default_address,
    })
}

pub fn get_proxy_factory_deployment(version: SafeVersion, chain_id: u64) -> Option<SafeDeployment> {
    if !is_network_supported(version, chain_id) {
        return None;
    }
    let (contract_name, default_address) = match version {
        SafeVersion::V1_0_0 => ("ProxyFactory", "0x12302fE9c02ff50939BaAaaf415fc226C078613C"),
        // 1.2.0 沿用 1.1.1 的工厂
        SafeVersion::V1_1_1 | SafeVersion::V1_2_0 => {
            ("ProxyFactory", "0x76E2cFc1F5Fa8F6a5b3fC4c8F4788F0116861F9B")
        }
        SafeVersion::V1_3_0 => ("ProxyFactory", "0xa6B71E26C5e0845f74c812102Ca7114b6a896AB2"),
        SafeVersion::V1_4_1 => ("SafeProxyFactory", "0x4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67"),
    };
    Some(SafeDeployment {
        contract_name,
        version,
        default_address,
    })
}
