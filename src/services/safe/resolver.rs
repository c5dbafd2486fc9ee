use crate::config::ContractNetworksConfig;
use crate::errors::error::AppError;
use crate::infrastructure::adapter::EthAdapter;
use crate::infrastructure::protocol::deployments::{
    get_proxy_factory_deployment, get_safe_singleton_deployment,
};
use crate::infrastructure::protocol::{SafeContract, SafeProxyFactoryContract};
use crate::log_info;
use crate::models::SafeVersion;
use crate::utils::parse_optional_address;
use ethers_core::types::Address;

/// 查询链上代码，没有代码直接失败（不重试）
async fn ensure_deployed(
    adapter: &dyn EthAdapter,
    contract: &'static str,
    address: Address,
    chain_id: u64,
) -> Result<(), AppError> {
    if !adapter.is_contract_deployed(address).await? {
        return Err(AppError::ContractNotDeployed {
            contract,
            address,
            chain_id,
        });
    }
    Ok(())
}

pub async fn resolve_safe_contract(
    adapter: &dyn EthAdapter,
    version: SafeVersion,
    chain_id: u64,
    is_l1_safe_singleton: bool,
    contract_networks: Option<&ContractNetworksConfig>,
) -> Result<SafeContract, AppError> {
    let deployment = get_safe_singleton_deployment(version, chain_id, is_l1_safe_singleton);
    let custom = contract_networks.and_then(|n| n.get(chain_id));
    let custom_address =
        parse_optional_address(custom.and_then(|c| c.safe_singleton_address.as_deref()))?;
    let custom_abi = custom.and_then(|c| c.safe_singleton_abi.as_deref());

    let contract = adapter
        .get_safe_contract(
            version,
            chain_id,
            deployment.as_ref(),
            custom_address,
            custom_abi,
        )
        .await?;
    ensure_deployed(adapter, "Safe singleton", contract.get_address(), chain_id).await?;

    log_info!(
        "Safe {} 单例已解析: {:#x} ({})",
        version,
        contract.get_address(),
        if custom_address.is_some() {
            "custom"
        } else {
            deployment.map(|d| d.contract_name).unwrap_or("custom")
        }
    );
    Ok(contract)
}

pub async fn resolve_proxy_factory_contract(
    adapter: &dyn EthAdapter,
    version: SafeVersion,
    chain_id: u64,
    contract_networks: Option<&ContractNetworksConfig>,
) -> Result<SafeProxyFactoryContract, AppError> {
    let deployment = get_proxy_factory_deployment(version, chain_id);
    let custom = contract_networks.and_then(|n| n.get(chain_id));
    let custom_address =
        parse_optional_address(custom.and_then(|c| c.safe_proxy_factory_address.as_deref()))?;
    let custom_abi = custom.and_then(|c| c.safe_proxy_factory_abi.as_deref());

    let contract = adapter
        .get_safe_proxy_factory_contract(
            version,
            chain_id,
            deployment.as_ref(),
            custom_address,
            custom_abi,
        )
        .await?;
    ensure_deployed(adapter, "SafeProxyFactory", contract.get_address(), chain_id).await?;

    log_info!(
        "Safe {} 代理工厂已解析: {:#x}",
        version,
        contract.get_address()
    );
    Ok(contract)
}
