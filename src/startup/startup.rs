use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::errors::error::AppError;
use crate::infrastructure::adapter::{EthAdapter, EthersAdapter};
use crate::infrastructure::provider::{EthereumProvider, ProviderTrait, RetryAdapter};
use crate::services::safe::{SafeFactory, SafeFactoryConfig};
use crate::services::tx::gas::GasService;
use crate::services::tx::nonce::NonceService;
use crate::services::tx::signer::{LocalSigner, TxSigner};
use crate::services::tx::simulation::SimulationService;
use crate::services::tx_service::TxService;
use crate::utils::u256_to_u64;
use crate::{log_info, log_warn};

const PRIVATE_KEY: &str = "PRIVATE_KEY";

/// 应用实例：持有已初始化的 SafeFactory 和部署请求
pub struct Application {
    pub config: Config,
    pub factory: Arc<SafeFactory>,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl Application {
    /// 构建 Provider → 签名器 → 交易流水线 → 链适配器 → SafeFactory
    pub async fn build(config: Config) -> Result<Self> {
        let eth_provider = Arc::new(EthereumProvider::new(&config.ethereum)?);
        let provider = Arc::new(RetryAdapter::new(
            eth_provider,
            config.ethereum.max_retries,
            Duration::from_secs(config.ethereum.base_delay_secs),
        )) as Arc<dyn ProviderTrait>;

        let chain_id = u256_to_u64(provider.get_chain_id().await?)?;
        if let Some(expected) = config.ethereum.chain_id {
            if expected != chain_id {
                log_warn!(
                    "配置的 chain_id={} 与节点返回的 {} 不一致，以节点为准",
                    expected,
                    chain_id
                );
            }
        }

        let key = std::env::var(PRIVATE_KEY)
            .map_err(|_| AppError::Config(format!("环境变量 {} 未设置", PRIVATE_KEY)))?;
        let signer = Arc::new(LocalSigner::from_private_key(&key, chain_id)?) as Arc<dyn TxSigner>;
        log_info!("签名地址: {:#x}", signer.address());

        let nonce_svc = Arc::new(NonceService::new(&*provider, signer.address()).await?);
        let tx_service = Arc::new(TxService::new(
            signer,
            nonce_svc,
            Arc::new(GasService::default()),
            Arc::new(SimulationService::new()),
            provider.clone(),
        ));
        let adapter =
            Arc::new(EthersAdapter::new(provider, tx_service, config.tx.clone())) as Arc<dyn EthAdapter>;

        let factory = SafeFactory::create(SafeFactoryConfig {
            eth_adapter: adapter,
            safe_version: config.safe.version,
            is_l1_safe_singleton: config.safe.is_l1_safe_singleton,
            contract_networks: Some(config.safe.contract_networks.clone()),
        })
        .await?;

        Ok(Self {
            config,
            factory: Arc::new(factory),
        })
    }

    /// 按配置部署一个 Safe，并回读 owners / threshold
    pub async fn run(self) -> anyhow::Result<()> {
        let request = &self.config.deployment;
        let account_config = request.to_account_config()?;
        let deployment_config = request.to_deployment_config()?;

        if request.predict_address {
            let predicted = self
                .factory
                .predict_safe_address(&account_config, &deployment_config)
                .await?;
            log_info!("预测 Safe 地址: {:#x}", predicted);
        }

        let safe = self
            .factory
            .deploy_safe(account_config, Some(deployment_config), None)
            .await?;

        let owners = safe.get_owners().await?;
        let threshold = safe.get_threshold().await?;
        log_info!(
            "Safe {:#x} (v{}, chain {}) owners={:?}, threshold={}",
            safe.get_address(),
            safe.get_version(),
            safe.get_chain_id(),
            owners,
            threshold
        );
        Ok(())
    }
}
