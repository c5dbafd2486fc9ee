mod common;

use common::*;
use ethers_core::abi::Token;
use ethers_core::types::{Address, U256};
use safe_deployer::config::{ContractNetworkConfig, ContractNetworksConfig};
use safe_deployer::errors::AppError;
use safe_deployer::infrastructure::adapter::EthAdapter;
use safe_deployer::infrastructure::protocol::abi::{proxy_factory_abi, safe_singleton_abi};
use safe_deployer::models::{SafeAccountConfig, SafeDeploymentConfig, SafeVersion, TransactionOptions};
use safe_deployer::services::safe::{SafeFactory, SafeFactoryConfig};
use std::sync::Arc;
use std::sync::atomic::Ordering;

async fn factory_on(adapter: Arc<MockAdapter>) -> SafeFactory {
    SafeFactory::create(SafeFactoryConfig::new(adapter as Arc<dyn EthAdapter>))
        .await
        .unwrap()
}

fn two_of_two() -> SafeAccountConfig {
    SafeAccountConfig::new(vec![owner_a(), owner_b()], 2)
}

#[tokio::test]
async fn create_resolves_builtin_contracts() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter).await;

    assert_eq!(factory.get_safe_version(), SafeVersion::V1_3_0);
    assert_eq!(factory.get_address(), addr(FACTORY_V1_3_0));
    assert_eq!(
        factory.get_safe_contract().get_address(),
        addr(SINGLETON_L2_V1_3_0)
    );
}

#[tokio::test]
async fn l1_flag_selects_l1_singleton() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let mut config = SafeFactoryConfig::new(adapter);
    config.is_l1_safe_singleton = Some(true);
    let factory = SafeFactory::create(config).await.unwrap();

    assert_eq!(
        factory.get_safe_contract().get_address(),
        addr(SINGLETON_L1_V1_3_0)
    );
}

#[tokio::test]
async fn create_fails_when_singleton_is_not_deployed() {
    let adapter = Arc::new(MockAdapter::new(MAINNET).with_code(addr(FACTORY_V1_3_0)));
    let err = SafeFactory::create(SafeFactoryConfig::new(adapter.clone()))
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        AppError::ContractNotDeployed {
            contract: "Safe singleton",
            chain_id: MAINNET,
            ..
        }
    ));
    assert!(adapter.sent().is_empty());
}

#[tokio::test]
async fn create_fails_when_factory_is_not_deployed() {
    let adapter = Arc::new(MockAdapter::new(MAINNET).with_code(addr(SINGLETON_L2_V1_3_0)));
    let err = SafeFactory::create(SafeFactoryConfig::new(adapter.clone()))
        .await
        .err()
        .unwrap();

    match err {
        AppError::ContractNotDeployed { contract, address, .. } => {
            assert_eq!(contract, "SafeProxyFactory");
            assert_eq!(address, addr(FACTORY_V1_3_0));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(adapter.sent().is_empty());
}

#[tokio::test]
async fn unknown_network_without_overrides_is_unsupported() {
    let adapter = Arc::new(MockAdapter::new(LOCAL));
    let err = SafeFactory::create(SafeFactoryConfig::new(adapter))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, AppError::UnsupportedNetwork { chain_id: LOCAL, .. }));
}

#[tokio::test]
async fn network_overrides_take_precedence() {
    let singleton = Address::from_low_u64_be(0x5a1e);
    let proxy_factory = Address::from_low_u64_be(0xfac);
    let adapter = Arc::new(
        MockAdapter::new(LOCAL)
            .with_code(singleton)
            .with_code(proxy_factory),
    );
    let networks = ContractNetworksConfig::new().with_network(
        LOCAL,
        ContractNetworkConfig {
            safe_singleton_address: Some(format!("{:#x}", singleton)),
            safe_proxy_factory_address: Some(format!("{:#x}", proxy_factory)),
            ..Default::default()
        },
    );

    let mut config = SafeFactoryConfig::new(adapter.clone());
    config.contract_networks = Some(networks);
    let factory = SafeFactory::create(config).await.unwrap();

    assert_eq!(factory.get_address(), proxy_factory);
    assert_eq!(factory.get_safe_contract().get_address(), singleton);

    let safe = factory
        .deploy_safe(two_of_two(), Some(SafeDeploymentConfig::with_salt_nonce(7u64)), None)
        .await
        .unwrap();
    assert!(safe.is_deployed().await.unwrap());
    assert_eq!(adapter.sent()[0].to, proxy_factory);
}

#[tokio::test]
async fn deploy_two_of_two_with_explicit_salt() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter.clone()).await;

    let safe = factory
        .deploy_safe(two_of_two(), Some(SafeDeploymentConfig::with_salt_nonce(42u64)), None)
        .await
        .unwrap();

    // 提交的交易：createProxyWithNonce(singleton, setup(...), 42)
    let sent = adapter.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, addr(FACTORY_V1_3_0));
    assert_eq!(sent[0].options.from, Some(owner_a()));

    let create = proxy_factory_abi(SafeVersion::V1_3_0).unwrap();
    let args = create
        .function("createProxyWithNonce")
        .unwrap()
        .decode_input(&sent[0].data[4..])
        .unwrap();
    assert_eq!(args[0], Token::Address(addr(SINGLETON_L2_V1_3_0)));
    assert_eq!(args[2], Token::Uint(U256::from(42)));

    let initializer = args[1].clone().into_bytes().unwrap();
    let setup = safe_singleton_abi(SafeVersion::V1_3_0)
        .unwrap()
        .function("setup")
        .unwrap()
        .clone();
    assert_eq!(&initializer[..4], &setup.short_signature());
    let decoded = setup.decode_input(&initializer[4..]).unwrap();
    assert_eq!(
        decoded,
        vec![
            Token::Array(vec![Token::Address(owner_a()), Token::Address(owner_b())]),
            Token::Uint(U256::from(2)),
            Token::Address(Address::zero()),
            Token::Bytes(vec![]),
            Token::Address(Address::zero()),
            Token::Address(Address::zero()),
            Token::Uint(U256::zero()),
            Token::Address(Address::zero()),
        ]
    );

    // 返回的句柄指向有代码的地址，并能回读 owners / threshold
    assert!(safe.is_deployed().await.unwrap());
    assert_eq!(safe.get_chain_id(), MAINNET);
    assert_eq!(safe.get_owners().await.unwrap(), vec![owner_a(), owner_b()]);
    assert_eq!(safe.get_threshold().await.unwrap(), U256::from(2));
}

#[tokio::test]
async fn predicted_address_matches_deployment() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter).await;
    let deployment = SafeDeploymentConfig::with_salt_nonce(42u64);

    let predicted = factory
        .predict_safe_address(&two_of_two(), &deployment)
        .await
        .unwrap();
    let again = factory
        .predict_safe_address(&two_of_two(), &deployment)
        .await
        .unwrap();
    let other_salt = factory
        .predict_safe_address(&two_of_two(), &SafeDeploymentConfig::with_salt_nonce(43u64))
        .await
        .unwrap();
    assert_eq!(predicted, again);
    assert_ne!(predicted, other_salt);

    let safe = factory
        .deploy_safe(two_of_two(), Some(deployment), None)
        .await
        .unwrap();
    assert_eq!(safe.get_address(), predicted);
}

#[tokio::test]
async fn predict_requires_explicit_salt() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter).await;
    let err = factory
        .predict_safe_address(&two_of_two(), &SafeDeploymentConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn missing_code_after_submission_fails_verification() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0().without_proxy_code());
    let factory = factory_on(adapter.clone()).await;

    let err = factory
        .deploy_safe(two_of_two(), Some(SafeDeploymentConfig::with_salt_nonce(42u64)), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DeploymentVerificationFailed(_)));
    // 交易本身已提交，调用方仍可通过适配器查到
    assert_eq!(adapter.sent().len(), 1);
}

#[tokio::test]
async fn conflicting_gas_options_never_submit() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter.clone()).await;

    let options = TransactionOptions {
        gas: Some(U256::from(500_000)),
        gas_limit: Some(U256::from(500_000)),
        ..Default::default()
    };
    let err = factory
        .deploy_safe(two_of_two(), None, Some(options))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConflictingGasOptions));
    assert!(adapter.sent().is_empty());
}

#[tokio::test]
async fn invalid_config_fails_before_network() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter.clone()).await;

    let cases = vec![
        SafeAccountConfig::new(vec![], 1),
        SafeAccountConfig::new(vec![owner_a(), owner_b()], 3),
        SafeAccountConfig::new(vec![owner_a(), owner_b()], 0),
        SafeAccountConfig::new(vec![owner_a(), owner_a()], 1),
        SafeAccountConfig::new(vec![owner_a(), Address::zero()], 1),
    ];
    for cfg in cases {
        let err = factory.deploy_safe(cfg, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)));
    }
    assert_eq!(adapter.signer_queries.load(Ordering::SeqCst), 0);
    assert!(adapter.sent().is_empty());
}

#[tokio::test]
async fn explicit_sender_and_gas_are_forwarded() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter.clone()).await;

    let options = TransactionOptions {
        from: Some(owner_b()),
        gas_limit: Some(U256::from(400_000)),
        ..Default::default()
    };
    factory
        .deploy_safe(two_of_two(), None, Some(options))
        .await
        .unwrap();

    let sent = adapter.sent();
    assert_eq!(sent[0].options.from, Some(owner_b()));
    assert_eq!(sent[0].options.gas_limit, Some(U256::from(400_000)));
}

#[tokio::test]
async fn concurrent_deploys_are_independent() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = Arc::new(factory_on(adapter.clone()).await);

    let f1 = factory.clone();
    let f2 = factory.clone();
    let (a, b) = tokio::join!(
        async move {
            f1.deploy_safe(two_of_two(), Some(SafeDeploymentConfig::with_salt_nonce(1u64)), None)
                .await
        },
        async move {
            f2.deploy_safe(two_of_two(), Some(SafeDeploymentConfig::with_salt_nonce(2u64)), None)
                .await
        },
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.get_address(), b.get_address());
    assert_eq!(adapter.sent().len(), 2);
}

#[tokio::test]
async fn chain_id_is_queried_live() {
    let adapter = Arc::new(MockAdapter::mainnet_v1_3_0());
    let factory = factory_on(adapter.clone()).await;

    assert_eq!(factory.get_chain_id().await.unwrap(), MAINNET);
    adapter.set_chain_id(10);
    assert_eq!(factory.get_chain_id().await.unwrap(), 10);
}

#[tokio::test]
async fn legacy_version_without_fallback_handler() {
    // 1.0.0 只在早期网络上有内置记录，这里用自定义地址
    let singleton = Address::from_low_u64_be(0x100);
    let proxy_factory = Address::from_low_u64_be(0x200);
    let adapter = Arc::new(
        MockAdapter::new(LOCAL)
            .with_version(SafeVersion::V1_0_0)
            .with_code(singleton)
            .with_code(proxy_factory),
    );
    let mut config = SafeFactoryConfig::new(adapter.clone());
    config.safe_version = Some(SafeVersion::V1_0_0);
    config.contract_networks = Some(ContractNetworksConfig::new().with_network(
        LOCAL,
        ContractNetworkConfig {
            safe_singleton_address: Some(format!("{:#x}", singleton)),
            safe_proxy_factory_address: Some(format!("{:#x}", proxy_factory)),
            ..Default::default()
        },
    ));
    let factory = SafeFactory::create(config).await.unwrap();

    let with_handler = two_of_two().with_fallback_handler(Address::from_low_u64_be(0xf));
    assert!(matches!(
        factory.deploy_safe(with_handler, None, None).await,
        Err(AppError::InvalidConfiguration(_))
    ));

    let safe = factory
        .deploy_safe(two_of_two(), Some(SafeDeploymentConfig::with_salt_nonce(5u64)), None)
        .await
        .unwrap();
    assert_eq!(safe.get_version(), SafeVersion::V1_0_0);
    assert_eq!(safe.get_owners().await.unwrap(), vec![owner_a(), owner_b()]);
}

#[tokio::test]
async fn indexed_proxy_creation_event_is_parsed() {
    let singleton = Address::from_low_u64_be(0x141);
    let proxy_factory = Address::from_low_u64_be(0x142);
    let adapter = Arc::new(
        MockAdapter::new(LOCAL)
            .with_version(SafeVersion::V1_4_1)
            .with_code(singleton)
            .with_code(proxy_factory),
    );
    let mut config = SafeFactoryConfig::new(adapter.clone());
    config.safe_version = Some(SafeVersion::V1_4_1);
    config.contract_networks = Some(ContractNetworksConfig::new().with_network(
        LOCAL,
        ContractNetworkConfig {
            safe_singleton_address: Some(format!("{:#x}", singleton)),
            safe_proxy_factory_address: Some(format!("{:#x}", proxy_factory)),
            ..Default::default()
        },
    ));
    let factory = SafeFactory::create(config).await.unwrap();
    let deployment = SafeDeploymentConfig::with_salt_nonce(9u64);

    let predicted = factory
        .predict_safe_address(&two_of_two(), &deployment)
        .await
        .unwrap();
    let safe = factory
        .deploy_safe(two_of_two(), Some(deployment), None)
        .await
        .unwrap();
    assert_eq!(safe.get_address(), predicted);
    assert_eq!(safe.get_threshold().await.unwrap(), U256::from(2));
}
