#![allow(dead_code)]

use async_trait::async_trait;
use ethers_core::abi::{Token, encode};
use ethers_core::types::{Address, Bytes, H256, Log, TransactionReceipt, U64, U256};
use safe_deployer::errors::AppError;
use safe_deployer::infrastructure::adapter::EthAdapter;
use safe_deployer::infrastructure::protocol::abi::{proxy_factory_abi, safe_singleton_abi};
use safe_deployer::models::{SafeVersion, TransactionOptions};
use safe_deployer::services::safe::calculate_proxy_address;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub const MAINNET: u64 = 1;
pub const LOCAL: u64 = 31337;

pub const SINGLETON_L2_V1_3_0: &str = "0x3E5c63644E683549055b9Be8653de26E0B4CD36E";
pub const SINGLETON_L1_V1_3_0: &str = "0xd9Db270c1B5E3Bd161E8c8503c55cEABeE709552";
pub const FACTORY_V1_3_0: &str = "0xa6B71E26C5e0845f74c812102Ca7114b6a896AB2";

pub const PROXY_CREATION_CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52, 0x34, 0x80, 0x15];

pub fn addr(s: &str) -> Address {
    Address::from_str(s).unwrap()
}

pub fn owner_a() -> Address {
    addr("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
}

pub fn owner_b() -> Address {
    addr("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
}

#[derive(Debug, Clone)]
pub struct SentTx {
    pub to: Address,
    pub data: Bytes,
    pub options: TransactionOptions,
}

/// 内存链：记录交易，按 SafeProxyFactory 的 CREATE2 规则“部署”代理
pub struct MockAdapter {
    chain_id: AtomicU64,
    signer: Address,
    version: SafeVersion,
    code: Mutex<HashSet<Address>>,
    // proxy → (owners, threshold)，供 getOwners / getThreshold 回读
    safes: Mutex<HashMap<Address, (Vec<Address>, U256)>>,
    pub sent: Mutex<Vec<SentTx>>,
    pub signer_queries: AtomicUsize,
    deploy_code: bool,
}

impl MockAdapter {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: AtomicU64::new(chain_id),
            signer: owner_a(),
            version: SafeVersion::V1_3_0,
            code: Mutex::new(HashSet::new()),
            safes: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            signer_queries: AtomicUsize::new(0),
            deploy_code: true,
        }
    }

    /// 主网 1.3.0 规范地址都已部署
    pub fn mainnet_v1_3_0() -> Self {
        Self::new(MAINNET)
            .with_code(addr(SINGLETON_L2_V1_3_0))
            .with_code(addr(SINGLETON_L1_V1_3_0))
            .with_code(addr(FACTORY_V1_3_0))
    }

    pub fn with_code(self, address: Address) -> Self {
        self.code.lock().unwrap().insert(address);
        self
    }

    pub fn with_version(mut self, version: SafeVersion) -> Self {
        self.version = version;
        self
    }

    /// 交易成功但代理地址上不出现代码
    pub fn without_proxy_code(mut self) -> Self {
        self.deploy_code = false;
        self
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.chain_id.store(chain_id, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.lock().unwrap().clone()
    }

    fn deploy_proxy(&self, factory: Address, data: &[u8]) -> Result<(Address, Address), AppError> {
        let abi = proxy_factory_abi(self.version)?;
        let inputs = abi.function("createProxyWithNonce")?.decode_input(&data[4..])?;
        let singleton = inputs[0].clone().into_address().unwrap();
        let initializer = inputs[1].clone().into_bytes().unwrap();
        let salt = inputs[2].clone().into_uint().unwrap();

        let proxy =
            calculate_proxy_address(factory, singleton, &initializer, salt, PROXY_CREATION_CODE);

        let setup = safe_singleton_abi(self.version)?
            .function("setup")?
            .decode_input(&initializer[4..])?;
        let owners = setup[0]
            .clone()
            .into_array()
            .unwrap()
            .into_iter()
            .map(|t| t.into_address().unwrap())
            .collect();
        let threshold = setup[1].clone().into_uint().unwrap();
        self.safes.lock().unwrap().insert(proxy, (owners, threshold));

        if self.deploy_code {
            self.code.lock().unwrap().insert(proxy);
        }
        Ok((proxy, singleton))
    }

    fn proxy_creation_log(&self, factory: Address, proxy: Address, singleton: Address) -> Log {
        let event = proxy_factory_abi(self.version)
            .unwrap()
            .event("ProxyCreation")
            .unwrap()
            .clone();
        let (topics, data) = match self.version {
            SafeVersion::V1_4_1 => (
                vec![event.signature(), H256::from(proxy)],
                encode(&[Token::Address(singleton)]),
            ),
            SafeVersion::V1_3_0 => (
                vec![event.signature()],
                encode(&[Token::Address(proxy), Token::Address(singleton)]),
            ),
            _ => (vec![event.signature()], encode(&[Token::Address(proxy)])),
        };
        Log {
            address: factory,
            topics,
            data: data.into(),
            ..Default::default()
        }
    }
}

fn selector(abi_fn: &ethers_core::abi::Function) -> [u8; 4] {
    abi_fn.short_signature()
}

#[async_trait]
impl EthAdapter for MockAdapter {
    async fn get_chain_id(&self) -> Result<u64, AppError> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    async fn get_signer_address(&self) -> Result<Address, AppError> {
        self.signer_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.signer)
    }

    async fn is_contract_deployed(&self, address: Address) -> Result<bool, AppError> {
        Ok(self.code.lock().unwrap().contains(&address))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, AppError> {
        let factory_abi = proxy_factory_abi(self.version)?;
        let safe_abi = safe_singleton_abi(self.version)?;
        let sel = &data[..4];

        if sel == selector(factory_abi.function("proxyCreationCode")?) {
            return Ok(encode(&[Token::Bytes(PROXY_CREATION_CODE.to_vec())]).into());
        }

        let safes = self.safes.lock().unwrap();
        let (owners, threshold) = safes
            .get(&to)
            .ok_or_else(|| AppError::ProviderError(format!("no contract at {:#x}", to)))?;
        if sel == selector(safe_abi.function("getOwners")?) {
            let tokens = owners.iter().copied().map(Token::Address).collect();
            return Ok(encode(&[Token::Array(tokens)]).into());
        }
        if sel == selector(safe_abi.function("getThreshold")?) {
            return Ok(encode(&[Token::Uint(*threshold)]).into());
        }
        if sel == selector(safe_abi.function("nonce")?) {
            return Ok(encode(&[Token::Uint(U256::zero())]).into());
        }
        Err(AppError::ProviderError("execution reverted".to_string()))
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        options: TransactionOptions,
    ) -> Result<TransactionReceipt, AppError> {
        let tx_index = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(SentTx {
                to,
                data: data.clone(),
                options,
            });
            sent.len() as u64
        };
        let (proxy, singleton) = self.deploy_proxy(to, &data)?;
        Ok(TransactionReceipt {
            transaction_hash: H256::from_low_u64_be(tx_index),
            block_number: Some(U64::from(1)),
            status: Some(U64::from(1)),
            logs: vec![self.proxy_creation_log(to, proxy, singleton)],
            ..Default::default()
        })
    }
}
