//! SafeProxyFactory 的 CREATE2 地址推导
//!
//! salt    = keccak256(keccak256(initializer) ‖ uint256(saltNonce))
//! address = keccak256(0xff ‖ factory ‖ salt ‖ keccak256(creationCode ‖ uint256(singleton)))[12..]
use crate::utils::{address_to_word, u256_to_word};
use ethers_core::types::{Address, U256};
use ethers_core::utils::{get_create2_address_from_hash, keccak256};

pub fn proxy_salt(initializer: &[u8], salt_nonce: U256) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(64);
    preimage.extend_from_slice(&keccak256(initializer));
    preimage.extend_from_slice(&u256_to_word(salt_nonce));
    keccak256(preimage)
}

pub fn proxy_init_code_hash(proxy_creation_code: &[u8], singleton: Address) -> [u8; 32] {
    let mut init_code = Vec::with_capacity(proxy_creation_code.len() + 32);
    init_code.extend_from_slice(proxy_creation_code);
    init_code.extend_from_slice(&address_to_word(singleton));
    keccak256(init_code)
}

pub fn calculate_proxy_address(
    factory: Address,
    singleton: Address,
    initializer: &[u8],
    salt_nonce: U256,
    proxy_creation_code: &[u8],
) -> Address {
    get_create2_address_from_hash(
        factory,
        proxy_salt(initializer, salt_nonce),
        proxy_init_code_hash(proxy_creation_code, singleton),
    )
}
