//! EIP-137 name hashing.

use alloy_primitives::{keccak256, B256};

/// Namehash of a dot-separated ENS name. The empty name hashes to zero;
/// labels fold right-to-left. The name is lowercased first so differently
/// cased spellings of the same name resolve to the same node.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    let name = name.to_lowercase();
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        node = keccak256(buf);
    }
    node
}
