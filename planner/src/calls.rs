//! Sub-call model, MultiSend batch packing, and the self-authorizing
//! `execTransaction` wrapper.
//!
//! The packed batch layout is the MultiSend wire format and must match the
//! deployed contract bit-for-bit:
//!
//! - u8 operation (0 call, 1 delegatecall)
//! - 20-byte target
//! - 32-byte value
//! - 32-byte data length
//! - data bytes
//!
//! entries concatenated in caller order with no separators. The packer never
//! reorders, deduplicates, or merges; ordering is the caller's contract.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;

use crate::error::DecodeError;
use crate::interfaces::{execTransactionCall, multiSendCall};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum CallKind {
    Call = 0,
    DelegateCall = 1,
}

impl From<CallKind> for u8 {
    fn from(kind: CallKind) -> u8 {
        kind as u8
    }
}

/// One on-chain sub-call. Immutable once constructed; composed into ordered
/// batches by the packer and into the top-level proposal by the assembler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetaCall {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: CallKind,
}

impl MetaCall {
    /// Zero-value normal call.
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data: data.into(),
            operation: CallKind::Call,
        }
    }
}

/// Serialize an ordered sequence of calls into one packed MultiSend blob.
pub fn encode_multi_send(calls: &[MetaCall]) -> Bytes {
    let mut buf = Vec::new();
    for call in calls {
        buf.push(call.operation as u8);
        buf.extend_from_slice(call.to.as_slice());
        buf.extend_from_slice(&call.value.to_be_bytes::<32>());
        buf.extend_from_slice(&U256::from(call.data.len()).to_be_bytes::<32>());
        buf.extend_from_slice(&call.data);
    }
    buf.into()
}

/// Parse a packed MultiSend blob back into its calls.
///
/// Strict inverse of [`encode_multi_send`]; rejects truncated entries and
/// unknown operation bytes. Used by tests and by the assembler's
/// prediction cross-checks.
pub fn decode_multi_send(bytes: &[u8]) -> Result<Vec<MetaCall>, DecodeError> {
    let mut calls = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let operation = match read_u8(bytes, &mut i)? {
            0 => CallKind::Call,
            1 => CallKind::DelegateCall,
            other => return Err(DecodeError::UnknownCallKind(other)),
        };
        let to = read_address(bytes, &mut i)?;
        let value = read_u256(bytes, &mut i)?;
        let len = read_u256(bytes, &mut i)?;
        let len = usize::try_from(len).map_err(|_| DecodeError::LengthOverflow)?;
        let data = read_vec(bytes, &mut i, len)?;

        calls.push(MetaCall {
            to,
            value,
            data: data.into(),
            operation,
        });
    }

    Ok(calls)
}

/// Wrap a batch as a single `multiSend(bytes)` sub-call against the batch
/// executor. Delegated when the batch must run in the caller's own
/// storage/authorization context; this is what makes nesting possible.
pub fn multi_send_call(executor: Address, delegate: bool, calls: &[MetaCall]) -> MetaCall {
    let data = multiSendCall {
        transactions: encode_multi_send(calls),
    }
    .abi_encode();

    MetaCall {
        to: executor,
        value: U256::ZERO,
        data: data.into(),
        operation: if delegate {
            CallKind::DelegateCall
        } else {
            CallKind::Call
        },
    }
}

/// Safe "pre-validated" signature blob: the owner address padded to 32 bytes,
/// 32 zero bytes, then a `0x01` signature type. The Safe accepts it without
/// any cryptographic check when `msg.sender` equals the encoded owner, which
/// is exactly the situation the batch executor is in while it is the sole
/// transient owner.
pub fn pre_approved_signature(owner: Address) -> Bytes {
    let mut sig = Vec::with_capacity(65);
    let mut owner_word = [0u8; 32];
    owner_word[12..].copy_from_slice(owner.as_slice());
    sig.extend_from_slice(&owner_word);
    sig.extend_from_slice(&[0u8; 32]);
    sig.push(1);
    sig.into()
}

/// Call a Safe's own `execTransaction` as the transient owner, delegating the
/// inner payload so it runs in the Safe's context.
///
/// Precondition: `transient_owner` is listed as an owner of `safe` at
/// execution time and is the `msg.sender` of this sub-call. If the
/// initializer encoded a different transient owner, this call reverts and the
/// whole top-level transaction reverts with it.
pub fn exec_transaction_call(
    safe: Address,
    transient_owner: Address,
    to: Address,
    data: Bytes,
) -> MetaCall {
    let call = execTransactionCall {
        to,
        value: U256::ZERO,
        data,
        operation: CallKind::DelegateCall as u8,
        safeTxGas: U256::ZERO,
        baseGas: U256::ZERO,
        gasPrice: U256::ZERO,
        gasToken: Address::ZERO,
        refundReceiver: Address::ZERO,
        signatures: pre_approved_signature(transient_owner),
    };
    MetaCall::call(safe, call.abi_encode())
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8, DecodeError> {
    if bytes.len() <= *i {
        return Err(DecodeError::Truncated(*i));
    }
    let out = bytes[*i];
    *i += 1;
    Ok(out)
}

fn read_address(bytes: &[u8], i: &mut usize) -> Result<Address, DecodeError> {
    if bytes.len() < *i + 20 {
        return Err(DecodeError::Truncated(*i));
    }
    let addr = Address::from_slice(&bytes[*i..*i + 20]);
    *i += 20;
    Ok(addr)
}

fn read_u256(bytes: &[u8], i: &mut usize) -> Result<U256, DecodeError> {
    if bytes.len() < *i + 32 {
        return Err(DecodeError::Truncated(*i));
    }
    let out = U256::from_be_slice(&bytes[*i..*i + 32]);
    *i += 32;
    Ok(out)
}

fn read_vec(bytes: &[u8], i: &mut usize, len: usize) -> Result<Vec<u8>, DecodeError> {
    if bytes.len() < *i + len {
        return Err(DecodeError::Truncated(*i));
    }
    let out = bytes[*i..*i + len].to_vec();
    *i += len;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn sample_calls(n: usize) -> Vec<MetaCall> {
        (0..n)
            .map(|i| MetaCall {
                to: Address::with_last_byte(i as u8 + 1),
                value: U256::from(i as u64 * 1_000),
                data: vec![i as u8; i * 7].into(),
                operation: if i % 2 == 0 {
                    CallKind::Call
                } else {
                    CallKind::DelegateCall
                },
            })
            .collect()
    }

    #[test]
    fn pack_round_trips() {
        for n in [0usize, 1, 5] {
            let calls = sample_calls(n);
            let packed = encode_multi_send(&calls);
            assert_eq!(decode_multi_send(&packed).unwrap(), calls);
        }
    }

    #[test]
    fn pack_round_trips_empty_and_large_data() {
        let calls = vec![
            MetaCall::call(Address::with_last_byte(1), Vec::new()),
            MetaCall::call(Address::with_last_byte(2), vec![0xab; 3 * 1024]),
        ];
        let packed = encode_multi_send(&calls);
        assert_eq!(decode_multi_send(&packed).unwrap(), calls);
    }

    #[test]
    fn pack_preserves_order_exactly() {
        let calls = sample_calls(5);
        let packed = encode_multi_send(&calls);
        let decoded = decode_multi_send(&packed).unwrap();
        let targets: Vec<Address> = decoded.iter().map(|c| c.to).collect();
        let expected: Vec<Address> = calls.iter().map(|c| c.to).collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn decode_rejects_truncated_entry() {
        let packed = encode_multi_send(&sample_calls(2));
        let truncated = &packed[..packed.len() - 1];
        assert!(matches!(
            decode_multi_send(truncated),
            Err(DecodeError::Truncated(_))
        ));
    }

    #[test]
    fn decode_rejects_unknown_operation() {
        let mut packed = encode_multi_send(&sample_calls(1)).to_vec();
        packed[0] = 2;
        assert_eq!(
            decode_multi_send(&packed),
            Err(DecodeError::UnknownCallKind(2))
        );
    }

    #[test]
    fn pre_approved_signature_matches_golden_format() {
        let owner = address!("A1dabEF33b3B82c7814B6D82A79e50F4AC44102B");
        let sig = pre_approved_signature(owner);
        assert_eq!(
            hex::encode(&sig),
            "000000000000000000000000a1dabef33b3b82c7814b6d82a79e50f4ac44102b\
             0000000000000000000000000000000000000000000000000000000000000000\
             01"
        );
    }

    #[test]
    fn nested_batch_is_itself_a_call() {
        let executor = address!("A1dabEF33b3B82c7814B6D82A79e50F4AC44102B");
        let inner = sample_calls(2);
        let wrapped = multi_send_call(executor, true, &inner);
        assert_eq!(wrapped.to, executor);
        assert_eq!(wrapped.operation, CallKind::DelegateCall);

        let decoded = multiSendCall::abi_decode(&wrapped.data, true).unwrap();
        assert_eq!(decode_multi_send(&decoded.transactions).unwrap(), inner);
    }

    #[test]
    fn exec_transaction_call_targets_the_safe_itself() {
        let safe = Address::with_last_byte(0x50);
        let owner = address!("A1dabEF33b3B82c7814B6D82A79e50F4AC44102B");
        let wrapped = exec_transaction_call(safe, owner, owner, vec![1, 2, 3].into());
        assert_eq!(wrapped.to, safe);
        assert_eq!(wrapped.operation, CallKind::Call);

        let decoded = execTransactionCall::abi_decode(&wrapped.data, true).unwrap();
        assert_eq!(decoded.operation, CallKind::DelegateCall as u8);
        assert_eq!(decoded.signatures, pre_approved_signature(owner));
        assert_eq!(decoded.value, U256::ZERO);
    }
}
