use alloy_primitives::Address;
use thiserror::Error;

/// Errors while parsing a packed MultiSend blob back into calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("multisend data truncated at byte {0}")]
    Truncated(usize),
    #[error("unknown call kind byte {0:#04x}")]
    UnknownCallKind(u8),
    #[error("multisend entry length does not fit in memory")]
    LengthOverflow,
}

/// Errors while constructing a proposal plan.
///
/// Every variant is a local construction failure surfaced before anything is
/// submitted on-chain. There are no retries to perform; the caller must fix
/// its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("child owner list is empty")]
    NoOwners,
    #[error("threshold {threshold} is invalid for {owners} owner(s)")]
    InvalidThreshold { threshold: u64, owners: usize },
    #[error("transient owner {0} already appears in the child owner list")]
    TransientOwnerCollision(Address),
    #[error("transient owner {0} not found in the initialized owner list")]
    TransientOwnerMissing(Address),
    #[error("proxy factory creation code is empty")]
    EmptyCreationCode,
    #[error("dispute module question timeout must be non-zero")]
    DisputeTimeoutZero,
    #[error("{label}: deployment call predicts {recomputed}, plan references {expected}")]
    PredictionMismatch {
        label: &'static str,
        expected: Address,
        recomputed: Address,
    },
    #[error("{label}: deployment calldata failed to round-trip: {reason}")]
    MalformedDeploymentCall {
        label: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
