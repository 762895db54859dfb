//! Initialization payload encoders for each deployable contract type.
//!
//! Pure encode over already-validated scalars and addresses; malformed input
//! fails fast with a [`PlanError`] rather than emitting calldata that only
//! reverts at execution time. The avatar/target addresses these encoders take
//! are *predictions*; the initializer bytes in turn feed the salt that makes
//! those predictions hold, which is why every caller must thread the same
//! byte strings through both sides.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};

use crate::config::DisputeParams;
use crate::error::PlanError;
use crate::interfaces::{setUpCall, setupCall};

/// Safe `setup(...)` initializer for the child Safe.
///
/// The owner set is the caller-supplied owners plus the batch executor as a
/// transient owner, with the threshold pinned to 1 so the executor can drive
/// the Safe alone during bootstrap. The real threshold is restored by the
/// `removeOwner` call in the same plan.
pub fn safe_setup_initializer(
    child_owners: &[Address],
    transient_owner: Address,
    fallback_handler: Address,
) -> Result<Bytes, PlanError> {
    if child_owners.is_empty() {
        return Err(PlanError::NoOwners);
    }
    if child_owners.contains(&transient_owner) {
        return Err(PlanError::TransientOwnerCollision(transient_owner));
    }

    let mut owners = child_owners.to_vec();
    owners.push(transient_owner);

    let call = setupCall {
        _owners: owners,
        _threshold: U256::from(1u64),
        to: Address::ZERO,
        // The unused delegate data is a 32-zero-byte word, not empty bytes.
        // The salt (and thus every predicted address) depends on these exact
        // initializer bytes; see the pinned encoding test below.
        data: Bytes::from(vec![0u8; 32]),
        fallbackHandler: fallback_handler,
        paymentToken: Address::ZERO,
        payment: U256::ZERO,
        paymentReceiver: Address::ZERO,
    };
    Ok(call.abi_encode().into())
}

/// Control module `setUp(bytes)` initializer.
///
/// The parent Safe owns the module; avatar and target are the *predicted*
/// child Safe, so the parent can execute through the child after deployment.
pub fn control_module_initializer(parent_safe: Address, child_safe: Address) -> Bytes {
    let controllers: Vec<Address> = Vec::new();
    let params = (parent_safe, child_safe, child_safe, controllers).abi_encode_params();
    setUpCall {
        initParams: params.into(),
    }
    .abi_encode()
    .into()
}

/// Dispute-resolution module `setUp(bytes)` initializer.
///
/// The child Safe owns its own dispute module; avatar and target are again
/// the predicted child Safe. Oracle/arbitrator come from the chain address
/// table, the remaining parameters straight from validated config.
pub fn dispute_module_initializer(
    child_safe: Address,
    oracle: Address,
    arbitrator: Address,
    params: &DisputeParams,
) -> Result<Bytes, PlanError> {
    if params.question_timeout == 0 {
        return Err(PlanError::DisputeTimeoutZero);
    }

    let init = (
        child_safe,
        child_safe,
        child_safe,
        oracle,
        params.question_timeout,
        params.question_cooldown,
        params.answer_expiration,
        params.minimum_bond,
        params.template_id,
        arbitrator,
    )
        .abi_encode_params();

    Ok(setUpCall {
        initParams: init.into(),
    }
    .abi_encode()
    .into())
}
