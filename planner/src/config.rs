//! Validated plan input.
//!
//! The CLI resolves and validates everything here (env parsing, decimal
//! scaling, balance checks) before the core runs; the planner treats these
//! values as already correct apart from the fail-fast shape checks it
//! performs itself.

use alloy_primitives::{Address, U256};
use serde::Serialize;

/// One ERC-20 the parent Safe transfers to the child at the end of the plan,
/// with the amount already scaled by the token's on-chain decimals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FundingToken {
    pub address: Address,
    pub amount: U256,
}

/// Dispute-resolution module parameters, passed through unmodified into the
/// module initializer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisputeParams {
    pub template_id: U256,
    pub minimum_bond: U256,
    pub question_timeout: u32,
    pub question_cooldown: u32,
    pub answer_expiration: u32,
}

/// Free-text proposal metadata submitted alongside the call list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalMetadata {
    pub title: String,
    pub description: String,
    pub documentation_url: String,
}

/// Everything the assembler needs for one planning run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanConfig {
    pub parent_safe: Address,
    pub child_safe_name: String,
    pub child_owners: Vec<Address>,
    pub child_threshold: u64,
    pub ens_name: String,
    pub ens_ipfs_hash: String,
    pub funding_tokens: Vec<FundingToken>,
    pub dispute: DisputeParams,
    pub metadata: ProposalMetadata,
}
