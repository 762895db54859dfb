//! Planning core for bootstrapping a child Safe underneath a parent Safe in
//! one atomic governance proposal.
//!
//! Everything in this crate is pure computation over values passed in: no RPC,
//! no clocks, no ambient state. The hard requirement is that every address a
//! sub-call references is the address the paired deployment sub-call will
//! actually produce on-chain. All chain reads (factory creation code, token
//! metadata, module discovery) live in the CLI crate and are resolved before
//! any of this code runs.

pub mod addresses;
pub mod calls;
pub mod config;
pub mod create2;
pub mod ens;
pub mod error;
pub mod initializers;
pub mod interfaces;
pub mod proposal;

pub use addresses::{Chain, ContractAddresses, SENTINEL_ADDRESS};
pub use calls::{CallKind, MetaCall};
pub use config::{DisputeParams, FundingToken, PlanConfig, ProposalMetadata};
pub use error::{DecodeError, PlanError};
pub use proposal::{assemble_proposal, PredictedAddresses, ProposalPlan};
