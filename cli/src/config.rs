//! Environment-driven configuration.
//!
//! Every knob can come from the environment (a `.env` file works via dotenv)
//! or be passed as a flag; flags win. Validation that needs no RPC happens
//! here; token decimal scaling and balance checks live in `funding` because
//! they need chain reads first.

use std::fs;
use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use clap::Parser;

use subsafe_planner::{Chain, DisputeParams, ProposalMetadata};

/// Plan (and optionally submit) a governance proposal that bootstraps a new
/// child Safe, with its authorization modules, beneath a parent Safe.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Chain to plan against (mainnet or sepolia).
    #[arg(long, env = "CHAIN")]
    pub chain: Chain,

    /// RPC URL for all chain reads and the final submission.
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Proposer private key (hex). Required unless --dry-run.
    #[arg(long, env = "SIGNING_KEY", hide_env_values = true)]
    pub signing_key: Option<String>,

    /// Address of the parent Safe the proposal executes through.
    #[arg(long, env = "PARENT_SAFE_ADDRESS")]
    pub parent_safe: Address,

    /// Display name registered for the child Safe.
    #[arg(long, env = "CHILD_SAFE_NAME")]
    pub child_safe_name: String,

    /// Comma-separated child Safe owner addresses.
    #[arg(long, env = "CHILD_SAFE_MULTISIG_OWNERS", value_delimiter = ',')]
    pub child_owners: Vec<Address>,

    /// Signature threshold for the child Safe once bootstrap completes.
    #[arg(long, env = "CHILD_SAFE_MULTISIG_THRESHOLD")]
    pub child_threshold: u64,

    /// ENS name whose text record the proposal updates; must be owned by the
    /// parent Safe.
    #[arg(long, env = "ENS_NAME")]
    pub ens_name: String,

    /// IPFS hash written to the ENS `daorequirements` text record.
    #[arg(long, env = "ENS_IPFS_HASH")]
    pub ens_ipfs_hash: String,

    #[arg(long, env = "PROPOSAL_TITLE")]
    pub proposal_title: String,

    /// File containing the proposal description (free text).
    #[arg(long, env = "PROPOSAL_DESCRIPTION_FILE")]
    pub proposal_description_file: PathBuf,

    #[arg(long, env = "PROPOSAL_DOCUMENTATION_URL")]
    pub proposal_documentation_url: String,

    /// Comma-separated ERC-20 addresses the parent transfers to the child.
    #[arg(long, env = "FUNDING_ERC20_ADDRESSES", value_delimiter = ',', num_args = 0..)]
    pub funding_addresses: Vec<Address>,

    /// Comma-separated human-unit amounts, one per funding address.
    #[arg(long, env = "FUNDING_ERC20_AMOUNTS", value_delimiter = ',', num_args = 0..)]
    pub funding_amounts: Vec<String>,

    /// Oracle question template id for the dispute module.
    #[arg(long, env = "DISPUTE_TEMPLATE_ID")]
    pub dispute_template_id: U256,

    /// Minimum oracle bond, denominated in ether.
    #[arg(long, env = "DISPUTE_MINIMUM_BOND")]
    pub dispute_minimum_bond: String,

    /// Oracle question timeout in seconds.
    #[arg(long, env = "DISPUTE_QUESTION_TIMEOUT")]
    pub dispute_question_timeout: u32,

    /// Oracle question cooldown in seconds.
    #[arg(long, env = "DISPUTE_QUESTION_COOLDOWN")]
    pub dispute_question_cooldown: u32,

    /// Oracle answer expiration in seconds.
    #[arg(long, env = "DISPUTE_ANSWER_EXPIRATION")]
    pub dispute_answer_expiration: u32,

    /// Fixed salt nonce for idempotent re-planning (decimal or 0x-hex).
    /// A fresh random nonce is generated when omitted.
    #[arg(long, env = "SALT_NONCE")]
    pub salt_nonce: Option<U256>,

    /// Print the full plan and exit without prompting or submitting.
    #[arg(long, env = "DRY_RUN", default_value_t = false)]
    pub dry_run: bool,
}

impl Cli {
    /// Checks that need no chain access.
    pub fn validate(&self) -> Result<()> {
        if self.child_owners.is_empty() {
            bail!("CHILD_SAFE_MULTISIG_OWNERS must list at least one owner");
        }
        if self.child_threshold == 0 || self.child_threshold as usize > self.child_owners.len() {
            bail!(
                "CHILD_SAFE_MULTISIG_THRESHOLD ({}) must be between 1 and the owner count ({})",
                self.child_threshold,
                self.child_owners.len()
            );
        }
        if self.funding_addresses.len() != self.funding_amounts.len() {
            bail!(
                "FUNDING_ERC20_ADDRESSES ({}) and FUNDING_ERC20_AMOUNTS ({}) are different lengths",
                self.funding_addresses.len(),
                self.funding_amounts.len()
            );
        }
        if !self.dry_run && self.signing_key.is_none() {
            bail!("SIGNING_KEY is required unless --dry-run is set");
        }
        Ok(())
    }

    pub fn dispute_params(&self) -> Result<DisputeParams> {
        Ok(DisputeParams {
            template_id: self.dispute_template_id,
            minimum_bond: crate::funding::parse_units(&self.dispute_minimum_bond, 18)
                .context("DISPUTE_MINIMUM_BOND is not a valid ether amount")?,
            question_timeout: self.dispute_question_timeout,
            question_cooldown: self.dispute_question_cooldown,
            answer_expiration: self.dispute_answer_expiration,
        })
    }

    pub fn proposal_metadata(&self) -> Result<ProposalMetadata> {
        let description = fs::read_to_string(&self.proposal_description_file).with_context(|| {
            format!(
                "could not read proposal description file {}",
                self.proposal_description_file.display()
            )
        })?;
        Ok(ProposalMetadata {
            title: self.proposal_title.clone(),
            description,
            documentation_url: self.proposal_documentation_url.clone(),
        })
    }
}
