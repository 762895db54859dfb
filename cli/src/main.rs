//! Plan a child-Safe bootstrap proposal and submit it to the parent Safe's
//! governance module.
//!
//! Everything up to submission is read-only: configuration is validated, chain
//! state is fetched, the full plan is assembled and printed, and only after an
//! explicit confirmation is a single transaction broadcast.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use ethers::core::rand::RngCore;

use alloy_primitives::U256;
use subsafe_planner::{assemble_proposal, ens::namehash, PlanConfig};

mod client;
mod config;
mod discovery;
mod funding;

use client::ChainClient;
use config::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    cli.validate()?;

    let contracts = cli.chain.contract_addresses();
    let client = ChainClient::new(&cli.rpc_url)?;

    // ENS ownership gate: the setText entry would revert at execution time if
    // the parent Safe does not own the name.
    let node = namehash(&cli.ens_name);
    let ens_owner = client
        .ens_name_owner(contracts.ens_name_wrapper, node)
        .await?;
    if ens_owner != cli.parent_safe {
        bail!(
            "ENS name {} is owned by {ens_owner}, not the parent Safe {}",
            cli.ens_name,
            cli.parent_safe
        );
    }
    println!(
        "ENS name {} confirmed to be owned by parent Safe {}.",
        cli.ens_name, cli.parent_safe
    );
    println!();

    let modules = discovery::modules_on_safe(&client, cli.parent_safe).await?;
    println!("Modules on parent Safe: {modules:?}");
    let governance_module = discovery::find_governance_module(&client, &modules)
        .await?
        .context("no governance module found on the parent Safe; cannot create proposals")?;
    println!("Found governance module at {governance_module}.");

    let strategies =
        discovery::strategies_on_governance_module(&client, governance_module).await?;
    let voting_strategy = discovery::find_voting_strategy(&client, &strategies)
        .await?
        .context("no linear voting strategy found on the governance module")?;
    println!("Found linear voting strategy at {voting_strategy}.");
    println!();

    let funding_tokens = funding::resolve_funding_tokens(
        &client,
        cli.parent_safe,
        &cli.funding_addresses,
        &cli.funding_amounts,
    )
    .await?;

    let proxy_creation_code = client
        .proxy_creation_code(contracts.safe_proxy_factory)
        .await?;

    let salt_nonce = cli.salt_nonce.unwrap_or_else(random_salt_nonce);
    println!("Using salt nonce {salt_nonce} for all deployments and address predictions.");
    println!();

    let plan_config = PlanConfig {
        parent_safe: cli.parent_safe,
        child_safe_name: cli.child_safe_name.clone(),
        child_owners: cli.child_owners.clone(),
        child_threshold: cli.child_threshold,
        ens_name: cli.ens_name.clone(),
        ens_ipfs_hash: cli.ens_ipfs_hash.clone(),
        funding_tokens,
        dispute: cli.dispute_params()?,
        metadata: cli.proposal_metadata()?,
    };

    let plan = assemble_proposal(&plan_config, &contracts, &proxy_creation_code, salt_nonce)?;

    println!("Predicted child Safe address:      {}", plan.predicted.child_safe);
    println!("Predicted control module address:  {}", plan.predicted.control_module);
    println!("Predicted dispute module address:  {}", plan.predicted.dispute_module);
    println!();
    println!(
        "Proposal entries:\n{}",
        serde_json::to_string_pretty(&plan.entries)?
    );
    println!();
    println!("Proposal metadata: {}", plan.metadata_json());
    println!();

    if cli.dry_run {
        println!("This is a DRY RUN, nothing was submitted.");
        return Ok(());
    }

    if !confirm()? {
        println!("Aborted, nothing was submitted.");
        return Ok(());
    }

    let signing_key = cli
        .signing_key
        .as_deref()
        .context("SIGNING_KEY is required to submit")?;
    let calldata = plan.submit_calldata(voting_strategy);

    println!("Submitting proposal...");
    let tx_hash = client
        .submit_transaction(signing_key, cli.chain.id(), governance_module, calldata.to_vec())
        .await?;
    println!("Proposal submitted in transaction {tx_hash:#x}");

    Ok(())
}

fn random_salt_nonce() -> U256 {
    let mut bytes = [0u8; 32];
    ethers::core::rand::thread_rng().fill_bytes(&mut bytes);
    U256::from_be_bytes(bytes)
}

fn confirm() -> Result<bool> {
    print!("If the plan above looks correct, type 'continue' to submit it. Anything else quits: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim() == "continue")
}
