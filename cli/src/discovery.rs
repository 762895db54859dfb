//! Discovery of the governance module and voting strategy on the parent Safe.
//!
//! Both on-chain lists are sentinel-terminated linked lists. The walk is an
//! explicit loop with a hard page cap, not recursion, so a hostile or
//! enormous list cannot grow the stack or spin forever.

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use anyhow::{bail, Result};

use subsafe_planner::interfaces::{
    azoriusModuleCall, basisNumeratorCall, executionPeriodCall, governanceTokenCall,
    quorumNumeratorCall, requiredProposerWeightCall, timelockPeriodCall, totalProposalCountCall,
    votingPeriodCall, Call3, BASIS_DENOMINATORCall, QUORUM_DENOMINATORCall,
};
use subsafe_planner::SENTINEL_ADDRESS;

use crate::client::ChainClient;

const PAGE_SIZE: u64 = 10;
const MAX_PAGES: usize = 1_000;

/// Every module enabled on the Safe, in list order.
pub async fn modules_on_safe(client: &ChainClient, safe: Address) -> Result<Vec<Address>> {
    walk(|start| client.modules_paginated(safe, start, PAGE_SIZE)).await
}

/// Every voting strategy enabled on the governance module, in list order.
pub async fn strategies_on_governance_module(
    client: &ChainClient,
    governance_module: Address,
) -> Result<Vec<Address>> {
    walk(|start| client.strategies_paginated(governance_module, start, PAGE_SIZE)).await
}

async fn walk<F, Fut>(mut fetch_page: F) -> Result<Vec<Address>>
where
    F: FnMut(Address) -> Fut,
    Fut: std::future::Future<Output = Result<(Vec<Address>, Address)>>,
{
    let mut all = Vec::new();
    let mut start = SENTINEL_ADDRESS;

    for _ in 0..MAX_PAGES {
        let (page, next) = fetch_page(start).await?;
        all.extend(page);
        if next == SENTINEL_ADDRESS || next == Address::ZERO {
            return Ok(all);
        }
        // `next` is the first entry the page did not include; the contract
        // resumes *after* whatever start it is given, so record it ourselves.
        all.push(next);
        start = next;
    }

    bail!("linked list did not terminate after {MAX_PAGES} pages");
}

fn probe(target: Address, calldata: Vec<u8>) -> Call3 {
    Call3 {
        target,
        allowFailure: true,
        callData: calldata.into(),
    }
}

async fn probe_all(client: &ChainClient, calls: Vec<Call3>) -> Result<bool> {
    let results = client.aggregate3(calls).await?;
    Ok(results.iter().all(|r| r.success && !r.returnData.is_empty()))
}

/// First module that answers the governance-module probe surface.
pub async fn find_governance_module(
    client: &ChainClient,
    modules: &[Address],
) -> Result<Option<Address>> {
    for &module in modules {
        let calls = vec![
            probe(module, executionPeriodCall {}.abi_encode()),
            probe(module, timelockPeriodCall {}.abi_encode()),
            probe(module, totalProposalCountCall {}.abi_encode()),
        ];
        if probe_all(client, calls).await? {
            return Ok(Some(module));
        }
    }
    Ok(None)
}

/// First strategy that answers the linear-voting probe surface.
pub async fn find_voting_strategy(
    client: &ChainClient,
    strategies: &[Address],
) -> Result<Option<Address>> {
    for &strategy in strategies {
        let calls = vec![
            probe(strategy, BASIS_DENOMINATORCall {}.abi_encode()),
            probe(strategy, QUORUM_DENOMINATORCall {}.abi_encode()),
            probe(strategy, azoriusModuleCall {}.abi_encode()),
            probe(strategy, basisNumeratorCall {}.abi_encode()),
            probe(strategy, governanceTokenCall {}.abi_encode()),
            probe(strategy, quorumNumeratorCall {}.abi_encode()),
            probe(strategy, requiredProposerWeightCall {}.abi_encode()),
            probe(strategy, votingPeriodCall {}.abi_encode()),
        ];
        if probe_all(client, calls).await? {
            return Ok(Some(strategy));
        }
    }
    Ok(None)
}
