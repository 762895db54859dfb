//! Thin chain-read/submit client.
//!
//! All calldata is encoded and decoded with the planner's ABI declarations;
//! ethers is only the transport. Reads that can be coalesced go through one
//! Multicall3 `aggregate3` round trip.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use anyhow::{Context, Result};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{TransactionRequest, H160, H256};

use subsafe_planner::addresses::MULTICALL3_ADDRESS;
use subsafe_planner::interfaces::{
    aggregate3Call, getModulesPaginatedCall, getStrategiesCall, ownerOfCall,
    proxyCreationCodeCall, Call3, Call3Result,
};

pub struct ChainClient {
    provider: Provider<Http>,
}

fn to_h160(address: Address) -> H160 {
    H160::from_slice(address.as_slice())
}

impl ChainClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("invalid RPC URL {rpc_url}"))?;
        Ok(Self { provider })
    }

    pub async fn eth_call(&self, to: Address, calldata: Vec<u8>) -> Result<Vec<u8>> {
        let tx = TransactionRequest::new().to(to_h160(to)).data(calldata);
        let out = self
            .provider
            .call(&tx.into(), None)
            .await
            .with_context(|| format!("eth_call to {to} failed"))?;
        Ok(out.to_vec())
    }

    /// The Safe proxy factory's creation bytecode, needed for the
    /// factory-with-argument address prediction.
    pub async fn proxy_creation_code(&self, factory: Address) -> Result<Vec<u8>> {
        let out = self
            .eth_call(factory, proxyCreationCodeCall {}.abi_encode())
            .await?;
        let decoded = proxyCreationCodeCall::abi_decode_returns(&out, true)
            .context("malformed proxyCreationCode() return")?;
        Ok(decoded._0.to_vec())
    }

    /// Current owner of a wrapped ENS name.
    pub async fn ens_name_owner(&self, name_wrapper: Address, node: B256) -> Result<Address> {
        let out = self
            .eth_call(
                name_wrapper,
                ownerOfCall {
                    id: U256::from_be_bytes(node.0),
                }
                .abi_encode(),
            )
            .await?;
        let decoded =
            ownerOfCall::abi_decode_returns(&out, true).context("malformed ownerOf() return")?;
        Ok(decoded.owner)
    }

    /// One page of the Safe module linked list.
    pub async fn modules_paginated(
        &self,
        safe: Address,
        start: Address,
        page_size: u64,
    ) -> Result<(Vec<Address>, Address)> {
        let out = self
            .eth_call(
                safe,
                getModulesPaginatedCall {
                    start,
                    pageSize: U256::from(page_size),
                }
                .abi_encode(),
            )
            .await?;
        let decoded = getModulesPaginatedCall::abi_decode_returns(&out, true)
            .context("malformed getModulesPaginated() return")?;
        Ok((decoded.array, decoded.next))
    }

    /// One page of the governance module's strategy linked list.
    pub async fn strategies_paginated(
        &self,
        governance_module: Address,
        start: Address,
        page_size: u64,
    ) -> Result<(Vec<Address>, Address)> {
        let out = self
            .eth_call(
                governance_module,
                getStrategiesCall {
                    _startAddress: start,
                    _count: U256::from(page_size),
                }
                .abi_encode(),
            )
            .await?;
        let decoded = getStrategiesCall::abi_decode_returns(&out, true)
            .context("malformed getStrategies() return")?;
        Ok((decoded._strategies, decoded._next))
    }

    /// Coalesced reads through Multicall3.
    pub async fn aggregate3(&self, calls: Vec<Call3>) -> Result<Vec<Call3Result>> {
        let out = self
            .eth_call(MULTICALL3_ADDRESS, aggregate3Call { calls }.abi_encode())
            .await?;
        let decoded = aggregate3Call::abi_decode_returns(&out, true)
            .context("malformed aggregate3() return")?;
        Ok(decoded.returnData)
    }

    /// Sign and broadcast the proposal submission. Invoked exactly once per
    /// run; confirmation monitoring is out of scope.
    pub async fn submit_transaction(
        &self,
        signing_key: &str,
        chain_id: u64,
        to: Address,
        calldata: Vec<u8>,
    ) -> Result<H256> {
        let wallet: LocalWallet = signing_key
            .trim_start_matches("0x")
            .parse()
            .context("SIGNING_KEY is not a valid private key")?;
        let wallet = wallet.with_chain_id(chain_id);
        let signer = SignerMiddleware::new(self.provider.clone(), wallet);

        let tx = TransactionRequest::new().to(to_h160(to)).data(calldata);
        let pending = signer
            .send_transaction(tx, None)
            .await
            .context("proposal submission failed")?;
        Ok(*pending)
    }
}
