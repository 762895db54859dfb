//! Funding token resolution: scale human-unit amounts by on-chain decimals
//! and confirm the parent Safe actually holds enough of each token.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use anyhow::{bail, Context, Result};

use subsafe_planner::interfaces::{balanceOfCall, decimalsCall, Call3};
use subsafe_planner::FundingToken;

use crate::client::ChainClient;

/// Parse a human decimal string (`"1.5"`) into base units for a token with
/// the given number of decimals. Rejects more fractional digits than the
/// token supports instead of silently truncating.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();
    let (integer, fraction) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        bail!("empty amount");
    }
    if !integer.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        bail!("`{amount}` is not a plain decimal number");
    }
    if fraction.len() > decimals as usize {
        bail!(
            "`{amount}` has {} fractional digits but the token only has {decimals} decimals",
            fraction.len()
        );
    }

    // `decimals` comes from an untrusted token contract; anything past 77
    // cannot scale into 256 bits, so it must error instead of wrapping.
    let scale = U256::from(10u64)
        .checked_pow(U256::from(decimals as u64))
        .context("token reports more decimals than a 256-bit amount can scale")?;
    let integer_part = if integer.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(integer, 10).context("integer part overflows")?
    };

    let mut value = integer_part
        .checked_mul(scale)
        .context("amount overflows 256 bits")?;

    if !fraction.is_empty() {
        let fraction_scale = U256::from(10u64)
            .checked_pow(U256::from((decimals as usize - fraction.len()) as u64))
            .context("token reports more decimals than a 256-bit amount can scale")?;
        let fraction_part = U256::from_str_radix(fraction, 10).context("fraction overflows")?;
        value = value
            .checked_add(
                fraction_part
                    .checked_mul(fraction_scale)
                    .context("amount overflows 256 bits")?,
            )
            .context("amount overflows 256 bits")?;
    }

    Ok(value)
}

/// One round trip for all `decimals()`, one for all `balanceOf(owner)`.
pub async fn resolve_funding_tokens(
    client: &ChainClient,
    owner: Address,
    addresses: &[Address],
    amounts: &[String],
) -> Result<Vec<FundingToken>> {
    if addresses.is_empty() {
        return Ok(Vec::new());
    }

    let decimal_calls = addresses
        .iter()
        .map(|&token| Call3 {
            target: token,
            allowFailure: false,
            callData: decimalsCall {}.abi_encode().into(),
        })
        .collect();
    let decimal_results = client
        .aggregate3(decimal_calls)
        .await
        .context("could not fetch `decimals` for one or more funding tokens")?;

    let mut tokens = Vec::with_capacity(addresses.len());
    for ((&address, amount), result) in addresses.iter().zip(amounts).zip(&decimal_results) {
        let decimals = decimalsCall::abi_decode_returns(&result.returnData, true)
            .with_context(|| format!("token {address} returned malformed decimals"))?
            ._0;
        let amount = parse_units(amount, decimals)
            .with_context(|| format!("invalid funding amount for token {address}"))?;
        tokens.push(FundingToken { address, amount });
    }

    let balance_calls = tokens
        .iter()
        .map(|token| Call3 {
            target: token.address,
            allowFailure: false,
            callData: balanceOfCall { account: owner }.abi_encode().into(),
        })
        .collect();
    let balance_results = client
        .aggregate3(balance_calls)
        .await
        .context("could not fetch parent Safe balances for one or more funding tokens")?;

    for (token, result) in tokens.iter().zip(&balance_results) {
        let balance = balanceOfCall::abi_decode_returns(&result.returnData, true)
            .with_context(|| format!("token {} returned malformed balance", token.address))?
            ._0;
        if token.amount > balance {
            bail!(
                "parent Safe holds {balance} of token {} but the plan transfers {}",
                token.address,
                token.amount
            );
        }
    }

    Ok(tokens)
}
