//! Per-chain singleton contract addresses.
//!
//! Mirrored external constants: these are the canonical Safe v1.3.0, Zodiac,
//! ENS, and registry deployments on each supported chain. The table is built
//! once from the closed [`Chain`] enum and passed by value into the planner;
//! nothing reads it as ambient state.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{address, Address};

/// Sentinel head/tail marker of the Safe owner and module linked lists.
pub const SENTINEL_ADDRESS: Address = address!("0000000000000000000000000000000000000001");

/// Multicall3 lives at the same address on every supported chain.
pub const MULTICALL3_ADDRESS: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chain {
    Mainnet,
    Sepolia,
}

impl Chain {
    pub fn id(self) -> u64 {
        match self {
            Chain::Mainnet => 1,
            Chain::Sepolia => 11_155_111,
        }
    }

    pub fn contract_addresses(self) -> ContractAddresses {
        match self {
            Chain::Mainnet => ContractAddresses {
                ens_name_wrapper: address!("D4416b13d2b3a9aBae7AcD5D6C2BbDBE25686401"),
                ens_public_resolver: address!("231b0Ee14048e9dCcD1d247744d114a4EB5E8E63"),
                safe_proxy_factory: address!("a6B71E26C5e0845f74c812102Ca7114b6a896AB2"),
                safe_l2_singleton: address!("3E5c63644E683549055b9Be8653de26E0B4CD36E"),
                module_proxy_factory: address!("000000000000aDdB49795b0f9bA5BC298cDda236"),
                control_module_master_copy: address!("87326A981fc56823e26599Ff4D0A4eceAFfF3be0"),
                dispute_module_master_copy: address!("4e35DA39Fa5893a70A40Ce964F993d891E607cC0"),
                multi_send_call_only: address!("40A2aCCbd92BCA938b02010E17A5b8929b49130D"),
                compatibility_fallback_handler: address!("f48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4"),
                subdao_registry: address!("023BDAEFeDDDdd5B43aF125CAA8007a99A886Fd3"),
                dispute_oracle: address!("5b7dD1E86623548AF054A4985F7fc8Ccbb554E2c"),
                dispute_arbitrator: address!("f72cfd1b34a91a64f9a98537fe63fbab7530adca"),
            },
            Chain::Sepolia => ContractAddresses {
                ens_name_wrapper: address!("0635513f179D50A207757E05759CbD106d7dFcE8"),
                ens_public_resolver: address!("8FADE66B79cC9f707aB26799354482EB93a5B7dD"),
                safe_proxy_factory: address!("c22834581ebc8527d974f8a1c97e1bea4ef910bc"),
                safe_l2_singleton: address!("fb1bffc9d739b8d520daf37df666da4c687191ea"),
                module_proxy_factory: address!("000000000000aDdB49795b0f9bA5BC298cDda236"),
                control_module_master_copy: address!("1b26345a4a41d9f588e1b161b6e8f21d27547184"),
                dispute_module_master_copy: address!("4e35DA39Fa5893a70A40Ce964F993d891E607cC0"),
                multi_send_call_only: address!("A1dabEF33b3B82c7814B6D82A79e50F4AC44102B"),
                compatibility_fallback_handler: address!("017062a1dE2FE6b99BE3d9d37841FeD19F573804"),
                subdao_registry: address!("4791FF2a6E84F012402c0679C12Cb1d9260450A6"),
                dispute_oracle: address!("af33DcB6E8c5c4D9dDF579f53031b514d19449CA"),
                dispute_arbitrator: address!("05b942faecfb3924970e3a28e0f230910cedff45"),
            },
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Mainnet => f.write_str("mainnet"),
            Chain::Sepolia => f.write_str("sepolia"),
        }
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Chain::Mainnet),
            "sepolia" => Ok(Chain::Sepolia),
            other => Err(format!("unsupported chain `{other}` (expected mainnet or sepolia)")),
        }
    }
}

/// All fixed contract addresses the planner needs on one chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractAddresses {
    pub ens_name_wrapper: Address,
    pub ens_public_resolver: Address,
    pub safe_proxy_factory: Address,
    pub safe_l2_singleton: Address,
    pub module_proxy_factory: Address,
    pub control_module_master_copy: Address,
    pub dispute_module_master_copy: Address,
    pub multi_send_call_only: Address,
    pub compatibility_fallback_handler: Address,
    pub subdao_registry: Address,
    pub dispute_oracle: Address,
    pub dispute_arbitrator: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_parses_round_trip() {
        for chain in [Chain::Mainnet, Chain::Sepolia] {
            assert_eq!(chain.to_string().parse::<Chain>(), Ok(chain));
        }
        assert!("goerli".parse::<Chain>().is_err());
    }

    #[test]
    fn tables_differ_where_deployments_differ() {
        let mainnet = Chain::Mainnet.contract_addresses();
        let sepolia = Chain::Sepolia.contract_addresses();
        assert_ne!(mainnet.safe_proxy_factory, sepolia.safe_proxy_factory);
        // Deterministic-deployment factories share addresses across chains.
        assert_eq!(mainnet.module_proxy_factory, sepolia.module_proxy_factory);
    }
}
