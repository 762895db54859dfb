//! Proposal assembly.
//!
//! Builds the full top-level entry list for the governance proposal:
//!
//! 1. ENS text record update (no predicted-address dependency).
//! 2. Nested deployment batch: deploy the child Safe proxy and both module
//!    proxies, then one self-execute call whose delegated inner batch enables
//!    the modules, removes the transient owner (restoring the real
//!    threshold), and sets the child's registry name.
//! 3. Sub-DAO declaration referencing the predicted child Safe.
//! 4. Delegated funding batch (only when funding tokens are configured), so
//!    value never moves into an account that failed to configure.
//!
//! The ordering is fixed and significant; the assembler recomputes every
//! predicted address from the deployment calldata it just encoded and aborts
//! on any mismatch, because a divergence here produces a proposal that fails
//! (or hits the wrong target) only at execution time.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use serde_json::json;

use crate::addresses::{ContractAddresses, SENTINEL_ADDRESS};
use crate::calls::{exec_transaction_call, multi_send_call, MetaCall};
use crate::config::PlanConfig;
use crate::create2::{predict_module_address, predict_safe_address};
use crate::ens::namehash;
use crate::error::PlanError;
use crate::initializers::{
    control_module_initializer, dispute_module_initializer, safe_setup_initializer,
};
use crate::interfaces::{
    createProxyWithNonceCall, declareSubDAOCall, deployModuleCall, enableModuleCall,
    removeOwnerCall, setTextCall, submitProposalCall, transferCall, updateDAONameCall,
    ProposalTransaction,
};

/// The addresses the plan commits to before anything is deployed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PredictedAddresses {
    pub child_safe: Address,
    pub control_module: Address,
    pub dispute_module: Address,
}

/// A fully assembled proposal: ordered top-level entries plus metadata.
/// Constructed once per run, never mutated, consumed exactly once by the
/// submission collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalPlan {
    pub entries: Vec<MetaCall>,
    pub predicted: PredictedAddresses,
    pub salt_nonce: U256,
    pub title: String,
    pub description: String,
    pub documentation_url: String,
}

impl ProposalPlan {
    /// Metadata blob in the shape the governance frontend expects.
    pub fn metadata_json(&self) -> String {
        json!({
            "title": self.title,
            "description": self.description,
            "documentationUrl": self.documentation_url,
        })
        .to_string()
    }

    /// Full `submitProposal` calldata for the governance module.
    pub fn submit_calldata(&self, strategy: Address) -> Bytes {
        let transactions = self
            .entries
            .iter()
            .map(|entry| ProposalTransaction {
                to: entry.to,
                value: entry.value,
                data: entry.data.clone(),
                operation: entry.operation as u8,
            })
            .collect();

        submitProposalCall {
            _strategy: strategy,
            _data: Bytes::new(),
            _transactions: transactions,
            _metadata: self.metadata_json(),
        }
        .abi_encode()
        .into()
    }
}

/// Assemble the complete proposal for one planning run.
///
/// `proxy_creation_code` is the Safe proxy factory's `proxyCreationCode()`,
/// read once by the caller; `salt_nonce` is the caller's fresh (or
/// deliberately fixed) 32-byte entropy, reused for every prediction and every
/// deployment call below.
pub fn assemble_proposal(
    config: &PlanConfig,
    contracts: &ContractAddresses,
    proxy_creation_code: &[u8],
    salt_nonce: U256,
) -> Result<ProposalPlan, PlanError> {
    let owner_count = config.child_owners.len();
    if config.child_threshold == 0 || config.child_threshold as usize > owner_count {
        return Err(PlanError::InvalidThreshold {
            threshold: config.child_threshold,
            owners: owner_count,
        });
    }

    // Initializers first: their bytes are inputs to every address prediction.
    let safe_initializer = safe_setup_initializer(
        &config.child_owners,
        contracts.multi_send_call_only,
        contracts.compatibility_fallback_handler,
    )?;
    let child_safe = predict_safe_address(
        contracts.safe_proxy_factory,
        contracts.safe_l2_singleton,
        proxy_creation_code,
        &safe_initializer,
        salt_nonce,
    )?;

    let control_initializer = control_module_initializer(config.parent_safe, child_safe);
    let control_module = predict_module_address(
        contracts.module_proxy_factory,
        contracts.control_module_master_copy,
        &control_initializer,
        salt_nonce,
    );

    let dispute_initializer = dispute_module_initializer(
        child_safe,
        contracts.dispute_oracle,
        contracts.dispute_arbitrator,
        &config.dispute,
    )?;
    let dispute_module = predict_module_address(
        contracts.module_proxy_factory,
        contracts.dispute_module_master_copy,
        &dispute_initializer,
        salt_nonce,
    );

    let predicted = PredictedAddresses {
        child_safe,
        control_module,
        dispute_module,
    };

    // Deployment sub-calls, one per predicted address.
    let deploy_safe = MetaCall::call(
        contracts.safe_proxy_factory,
        createProxyWithNonceCall {
            _singleton: contracts.safe_l2_singleton,
            initializer: safe_initializer.clone(),
            saltNonce: salt_nonce,
        }
        .abi_encode(),
    );
    let deploy_control = MetaCall::call(
        contracts.module_proxy_factory,
        deployModuleCall {
            masterCopy: contracts.control_module_master_copy,
            initializer: control_initializer,
            saltNonce: salt_nonce,
        }
        .abi_encode(),
    );
    let deploy_dispute = MetaCall::call(
        contracts.module_proxy_factory,
        deployModuleCall {
            masterCopy: contracts.dispute_module_master_copy,
            initializer: dispute_initializer,
            saltNonce: salt_nonce,
        }
        .abi_encode(),
    );

    verify_safe_deployment(&deploy_safe, proxy_creation_code, child_safe)?;
    verify_module_deployment(
        &deploy_control,
        contracts.module_proxy_factory,
        control_module,
        "control module",
    )?;
    verify_module_deployment(
        &deploy_dispute,
        contracts.module_proxy_factory,
        dispute_module,
        "dispute module",
    )?;

    // Inner self-configuration batch, run through the child Safe itself while
    // the batch executor is still its only effective owner.
    let owners_as_initialized: Vec<Address> = config
        .child_owners
        .iter()
        .copied()
        .chain([contracts.multi_send_call_only])
        .collect();

    let configure_child = vec![
        MetaCall::call(
            child_safe,
            enableModuleCall {
                module: control_module,
            }
            .abi_encode(),
        ),
        MetaCall::call(
            child_safe,
            enableModuleCall {
                module: dispute_module,
            }
            .abi_encode(),
        ),
        remove_transient_owner_call(
            child_safe,
            &owners_as_initialized,
            contracts.multi_send_call_only,
            config.child_threshold,
        )?,
        MetaCall::call(
            contracts.subdao_registry,
            updateDAONameCall {
                _name: config.child_safe_name.clone(),
            }
            .abi_encode(),
        ),
    ];

    let inner_batch = multi_send_call(contracts.multi_send_call_only, true, &configure_child);
    let self_execute = exec_transaction_call(
        child_safe,
        contracts.multi_send_call_only,
        inner_batch.to,
        inner_batch.data,
    );

    let deployment_batch = multi_send_call(
        contracts.multi_send_call_only,
        false,
        &[deploy_safe, deploy_control, deploy_dispute, self_execute],
    );

    let ens_entry = MetaCall::call(
        contracts.ens_public_resolver,
        setTextCall {
            node: namehash(&config.ens_name),
            key: "daorequirements".to_string(),
            value: format!("ipfs://{}", config.ens_ipfs_hash),
        }
        .abi_encode(),
    );

    let declare_entry = MetaCall::call(
        contracts.subdao_registry,
        declareSubDAOCall {
            _subDAOAddress: child_safe,
        }
        .abi_encode(),
    );

    let mut entries = vec![ens_entry, deployment_batch, declare_entry];

    if !config.funding_tokens.is_empty() {
        let transfers: Vec<MetaCall> = config
            .funding_tokens
            .iter()
            .map(|token| {
                MetaCall::call(
                    token.address,
                    transferCall {
                        to: child_safe,
                        amount: token.amount,
                    }
                    .abi_encode(),
                )
            })
            .collect();
        entries.push(multi_send_call(contracts.multi_send_call_only, true, &transfers));
    }

    Ok(ProposalPlan {
        entries,
        predicted,
        salt_nonce,
        title: config.metadata.title.clone(),
        description: config.metadata.description.clone(),
        documentation_url: config.metadata.documentation_url.clone(),
    })
}

/// `removeOwner` against the child Safe, locating the previous-owner pointer
/// by identity lookup in the as-initialized owner list rather than by
/// position. The Safe owner linked list follows insertion order, so the
/// predecessor is the preceding list element, or the sentinel when the owner
/// to remove is first.
fn remove_transient_owner_call(
    safe: Address,
    owners_as_initialized: &[Address],
    transient_owner: Address,
    restored_threshold: u64,
) -> Result<MetaCall, PlanError> {
    let index = owners_as_initialized
        .iter()
        .position(|owner| *owner == transient_owner)
        .ok_or(PlanError::TransientOwnerMissing(transient_owner))?;

    let prev_owner = if index == 0 {
        SENTINEL_ADDRESS
    } else {
        owners_as_initialized[index - 1]
    };

    Ok(MetaCall::call(
        safe,
        removeOwnerCall {
            prevOwner: prev_owner,
            owner: transient_owner,
            _threshold: U256::from(restored_threshold),
        }
        .abi_encode(),
    ))
}

/// Re-derive the child Safe address from the deployment calldata itself and
/// require it to match the address the rest of the plan references.
fn verify_safe_deployment(
    deploy_call: &MetaCall,
    proxy_creation_code: &[u8],
    expected: Address,
) -> Result<(), PlanError> {
    let decoded = createProxyWithNonceCall::abi_decode(&deploy_call.data, true).map_err(|e| {
        PlanError::MalformedDeploymentCall {
            label: "child safe",
            reason: e.to_string(),
        }
    })?;

    let recomputed = predict_safe_address(
        deploy_call.to,
        decoded._singleton,
        proxy_creation_code,
        &decoded.initializer,
        decoded.saltNonce,
    )?;

    if recomputed != expected {
        return Err(PlanError::PredictionMismatch {
            label: "child safe",
            expected,
            recomputed,
        });
    }
    Ok(())
}

/// Same cross-check for a minimal-proxy module deployment.
fn verify_module_deployment(
    deploy_call: &MetaCall,
    factory: Address,
    expected: Address,
    label: &'static str,
) -> Result<(), PlanError> {
    let decoded = deployModuleCall::abi_decode(&deploy_call.data, true).map_err(|e| {
        PlanError::MalformedDeploymentCall {
            label,
            reason: e.to_string(),
        }
    })?;

    let recomputed = predict_module_address(
        factory,
        decoded.masterCopy,
        &decoded.initializer,
        decoded.saltNonce,
    );

    if recomputed != expected {
        return Err(PlanError::PredictionMismatch {
            label,
            expected,
            recomputed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addresses::Chain;
    use crate::calls::{decode_multi_send, pre_approved_signature, CallKind};
    use crate::config::{DisputeParams, FundingToken, ProposalMetadata};
    use crate::interfaces::{execTransactionCall, multiSendCall};
    use alloy_primitives::address;

    fn fixture_config() -> PlanConfig {
        PlanConfig {
            parent_safe: address!("fcf7a2794D066110162ADdcE3085dfd6221D4ddD"),
            child_safe_name: "Child Treasury".to_string(),
            child_owners: vec![
                Address::with_last_byte(0x11),
                Address::with_last_byte(0x22),
                Address::with_last_byte(0x33),
            ],
            child_threshold: 2,
            ens_name: "parent.eth".to_string(),
            ens_ipfs_hash: "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".to_string(),
            funding_tokens: vec![FundingToken {
                address: Address::with_last_byte(0x77),
                amount: U256::from(1_500_000u64),
            }],
            dispute: DisputeParams {
                template_id: U256::from(31u64),
                minimum_bond: U256::from(10u64).pow(U256::from(18u64)),
                question_timeout: 86_400,
                question_cooldown: 172_800,
                answer_expiration: 604_800,
            },
            metadata: ProposalMetadata {
                title: "Bootstrap child treasury".to_string(),
                description: "Deploys and wires the child Safe.".to_string(),
                documentation_url: "https://example.com/proposal".to_string(),
            },
        }
    }

    // Any non-empty byte string works for the factory creation code; the
    // prediction math treats it as opaque.
    const CREATION_CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52, 0xca, 0xfe];

    fn fixed_nonce() -> U256 {
        U256::from(0xdecafu64)
    }

    fn assemble() -> ProposalPlan {
        assemble_proposal(
            &fixture_config(),
            &Chain::Sepolia.contract_addresses(),
            CREATION_CODE,
            fixed_nonce(),
        )
        .unwrap()
    }

    #[test]
    fn produces_four_entries_in_fixed_order() {
        let contracts = Chain::Sepolia.contract_addresses();
        let plan = assemble();
        assert_eq!(plan.entries.len(), 4);

        assert_eq!(plan.entries[0].to, contracts.ens_public_resolver);
        assert_eq!(plan.entries[1].to, contracts.multi_send_call_only);
        assert_eq!(plan.entries[1].operation, CallKind::Call);
        assert_eq!(plan.entries[2].to, contracts.subdao_registry);
        assert_eq!(plan.entries[3].to, contracts.multi_send_call_only);
        assert_eq!(plan.entries[3].operation, CallKind::DelegateCall);
    }

    #[test]
    fn omits_funding_batch_when_no_tokens_configured() {
        let mut config = fixture_config();
        config.funding_tokens.clear();
        let plan = assemble_proposal(
            &config,
            &Chain::Sepolia.contract_addresses(),
            CREATION_CODE,
            fixed_nonce(),
        )
        .unwrap();
        assert_eq!(plan.entries.len(), 3);
    }

    #[test]
    fn deployment_batch_has_deploys_then_one_self_execute() {
        let contracts = Chain::Sepolia.contract_addresses();
        let plan = assemble();

        let outer = multiSendCall::abi_decode(&plan.entries[1].data, true).unwrap();
        let batch = decode_multi_send(&outer.transactions).unwrap();
        assert_eq!(batch.len(), 4);

        assert_eq!(batch[0].to, contracts.safe_proxy_factory);
        assert_eq!(batch[1].to, contracts.module_proxy_factory);
        assert_eq!(batch[2].to, contracts.module_proxy_factory);
        assert_eq!(batch[3].to, plan.predicted.child_safe);

        let exec = execTransactionCall::abi_decode(&batch[3].data, true).unwrap();
        assert_eq!(exec.to, contracts.multi_send_call_only);
        assert_eq!(exec.operation, 1);
        assert_eq!(
            exec.signatures,
            pre_approved_signature(contracts.multi_send_call_only)
        );
    }

    #[test]
    fn inner_batch_configures_then_renounces() {
        let contracts = Chain::Sepolia.contract_addresses();
        let config = fixture_config();
        let plan = assemble();

        let outer = multiSendCall::abi_decode(&plan.entries[1].data, true).unwrap();
        let batch = decode_multi_send(&outer.transactions).unwrap();
        let exec = execTransactionCall::abi_decode(&batch[3].data, true).unwrap();
        let inner_send = multiSendCall::abi_decode(&exec.data, true).unwrap();
        let inner = decode_multi_send(&inner_send.transactions).unwrap();
        assert_eq!(inner.len(), 4);

        let enable_control = enableModuleCall::abi_decode(&inner[0].data, true).unwrap();
        assert_eq!(inner[0].to, plan.predicted.child_safe);
        assert_eq!(enable_control.module, plan.predicted.control_module);

        let enable_dispute = enableModuleCall::abi_decode(&inner[1].data, true).unwrap();
        assert_eq!(enable_dispute.module, plan.predicted.dispute_module);

        let remove = removeOwnerCall::abi_decode(&inner[2].data, true).unwrap();
        assert_eq!(remove.owner, contracts.multi_send_call_only);
        // Identity lookup: the transient owner was appended last, so its
        // predecessor in the linked list is the last real owner.
        assert_eq!(remove.prevOwner, *config.child_owners.last().unwrap());
        assert_eq!(remove._threshold, U256::from(config.child_threshold));

        let rename = updateDAONameCall::abi_decode(&inner[3].data, true).unwrap();
        assert_eq!(inner[3].to, contracts.subdao_registry);
        assert_eq!(rename._name, config.child_safe_name);
    }

    #[test]
    fn declaration_references_the_predicted_child_safe() {
        let plan = assemble();
        let declared = declareSubDAOCall::abi_decode(&plan.entries[2].data, true).unwrap();
        assert_eq!(declared._subDAOAddress, plan.predicted.child_safe);
    }

    #[test]
    fn funding_batch_transfers_to_the_predicted_child_safe() {
        let config = fixture_config();
        let plan = assemble();

        let outer = multiSendCall::abi_decode(&plan.entries[3].data, true).unwrap();
        let transfers = decode_multi_send(&outer.transactions).unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].to, config.funding_tokens[0].address);

        let transfer = transferCall::abi_decode(&transfers[0].data, true).unwrap();
        assert_eq!(transfer.to, plan.predicted.child_safe);
        assert_eq!(transfer.amount, config.funding_tokens[0].amount);
    }

    // Independent recomputation: the module address referenced by the plan
    // equals predict(factory, salt(initializer, nonce), minimalProxyHash(master)).
    #[test]
    fn module_prediction_is_reproducible_from_parts() {
        let contracts = Chain::Sepolia.contract_addresses();
        let config = fixture_config();
        let plan = assemble();

        let initializer =
            control_module_initializer(config.parent_safe, plan.predicted.child_safe);
        let independent = predict_module_address(
            contracts.module_proxy_factory,
            contracts.control_module_master_copy,
            &initializer,
            fixed_nonce(),
        );
        assert_eq!(independent, plan.predicted.control_module);
    }

    #[test]
    fn same_nonce_same_plan_different_nonce_different_addresses() {
        let config = fixture_config();
        let contracts = Chain::Sepolia.contract_addresses();
        let a = assemble_proposal(&config, &contracts, CREATION_CODE, fixed_nonce()).unwrap();
        let b = assemble_proposal(&config, &contracts, CREATION_CODE, fixed_nonce()).unwrap();
        assert_eq!(a, b);

        let c =
            assemble_proposal(&config, &contracts, CREATION_CODE, U256::from(2u64)).unwrap();
        assert_ne!(a.predicted, c.predicted);
    }

    #[test]
    fn empty_owner_list_fails_before_any_prediction() {
        let mut config = fixture_config();
        config.child_owners.clear();
        for threshold in [0u64, 1] {
            config.child_threshold = threshold;
            let err = assemble_proposal(
                &config,
                &Chain::Sepolia.contract_addresses(),
                CREATION_CODE,
                fixed_nonce(),
            )
            .unwrap_err();
            // No partial plan: validation rejects the config outright.
            assert!(matches!(
                err,
                PlanError::InvalidThreshold { .. } | PlanError::NoOwners
            ));
        }
    }

    #[test]
    fn threshold_above_owner_count_is_rejected() {
        let mut config = fixture_config();
        config.child_threshold = 4;
        let err = assemble_proposal(
            &config,
            &Chain::Sepolia.contract_addresses(),
            CREATION_CODE,
            fixed_nonce(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidThreshold {
                threshold: 4,
                owners: 3
            }
        );
    }

    #[test]
    fn remove_owner_uses_sentinel_when_transient_owner_is_first() {
        let transient = Address::with_last_byte(0xee);
        let owners = vec![transient, Address::with_last_byte(0x11)];
        let call =
            remove_transient_owner_call(Address::with_last_byte(0x50), &owners, transient, 1)
                .unwrap();
        let decoded = removeOwnerCall::abi_decode(&call.data, true).unwrap();
        assert_eq!(decoded.prevOwner, SENTINEL_ADDRESS);
    }

    #[test]
    fn remove_owner_requires_the_transient_owner_to_be_listed() {
        let owners = vec![Address::with_last_byte(0x11)];
        let missing = Address::with_last_byte(0xee);
        assert_eq!(
            remove_transient_owner_call(Address::with_last_byte(0x50), &owners, missing, 1)
                .unwrap_err(),
            PlanError::TransientOwnerMissing(missing)
        );
    }

    #[test]
    fn submit_calldata_carries_all_entries_and_metadata() {
        let plan = assemble();
        let strategy = Address::with_last_byte(0x99);
        let calldata = plan.submit_calldata(strategy);

        let decoded = submitProposalCall::abi_decode(&calldata, true).unwrap();
        assert_eq!(decoded._strategy, strategy);
        assert!(decoded._data.is_empty());
        assert_eq!(decoded._transactions.len(), plan.entries.len());
        assert_eq!(decoded._transactions[2].to, plan.entries[2].to);
        assert!(decoded._metadata.contains("Bootstrap child treasury"));
    }
}
