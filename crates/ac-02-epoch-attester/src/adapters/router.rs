//! Per-chain dispatch of payment-proof validation.
//!
//! A payment proof names its source chain in the instruction word. The router
//! decodes it and forwards the claim to the validator registered for that
//! chain.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{AttestationClaim, ChainType};
use tracing::debug;

use crate::domain::{EpochId, PendingAttestation};
use crate::ports::outbound::{ClaimValidator, ValidatorError};

#[derive(Default)]
pub struct ChainValidatorRouter {
    routes: HashMap<ChainType, Arc<dyn ClaimValidator>>,
}

impl ChainValidatorRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, chain: ChainType, validator: Arc<dyn ClaimValidator>) -> Self {
        self.routes.insert(chain, validator);
        self
    }

    pub fn chains(&self) -> Vec<ChainType> {
        let mut chains: Vec<ChainType> = self.routes.keys().copied().collect();
        chains.sort();
        chains
    }
}

#[async_trait]
impl ClaimValidator for ChainValidatorRouter {
    async fn validate(
        &self,
        epoch_id: EpochId,
        claim: AttestationClaim,
    ) -> Result<Option<PendingAttestation>, ValidatorError> {
        let chain_id = claim.chain_id();
        let validator = claim
            .chain_type()
            .ok()
            .and_then(|chain| self.routes.get(&chain))
            .ok_or(ValidatorError::UnsupportedChain { chain_id })?;
        debug!(epoch_id, chain_id, claim = %claim.short_id(), "routing payment proof");
        validator.validate(epoch_id, claim).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationVerdict;
    use shared_types::{instructions_for_chain, U256};

    struct Always(ValidationVerdict);

    #[async_trait]
    impl ClaimValidator for Always {
        async fn validate(
            &self,
            _epoch_id: EpochId,
            claim: AttestationClaim,
        ) -> Result<Option<PendingAttestation>, ValidatorError> {
            Ok(Some(PendingAttestation::resolved(claim, self.0)))
        }
    }

    fn claim(instructions: U256) -> AttestationClaim {
        AttestationClaim {
            attestation_type: 1,
            timestamp: 0,
            block_number: 1,
            transaction_index: 0,
            signature: vec![],
            instructions,
            data_hash: [9; 32],
        }
    }

    #[tokio::test]
    async fn test_routes_by_chain() {
        let router = ChainValidatorRouter::new()
            .with_chain(ChainType::Xrp, Arc::new(Always(ValidationVerdict::Valid)));
        assert_eq!(router.chains(), vec![ChainType::Xrp]);

        let pending = router
            .validate(0, claim(instructions_for_chain(ChainType::Xrp)))
            .await
            .unwrap();
        assert!(pending.is_some());
    }

    #[tokio::test]
    async fn test_unrouted_chain_rejected() {
        let router = ChainValidatorRouter::new()
            .with_chain(ChainType::Xrp, Arc::new(Always(ValidationVerdict::Valid)));

        let err = router
            .validate(0, claim(instructions_for_chain(ChainType::Btc)))
            .await
            .unwrap_err();
        assert_eq!(err, ValidatorError::UnsupportedChain { chain_id: 0 });

        let err = router
            .validate(0, claim(U256::from(999u64) << 224))
            .await
            .unwrap_err();
        assert_eq!(err, ValidatorError::UnsupportedChain { chain_id: 999 });
    }
}
