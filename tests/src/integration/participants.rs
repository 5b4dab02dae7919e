//! # Independent Participants
//!
//! Several attesters run the protocol on their own, each with its own salt
//! and its own arrival order. Agreement comes only from computing the same
//! root over the same validated input.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ac_01_commitment::{mask_root, verify_reveal, Salt, SaltSource};
    use ac_02_epoch_attester::{
        AttestationSubmission, AttesterApi, AttesterConfig, ClaimValidator, EpochRegistry,
        ManualScheduler, ManualTimeSource,
    };
    use attester_runtime::{DigestValidator, LoggingSubmitter};
    use rand::seq::SliceRandom;
    use rand::{rngs::StdRng, SeedableRng};
    use shared_types::{AttestationClaim, AttestationType, Hash};

    use crate::integration::fixtures::{tampered_claim, valid_claim};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const REVEAL_SENT_AT: u64 = 2_125_003;

    struct FixedSalt([u8; 32]);

    impl SaltSource for FixedSalt {
        fn next_salt(&self) -> Salt {
            Salt::new(self.0)
        }
    }

    struct Participant {
        registry: EpochRegistry,
        clock: Arc<ManualTimeSource>,
        scheduler: Arc<ManualScheduler>,
        submitter: Arc<LoggingSubmitter>,
    }

    impl Participant {
        fn new(salt: u8) -> Self {
            let config = AttesterConfig {
                first_epoch_start_secs: 1_000,
                epoch_period_secs: 90,
                reveal_delay_secs: 45,
                ..Default::default()
            };
            let clock = Arc::new(ManualTimeSource::new(1_950_000));
            let scheduler = Arc::new(ManualScheduler::new());
            let submitter = Arc::new(LoggingSubmitter::new());
            let registry = EpochRegistry::new(
                config,
                submitter.clone(),
                Arc::new(FixedSalt([salt; 32])),
                clock.clone(),
                scheduler.clone(),
            )
            .unwrap()
            .with_validator(
                AttestationType::PaymentProof,
                Arc::new(DigestValidator) as Arc<dyn ClaimValidator>,
            );
            Self {
                registry,
                clock,
                scheduler,
                submitter,
            }
        }

        async fn receive(&self, claims: &[AttestationClaim]) {
            for claim in claims {
                self.registry.submit_claim(claim.clone()).await;
            }
            settle().await;
        }

        async fn run_through_reveal(&self) -> (AttestationSubmission, AttestationSubmission) {
            self.scheduler.run_until(&self.clock, REVEAL_SENT_AT).await;
            settle().await;
            let sent = self.submitter.submissions();
            assert_eq!(sent.len(), 2, "expected one commit and one reveal");
            (sent[0].clone(), sent[1].clone())
        }
    }

    async fn settle() {
        for _ in 0..32 {
            tokio::task::yield_now().await;
        }
    }

    fn epoch_claims() -> Vec<AttestationClaim> {
        (0..12u64)
            .map(|i| valid_claim(1_950 + i, 500 + i % 4, (i * 7 % 5) as u32, &[i as u8]))
            .chain([tampered_claim(1_960, 501), tampered_claim(1_961, 777)])
            .collect()
    }

    fn observed_root(commit: &AttestationSubmission, reveal: &AttestationSubmission) -> Hash {
        assert!(verify_reveal(&reveal.revealed_salt, &commit.committed_salt_hash));
        mask_root(&commit.masked_root, &Salt::new(reveal.revealed_salt))
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_participants_agree_on_root() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut roots = Vec::new();
        let mut masked = Vec::new();

        for salt in 1..=4u8 {
            let mut claims = epoch_claims();
            claims.shuffle(&mut rng);

            let participant = Participant::new(salt);
            participant.receive(&claims).await;
            let (commit, reveal) = participant.run_through_reveal().await;

            masked.push(commit.masked_root);
            roots.push(observed_root(&commit, &reveal));
        }

        // Same root underneath, different public commitments
        assert!(roots.windows(2).all(|w| w[0] == w[1]));
        masked.sort();
        masked.dedup();
        assert_eq!(masked.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_claim_changes_root() {
        let claims = epoch_claims();

        let full = Participant::new(1);
        full.receive(&claims).await;
        let (commit, reveal) = full.run_through_reveal().await;
        let full_root = observed_root(&commit, &reveal);

        let partial = Participant::new(1);
        partial.receive(&claims[1..]).await;
        let (commit, reveal) = partial.run_through_reveal().await;
        assert_ne!(observed_root(&commit, &reveal), full_root);
    }

    #[tokio::test]
    async fn test_tampered_claims_never_reach_the_root() {
        let claims = epoch_claims();
        let honest: Vec<AttestationClaim> = claims
            .iter()
            .filter(|c| c.canonical_digest() == c.data_hash)
            .cloned()
            .collect();

        let with_noise = Participant::new(9);
        with_noise.receive(&claims).await;
        let (commit, reveal) = with_noise.run_through_reveal().await;

        let clean = Participant::new(9);
        clean.receive(&honest).await;
        let (clean_commit, clean_reveal) = clean.run_through_reveal().await;

        assert_eq!(
            observed_root(&commit, &reveal),
            observed_root(&clean_commit, &clean_reveal)
        );
        assert_eq!(commit, clean_commit);
    }
}
