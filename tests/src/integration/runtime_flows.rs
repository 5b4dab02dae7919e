//! # Runtime Flows
//!
//! Runs the full runtime (intake, digest validation, tokio timers, dry-run
//! submitter, pruner) on tokio's paused clock.
//!
//! Calendar: epoch 0 at 1000s, 90s phases, 45s reveal delay, 270s retention.
//! The clock starts at 1_950_000 ms, inside epoch 10's collect window.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ac_01_commitment::{mask_root, verify_reveal, MerkleTree, Salt};
    use ac_02_epoch_attester::{
        AttesterApi, AttesterConfig, CommitStatus, EpochPhase, SubmissionKind, TokioTimeSource,
    };
    use attester_runtime::{AttesterRuntime, IntakeStats, RuntimeConfig};
    use shared_types::{AttestationClaim, AttestationType};
    use tokio::io::BufReader;

    use crate::integration::fixtures::{json_lines, tampered_claim, valid_claim};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const START_MS: u64 = 1_950_000;
    const COMMIT_AT: u64 = 1_990_001;
    const REVEAL_SENT_AT: u64 = 2_125_003;
    const COMPLETE_AT: u64 = 2_170_006;
    const RETENTION_MS: u64 = 270_000;

    fn runtime() -> AttesterRuntime {
        let config = RuntimeConfig {
            attester: AttesterConfig {
                first_epoch_start_secs: 1_000,
                epoch_period_secs: 90,
                reveal_delay_secs: 45,
                retention_secs: 270,
                ..Default::default()
            },
            prune_interval_secs: 60,
        };
        AttesterRuntime::with_clock(config, Arc::new(TokioTimeSource::starting_at(START_MS)))
            .expect("valid config")
    }

    /// Sleep on the paused clock until wall time `t_ms`.
    async fn sleep_until_wall(t_ms: u64) {
        tokio::time::sleep(Duration::from_millis(t_ms - START_MS)).await;
    }

    async fn feed(runtime: &AttesterRuntime, input: String) -> IntakeStats {
        runtime
            .spawn_intake(BufReader::new(std::io::Cursor::new(input.into_bytes())))
            .await
            .expect("intake task")
    }

    fn sorted_root(claims: &[&AttestationClaim]) -> [u8; 32] {
        let mut sorted = claims.to_vec();
        sorted.sort_by(|a, b| a.canonical_cmp(b));
        MerkleTree::build(sorted.iter().map(|c| c.data_hash).collect()).root()
    }

    // =============================================================================
    // INTEGRATION TESTS: INTAKE → COMMIT → REVEAL → EVICTION
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_epoch_runs_end_to_end() {
        let runtime = runtime();
        let _pruner = runtime.spawn_pruner();

        let a = valid_claim(1_950, 120, 4, b"a");
        let b = valid_claim(1_951, 118, 9, b"b");
        let c = valid_claim(1_960, 120, 1, b"c");
        let bad = tampered_claim(1_955, 119);
        let mut ignored = valid_claim(1_952, 121, 0, b"i");
        ignored.attestation_type = AttestationType::BalanceDecreasingProof.tag();
        let late = valid_claim(1_880, 100, 0, b"l");

        let mut input = json_lines(&[a.clone(), bad.clone(), b.clone(), ignored, late, c.clone()]);
        input.push_str("\n{not json}\n");

        let stats = feed(&runtime, input).await;
        assert_eq!(
            stats,
            IntakeStats {
                lines: 7,
                malformed: 1,
                accepted: 4,
                rejected: 2,
            }
        );

        // The late claim never created epoch 9
        let registry = runtime.registry();
        assert_eq!(registry.tracked_epochs(), vec![10]);

        // Commit
        sleep_until_wall(COMMIT_AT + 1).await;
        let submissions = runtime.submitter().submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].kind(), SubmissionKind::Commit);
        assert_eq!(submissions[0].buffer_number, 11);

        let snapshot = registry.epoch_snapshot(10).unwrap();
        assert_eq!(snapshot.commit_status, CommitStatus::Committed);
        assert_eq!(snapshot.total_records, 4);
        assert_eq!(snapshot.valid_records, 3);

        // Reveal
        sleep_until_wall(REVEAL_SENT_AT + 1).await;
        let submissions = runtime.submitter().submissions();
        assert_eq!(submissions.len(), 2);
        let (commit, reveal) = (&submissions[0], &submissions[1]);
        assert_eq!(reveal.buffer_number, 12);
        assert!(verify_reveal(&reveal.revealed_salt, &commit.committed_salt_hash));

        let root = mask_root(&commit.masked_root, &Salt::new(reveal.revealed_salt));
        assert_eq!(root, sorted_root(&[&a, &b, &c]));
        assert_eq!(snapshot.root, Some(root));
        assert_eq!(
            registry.epoch_snapshot(10).unwrap().commit_status,
            CommitStatus::Revealed
        );

        for claim in [&a, &b, &c] {
            let proof = registry.inclusion_proof(10, &claim.data_hash).unwrap();
            assert!(proof.verify());
            assert_eq!(proof.root, root);
        }
        assert!(registry.inclusion_proof(10, &bad.data_hash).is_none());

        // Completion, then eviction by the periodic pruner
        sleep_until_wall(COMPLETE_AT + 1).await;
        assert_eq!(
            registry.epoch_snapshot(10).unwrap().phase,
            EpochPhase::Completed
        );
        sleep_until_wall(COMPLETE_AT + RETENTION_MS + 61_000).await;
        assert!(registry.epoch_snapshot(10).is_none());

        runtime.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignored_only_epoch_commits_nothing() {
        let runtime = runtime();
        let mut ignored = valid_claim(1_950, 1, 0, b"i");
        ignored.attestation_type = AttestationType::BalanceDecreasingProof.tag();

        let stats = feed(&runtime, json_lines(&[ignored])).await;
        assert_eq!(stats.rejected, 1);

        sleep_until_wall(COMPLETE_AT + 1).await;
        let snapshot = runtime.registry().epoch_snapshot(10).unwrap();
        assert_eq!(snapshot.commit_status, CommitStatus::Error);
        assert_eq!(snapshot.phase, EpochPhase::Completed);
        assert!(runtime.submitter().submissions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_epochs_overlap() {
        let runtime = runtime();
        let first = valid_claim(1_950, 1, 0, b"x");
        feed(&runtime, json_lines(&[first.clone()])).await;

        // Epoch 11 collects while epoch 10 commits
        sleep_until_wall(2_000_000).await;
        let second = valid_claim(2_000, 2, 0, b"y");
        let stats = feed(&runtime, json_lines(&[second.clone()])).await;
        assert_eq!(stats.accepted, 1);

        sleep_until_wall(2_300_000).await;
        let buffers: Vec<(u64, SubmissionKind)> = runtime
            .submitter()
            .submissions()
            .iter()
            .map(|s| (s.buffer_number, s.kind()))
            .collect();
        assert_eq!(
            buffers,
            vec![
                (11, SubmissionKind::Commit),
                (12, SubmissionKind::Commit),
                (12, SubmissionKind::Reveal),
                (13, SubmissionKind::Reveal),
            ]
        );
    }
}
