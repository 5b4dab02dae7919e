//! # Claim Intake
//!
//! Reads claims as JSON lines and hands each to the registry. Blank lines are
//! skipped; malformed lines are logged and counted.

use std::sync::Arc;

use ac_02_epoch_attester::{AttesterApi, ClaimDisposition};
use shared_types::AttestationClaim;
use tokio::io::AsyncBufRead;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Counters for one intake run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeStats {
    pub lines: usize,
    pub malformed: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Consume `reader` until EOF.
pub async fn run_intake<R>(reader: R, api: Arc<dyn AttesterApi>) -> std::io::Result<IntakeStats>
where
    R: AsyncBufRead + Unpin,
{
    use tokio::io::AsyncBufReadExt;

    let mut stats = IntakeStats::default();
    let mut lines = LinesStream::new(reader.lines());

    while let Some(line) = lines.next().await {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        let claim: AttestationClaim = match serde_json::from_str(line) {
            Ok(claim) => claim,
            Err(e) => {
                warn!(line = stats.lines, error = %e, "malformed claim");
                stats.malformed += 1;
                continue;
            }
        };

        match api.submit_claim(claim).await {
            ClaimDisposition::Accepted { epoch_id, index } => {
                debug!(epoch_id, index, "claim accepted");
                stats.accepted += 1;
            }
            other => {
                debug!(disposition = ?other, "claim not accepted");
                stats.rejected += 1;
            }
        }
    }

    info!(
        lines = stats.lines,
        accepted = stats.accepted,
        rejected = stats.rejected,
        malformed = stats.malformed,
        "claim intake finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_01_commitment::MerkleProof;
    use ac_02_epoch_attester::{EpochId, EpochSnapshot};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared_types::{Hash, U256};
    use tokio::io::BufReader;

    /// Accepts even block numbers, rejects odd ones.
    #[derive(Default)]
    struct ParityApi {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl AttesterApi for ParityApi {
        async fn submit_claim(&self, claim: AttestationClaim) -> ClaimDisposition {
            self.seen.lock().push(claim.block_number);
            if claim.block_number % 2 == 0 {
                ClaimDisposition::Accepted {
                    epoch_id: 0,
                    index: 0,
                }
            } else {
                ClaimDisposition::RejectedLate { epoch_id: 0 }
            }
        }

        fn epoch_snapshot(&self, _epoch_id: EpochId) -> Option<EpochSnapshot> {
            None
        }

        fn tracked_epochs(&self) -> Vec<EpochId> {
            Vec::new()
        }

        fn inclusion_proof(&self, _epoch_id: EpochId, _data_hash: &Hash) -> Option<MerkleProof> {
            None
        }

        fn prune_completed(&self) -> usize {
            0
        }
    }

    fn line(block_number: u64) -> String {
        let claim = AttestationClaim {
            attestation_type: 1,
            timestamp: 0,
            block_number,
            transaction_index: 0,
            signature: vec![0x01],
            instructions: U256::zero(),
            data_hash: [7; 32],
        };
        serde_json::to_string(&claim).unwrap()
    }

    #[tokio::test]
    async fn test_counts_every_outcome() {
        let input = format!("{}\n\n{}\nnot json\n{}\n", line(2), line(3), line(4));
        let api = Arc::new(ParityApi::default());

        let stats = run_intake(BufReader::new(input.as_bytes()), api.clone())
            .await
            .unwrap();

        assert_eq!(
            stats,
            IntakeStats {
                lines: 4,
                malformed: 1,
                accepted: 2,
                rejected: 1,
            }
        );
        assert_eq!(*api.seen.lock(), vec![2, 3, 4]);
    }
}
