//! # Commitment Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Canonical sort + Merkle build, 10k claims | < 50ms |
//! | Inclusion proof generation | < 10µs |
//! | Claim canonical digest | < 5µs |

use ac_01_commitment::{mask_root, MerkleTree, Salt};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::{keccak256, AttestationClaim, Hash, U256};
use std::time::Duration;

fn random_claims(n: usize) -> Vec<AttestationClaim> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|i| {
            let signature: Vec<u8> = (0..65).map(|_| rng.gen()).collect();
            AttestationClaim {
                attestation_type: 1,
                timestamp: 1_700_000_000,
                block_number: rng.gen_range(0..1_000),
                transaction_index: rng.gen_range(0..64),
                data_hash: keccak256(&signature),
                signature,
                instructions: U256::from(i as u64),
            }
        })
        .collect()
}

// ============================================================================
// Aggregation: sort + build + mask
// ============================================================================

fn bench_epoch_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("commitment-aggregation");
    group.measurement_time(Duration::from_secs(10));

    for size in [100, 1_000, 10_000] {
        let claims = random_claims(size);
        let salt = Salt::random();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sort_build_mask", size), &claims, |b, claims| {
            b.iter(|| {
                let mut sorted: Vec<&AttestationClaim> = claims.iter().collect();
                sorted.sort_by(|a, b| a.canonical_cmp(b));
                let ids: Vec<Hash> = sorted.iter().map(|c| c.data_hash).collect();
                let tree = MerkleTree::build(ids);
                black_box(mask_root(&tree.root(), &salt))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Proofs
// ============================================================================

fn bench_inclusion_proofs(c: &mut Criterion) {
    let mut group = c.benchmark_group("commitment-proofs");

    for size in [1_000, 10_000] {
        let ids: Vec<Hash> = (0..size as u64).map(|i| keccak256(&i.to_be_bytes())).collect();
        let tree = MerkleTree::build(ids);

        group.bench_with_input(BenchmarkId::new("generate", size), &tree, |b, tree| {
            let mut rng = rand::thread_rng();
            b.iter(|| black_box(tree.generate_proof(rng.gen_range(0..size))))
        });

        let proof = tree.generate_proof(size / 2).expect("index in range");
        group.bench_with_input(BenchmarkId::new("verify", size), &proof, |b, proof| {
            b.iter(|| black_box(proof.verify()))
        });
    }

    group.finish();
}

fn bench_canonical_digest(c: &mut Criterion) {
    let claims = random_claims(1);
    c.bench_function("claim_canonical_digest", |b| {
        b.iter(|| black_box(claims[0].canonical_digest()))
    });
}

criterion_group!(
    benches,
    bench_epoch_aggregation,
    bench_inclusion_proofs,
    bench_canonical_digest
);
criterion_main!(benches);
