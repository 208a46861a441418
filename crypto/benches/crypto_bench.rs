use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vigil_types::SubmoduleId;

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| vigil_crypto::blake2b_256(black_box(&data)))
    });
}

fn blake2b_256_1kb_bench(c: &mut Criterion) {
    let data = vec![0xCDu8; 1024];

    c.bench_function("blake2b_256_1KB", |b| {
        b.iter(|| vigil_crypto::blake2b_256(black_box(&data)))
    });
}

fn blake2b_multi_bench(c: &mut Criterion) {
    let parts: Vec<&[u8]> = vec![&[1u8; 32], &[2u8; 64], &[3u8; 128]];

    c.bench_function("blake2b_256_multi_3parts", |b| {
        b.iter(|| vigil_crypto::blake2b_256_multi(black_box(&parts)))
    });
}

fn verification_key_bench(c: &mut Criterion) {
    let submodule = SubmoduleId::new([7u8; 32]);
    let message = vec![0xEEu8; 512];

    c.bench_function("verification_key_512B", |b| {
        b.iter(|| vigil_crypto::verification_key(black_box(&message), &submodule))
    });
}

fn verification_key_small_bench(c: &mut Criterion) {
    let submodule = SubmoduleId::new([7u8; 32]);
    let message = [0x11u8; 32];

    c.bench_function("verification_key_32B", |b| {
        b.iter(|| vigil_crypto::verification_key(black_box(&message), &submodule))
    });
}

criterion_group!(
    benches,
    blake2b_256_bench,
    blake2b_256_1kb_bench,
    blake2b_multi_bench,
    verification_key_bench,
    verification_key_small_bench,
);
criterion_main!(benches);
