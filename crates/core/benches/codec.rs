use criterion::{black_box, criterion_group, criterion_main, Criterion};
use huffpack_core::container::{decode_bytes, encode_bytes};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn text_like(size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let alphabet = b"abcdefghijklmnopqrstuvwxyz .!,\n";
    (0..size)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

fn huffman_encode(c: &mut Criterion) {
    let input = text_like(256 * 1024);

    c.bench_function("huffman encode 256K", |b| {
        b.iter(|| encode_bytes(black_box(&input)))
    });
}

fn huffman_decode(c: &mut Criterion) {
    let input = text_like(256 * 1024);
    let packed = encode_bytes(&input).unwrap();

    c.bench_function("huffman decode 256K", |b| {
        b.iter(|| decode_bytes(black_box(&packed)))
    });
}

criterion_group!(benches, huffman_encode, huffman_decode);
criterion_main!(benches);
