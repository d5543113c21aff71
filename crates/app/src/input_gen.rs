//! Sample data generation for trying the codec.
//!
//! `huffpack sample` writes a deterministic file whose sections stress the
//! Huffman coder differently:
//! - English-like text with skewed letter frequencies (short codes dominate)
//! - Long runs of one byte (one-bit codes)
//! - Small-alphabet binary records (balanced codes)
//! - Uniform random bytes (no gain, eight-bit codes)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Section length before switching to another kind of content.
const SECTION_BYTES: usize = 4096;

/// Letters and their rough relative frequency in English prose.
const LETTERS: &[(u8, u32)] = &[
    (b' ', 180),
    (b'e', 120),
    (b't', 90),
    (b'a', 80),
    (b'o', 75),
    (b'i', 70),
    (b'n', 67),
    (b's', 63),
    (b'h', 61),
    (b'r', 60),
    (b'd', 43),
    (b'l', 40),
    (b'c', 28),
    (b'u', 28),
    (b'm', 24),
    (b'w', 24),
    (b'f', 22),
    (b'g', 20),
    (b'y', 20),
    (b'p', 19),
    (b'b', 15),
    (b',', 12),
    (b'.', 10),
    (b'v', 10),
    (b'k', 8),
    (b'\n', 6),
    (b'j', 2),
    (b'x', 2),
    (b'q', 1),
    (b'z', 1),
];

/// Generate `size_bytes` of mixed-compressibility data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    let letter_total: u32 = LETTERS.iter().map(|&(_, w)| w).sum();

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(SECTION_BYTES);

        match rng.gen_range(0..10u8) {
            // 50% prose-like text
            0..=4 => {
                data.extend((0..section).map(|_| pick_letter(rng.gen_range(0..letter_total))));
            }

            // 20% runs
            5..=6 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(section));
            }

            // 20% records over a 4-symbol alphabet
            7..=8 => {
                let alphabet: [u8; 4] = rng.gen();
                data.extend((0..section).map(|_| alphabet[rng.gen_range(0..4)]));
            }

            // 10% noise
            _ => {
                data.extend((0..section).map(|_| rng.gen::<u8>()));
            }
        }
    }

    data
}

/// Map a point in `0..letter_total` to its letter.
fn pick_letter(mut point: u32) -> u8 {
    for &(letter, weight) in LETTERS {
        if point < weight {
            return letter;
        }
        point -= weight;
    }
    b' '
}
