use std::iter;

use rand::{prelude::thread_rng, Rng};

pub const CODE_LENGTH: usize = 6;

// Excludes 0/O and 1/I/L so codes survive being read aloud or copied
// from a projector.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

pub fn generate_code() -> String {
    let mut rng = thread_rng();
    iter::repeat(())
        .map(|()| {
            let idx = rng.gen_range(0, CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .take(CODE_LENGTH)
        .collect()
}
