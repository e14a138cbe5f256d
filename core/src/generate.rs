use rand::Rng;

/// Symbols the generator draws from: lowercase, uppercase, then digits.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Overwrite every byte of `buf` with a symbol sampled uniformly from
/// [`ALPHABET`].
///
/// The buffer is a fixed-length byte array, not a C string; nothing past
/// `buf.len()` is written and no terminator is implied. An empty buffer
/// consumes no entropy.
pub fn fill_random<R: Rng + ?Sized>(buf: &mut [u8], rng: &mut R) {
    if buf.is_empty() {
        return;
    }
    for byte in buf.iter_mut() {
        *byte = ALPHABET[rng.gen_range(0..ALPHABET.len())];
    }
}

pub fn random_string<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf, rng);
    buf
}
