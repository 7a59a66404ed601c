//! Fixed-width base62 encoding of 64-bit ids.
//!
//! Tokens are positional base-62 numbers over [`ALPHABET`], most significant
//! digit first, left-padded with `'0'` to [`TOKEN_LEN`] characters. Since
//! `62^11 > 2^64`, every `u64` fits without truncation. Note that the
//! alphabet order is not ASCII order, so tokens do not sort like their ids.

/// Digits, then lowercase, then uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Width of every encoded token.
pub const TOKEN_LEN: usize = 11;

const BASE: u64 = ALPHABET.len() as u64;

/// Encode `id` as an 11-character token.
pub fn encode(id: u64) -> String {
    let mut digits = [ALPHABET[0]; TOKEN_LEN];
    let mut remaining = id;
    let mut position = TOKEN_LEN;
    while remaining > 0 {
        position -= 1;
        digits[position] = ALPHABET[(remaining % BASE) as usize];
        remaining /= BASE;
    }
    digits.iter().map(|&digit| char::from(digit)).collect()
}

fn digit_value(symbol: u8) -> Option<u64> {
    let value = match symbol {
        b'0'..=b'9' => symbol - b'0',
        b'a'..=b'z' => symbol - b'a' + 10,
        b'A'..=b'Z' => symbol - b'A' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}

/// Decode a token back into its id.
///
/// # Returns
/// `None` when `token` is not exactly [`TOKEN_LEN`] alphabet symbols or the
/// value does not fit in a `u64`.
pub fn decode(token: &str) -> Option<u64> {
    if token.len() != TOKEN_LEN {
        return None;
    }
    token.bytes().try_fold(0u64, |acc, symbol| {
        acc.checked_mul(BASE)?.checked_add(digit_value(symbol)?)
    })
}

/// Whether `token` could have been produced by [`encode`].
pub fn is_well_formed(token: &str) -> bool {
    decode(token).is_some()
}
