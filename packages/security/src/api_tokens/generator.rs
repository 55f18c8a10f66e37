// ABOUTME: Random token name and secret generation from the OS CSPRNG
// ABOUTME: Characters are drawn uniformly from [A-Za-z0-9]

use rand::distributions::Uniform;
use rand::rngs::OsRng;
use rand::Rng;

pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated token names, also the maximum for explicit names
pub const NAME_LENGTH: usize = 20;

/// 40 characters from a 62-symbol alphabet, about 240 bits of entropy
pub const SECRET_LENGTH: usize = 40;

/// Longest digest a token row may hold
pub const HASHED_SECRET_MAX_LENGTH: usize = 128;

/// Generate `size` random characters from [`ALPHABET`]
pub fn random_string(size: usize) -> String {
    let dist = Uniform::from(0..ALPHABET.len());
    let mut rng = OsRng;
    (0..size).map(|_| ALPHABET[rng.sample(dist)] as char).collect()
}

pub fn generate_name() -> String {
    random_string(NAME_LENGTH)
}

pub fn generate_secret() -> String {
    random_string(SECRET_LENGTH)
}
