//! Storage account naming rules.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::AccountError;

/// Minimum account name length.
pub const MIN_NAME_LEN: usize = 3;
/// Maximum account name length.
pub const MAX_NAME_LEN: usize = 24;

const NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Checks that `name` is 3-24 lowercase letters or digits.
pub fn validate_account_name(name: &str) -> Result<(), AccountError> {
    let invalid = |reason: &str| AccountError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        return Err(invalid("must be between 3 and 24 characters long"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return Err(invalid("may contain only lowercase letters and digits"));
    }
    Ok(())
}

/// Returns `len` random characters drawn from the account name alphabet.
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let index = Uniform::from(0..NAME_ALPHABET.len());
    (0..len)
        .map(|_| NAME_ALPHABET[index.sample(rng)] as char)
        .collect()
}

/// Returns `prefix` followed by `len` random name characters.
pub fn random_account_name(prefix: &str, len: usize) -> String {
    format!("{}{}", prefix, random_suffix(&mut rand::thread_rng(), len))
}
