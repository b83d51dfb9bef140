//! Party invite-code generation and validation.
//!
//! Codes are short enough to read aloud, so ambiguity is kept low by using
//! upper-case letters and digits only. Uniqueness is only required among
//! active parties; the caller supplies the lookup.

use std::future::Future;

use rand::Rng;

use crate::error::CoreError;

/// Number of characters in an invite code.
pub const INVITE_CODE_LENGTH: usize = 6;

/// Maximum number of codes tried before giving up on finding a free one.
pub const MAX_INVITE_CODE_ATTEMPTS: usize = 10;

/// Characters an invite code may contain.
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random invite code of [`INVITE_CODE_LENGTH`] characters.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| INVITE_CODE_ALPHABET[rng.random_range(0..INVITE_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate codes until `is_taken` reports one as free.
///
/// Returns `Ok(None)` after [`MAX_INVITE_CODE_ATTEMPTS`] collisions. Errors
/// from the lookup abort the loop immediately.
pub async fn find_unique_invite_code<F, Fut, E>(mut is_taken: F) -> Result<Option<String>, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for _ in 0..MAX_INVITE_CODE_ATTEMPTS {
        let code = generate_invite_code();
        if !is_taken(code.clone()).await? {
            return Ok(Some(code));
        }
    }
    Ok(None)
}

/// Trim and upper-case user-entered invite codes.
pub fn normalize_invite_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Validate an already-normalized invite code.
pub fn validate_invite_code(code: &str) -> Result<(), CoreError> {
    if code.len() != INVITE_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "invite code must be {INVITE_CODE_LENGTH} characters, got {}",
            code.len()
        )));
    }
    if !code.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b)) {
        return Err(CoreError::Validation(
            "invite code may only contain letters and digits".to_string(),
        ));
    }
    Ok(())
}
