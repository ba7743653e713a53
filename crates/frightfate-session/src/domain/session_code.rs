//! Human-shareable session codes.

use frightfate_core::error::DomainError;
use frightfate_core::rng::DeterministicRng;

/// Characters a code is drawn from.
pub const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every generated code.
pub const CODE_LEN: usize = 6;

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_CHARS: usize = 32;

/// Draws a fresh code from `rng`.
#[must_use]
pub fn generate(rng: &mut dyn DeterministicRng) -> String {
    let last = u32::try_from(ALPHABET.len() - 1).unwrap_or(0);
    (0..CODE_LEN)
        .map(|_| {
            let index = rng.next_u32_range(0, last) as usize;
            char::from(ALPHABET[index.min(ALPHABET.len() - 1)])
        })
        .collect()
}

/// Canonical form of a code typed by a player.
#[must_use]
pub fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Validates and trims a player display name.
///
/// # Errors
///
/// `DomainError::Validation` if the name is blank or too long.
pub fn player_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("player name is empty".to_owned()));
    }
    if name.chars().count() > MAX_PLAYER_NAME_CHARS {
        return Err(DomainError::Validation(format!(
            "player name longer than {MAX_PLAYER_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_owned())
}
