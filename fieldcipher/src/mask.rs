//! Log-safe masking of sensitive text.
//!
//! Cosmetic only. Masked output is for logs and support screens, never for
//! security decisions.

/// Returned for inputs too short to partially reveal.
pub const SHORT_MASK: &str = "***";

/// Character used to hide the middle of a value.
pub const MASK_CHAR: char = '*';

/// Inputs shorter than this are fully masked.
const MIN_MASKED_LEN: usize = 8;

/// Characters revealed at each end.
const REVEAL: usize = 3;

/// Upper bound on the run of mask characters.
const MAX_MASK_RUN: usize = 10;

/// Masks `text`, keeping its first and last three characters.
///
/// Lengths are counted in characters, not bytes.
///
/// # Example
///
/// ```
/// use fieldcipher::mask::mask_sensitive;
///
/// assert_eq!(mask_sensitive("abcdefghij"), "abc****hij");
/// assert_eq!(mask_sensitive("ab"), "***");
/// ```
#[must_use]
pub fn mask_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < MIN_MASKED_LEN {
        return SHORT_MASK.to_string();
    }

    let run = (chars.len() - 2 * REVEAL).min(MAX_MASK_RUN);
    let mut masked = String::with_capacity(2 * REVEAL + run);
    masked.extend(&chars[..REVEAL]);
    masked.extend(std::iter::repeat(MASK_CHAR).take(run));
    masked.extend(&chars[chars.len() - REVEAL..]);
    masked
}

/// Masks an optional value; `None` masks like a short input.
#[must_use]
pub fn mask_optional(text: Option<&str>) -> String {
    text.map_or_else(|| SHORT_MASK.to_string(), mask_sensitive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input() {
        assert_eq!(mask_sensitive(""), SHORT_MASK);
        assert_eq!(mask_sensitive("ab"), SHORT_MASK);
        assert_eq!(mask_sensitive("abcdefg"), SHORT_MASK);
    }

    #[test]
    fn test_minimum_length() {
        assert_eq!(mask_sensitive("abcdefgh"), "abc**fgh");
    }

    #[test]
    fn test_reveals_six_characters() {
        let masked = mask_sensitive("abcdefghij");
        assert_eq!(masked, "abc****hij");
        assert_eq!(masked.chars().filter(|c| *c != MASK_CHAR).count(), 6);
    }

    #[test]
    fn test_mask_run_is_capped() {
        let masked = mask_sensitive("4111111111111111111111");
        assert_eq!(masked, "411**********111");
        assert_eq!(masked.chars().filter(|c| *c == MASK_CHAR).count(), MAX_MASK_RUN);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(mask_sensitive("çğışöüÇĞİŞ"), "çğı****ĞİŞ");
    }

    #[test]
    fn test_optional() {
        assert_eq!(mask_optional(None), SHORT_MASK);
        assert_eq!(mask_optional(Some("abcdefghij")), "abc****hij");
    }
}
