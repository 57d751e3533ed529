use lazy_static::lazy_static;
use regex::Regex;
use tracing::error;

/// bcrypt cost factor. Hashing is the one intentionally expensive step in
/// registration.
const HASH_COST: u32 = 12;

lazy_static! {
    static ref HAS_UPPER: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref HAS_LOWER: Regex = Regex::new(r"[a-z]").unwrap();
    static ref HAS_DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
    static ref HAS_SPECIAL: Regex = Regex::new(r"[!@#$%^&]").unwrap();
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let hashed = bcrypt::hash(plain, HASH_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(hashed)
}

pub fn verify_password(plain: &str, hashed: &str) -> anyhow::Result<bool> {
    let matches = bcrypt::verify(plain, hashed).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(matches)
}

/// Password policy for registration. The first failing rule wins; `None`
/// means the password is acceptable. Bounds are strict on both ends:
/// lengths of exactly 8 or 72 are rejected.
pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.len() <= 8 {
        return Some("Password must be longer than 8 characters");
    }
    if password.len() >= 72 {
        return Some("Password must be less than 72 characters");
    }
    if password.starts_with(' ') || password.ends_with(' ') {
        return Some("Password must not start or end with spaces");
    }
    if !(HAS_UPPER.is_match(password)
        && HAS_LOWER.is_match(password)
        && HAS_DIGIT.is_match(password)
        && HAS_SPECIAL.is_match(password))
    {
        return Some("Password must contain 1 upper case, lower case, number and special character");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "11AAaa!!x";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("11AAaa!!x").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        assert!(verify_password("anything", "not-a-valid-hash").is_err());
    }

    #[test]
    fn hash_uses_cost_twelve() {
        let hash = hash_password("11AAaa!!x").expect("hashing should succeed");
        assert!(hash.contains("$12$"), "unexpected hash format: {hash}");
    }

    #[test]
    fn rejects_short_passwords() {
        assert_eq!(
            validate_password("1Aa!5678"),
            Some("Password must be longer than 8 characters"),
            "an 8 character password is still too short"
        );
        assert_eq!(
            validate_password(""),
            Some("Password must be longer than 8 characters")
        );
    }

    #[test]
    fn rejects_long_passwords() {
        let long = "1Aa!".repeat(18); // 72 chars
        assert_eq!(
            validate_password(&long),
            Some("Password must be less than 72 characters"),
            "a 72 character password is already too long"
        );
    }

    #[test]
    fn rejects_leading_or_trailing_spaces() {
        assert_eq!(
            validate_password(" 1Aa!2Bb@"),
            Some("Password must not start or end with spaces")
        );
        assert_eq!(
            validate_password("1Aa!2Bb@ "),
            Some("Password must not start or end with spaces")
        );
    }

    #[test]
    fn rejects_missing_character_classes() {
        let message =
            "Password must contain 1 upper case, lower case, number and special character";
        assert_eq!(validate_password("11AAaabbb"), Some(message)); // no special
        assert_eq!(validate_password("!!AABBCC1"), Some(message)); // no lower
        assert_eq!(validate_password("!!aabbcc1"), Some(message)); // no upper
        assert_eq!(validate_password("!!AAaabbb"), Some(message)); // no digit
    }

    #[test]
    fn length_rule_wins_over_complexity() {
        // Fails both length and complexity; the length message is reported
        assert_eq!(
            validate_password("aaaa"),
            Some("Password must be longer than 8 characters")
        );
    }

    #[test]
    fn accepts_a_compliant_password() {
        assert_eq!(validate_password("11AAaa!!x"), None);
    }
}
