pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Shared by registration and the reset-password consume step.
#[inline(always)]
pub fn validate_password_form(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[inline(always)]
pub fn validate_username(username: &str) -> bool {
    let trimmed = username.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_USERNAME_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_length_is_counted_in_chars() {
        assert!(!validate_password_form(""));
        assert!(!validate_password_form("seven77"));
        assert!(validate_password_form("eight888"));
        // multi-byte characters count once each
        assert!(validate_password_form("пароль78"));
    }

    #[test]
    fn username_rejects_blank_and_oversized() {
        assert!(!validate_username(""));
        assert!(!validate_username("   "));
        assert!(validate_username("ferris"));
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)));
        assert!(!validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)));
    }
}
