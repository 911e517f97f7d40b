//! Registration input rules and the password policy.

use super::IdentityError;

const PASSWORD_SYMBOLS: &str = "!@#$%^&*";
const MIN_PASSWORD_CHARS: usize = 8;

/// Checks a candidate password against the account policy.
///
/// At least eight characters on a single line, mixing lowercase,
/// uppercase, a digit and one of `!@#$%^&*`.
pub fn check_password_policy(password: &str) -> Result<(), IdentityError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_CHARS;
    let single_line = !password.contains(['\n', '\r']);
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if long_enough && single_line && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(IdentityError::WeakPassword)
    }
}

/// Validated sign-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Validates raw sign-up fields in a fixed order: presence, password
    /// differing from username, email shape, then the password policy.
    pub fn parse(
        username: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, IdentityError> {
        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            return Err(IdentityError::MissingRegistrationFields);
        };
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(IdentityError::MissingRegistrationFields);
        }
        if username == password {
            return Err(IdentityError::PasswordMatchesUsername);
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(IdentityError::InvalidEmail);
        }
        check_password_policy(&password)?;

        Ok(Self {
            username,
            email,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn strong_password_passes() {
        assert!(check_password_policy("Secr3t!pw").is_ok());
    }

    #[test]
    fn password_policy_requires_every_class() {
        for weak in ["Sh0rt!", "alllower1!", "ALLUPPER1!", "NoDigits!!", "NoSymbol12", "Multi\nLine1!"] {
            assert!(
                matches!(check_password_policy(weak), Err(IdentityError::WeakPassword)),
                "{:?} should be rejected",
                weak
            );
        }
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(check_password_policy("Aa1!あいうえ").is_ok());
    }

    #[test]
    fn registration_requires_all_fields() {
        let result = Registration::parse(some("alice"), None, some("Secr3t!pw"));
        assert!(matches!(result, Err(IdentityError::MissingRegistrationFields)));
    }

    #[test]
    fn registration_rejects_password_equal_to_username() {
        let result = Registration::parse(some("Secr3t!pw"), some("a@b.jp"), some("Secr3t!pw"));
        assert!(matches!(result, Err(IdentityError::PasswordMatchesUsername)));
    }

    #[test]
    fn registration_rejects_email_without_dot() {
        let result = Registration::parse(some("alice"), some("alice@localhost"), some("Secr3t!pw"));
        assert!(matches!(result, Err(IdentityError::InvalidEmail)));
    }

    #[test]
    fn registration_checks_password_last() {
        let result = Registration::parse(some("alice"), some("alice@example.com"), some("weak"));
        assert!(matches!(result, Err(IdentityError::WeakPassword)));
    }

    #[test]
    fn valid_registration_parses() {
        let reg = Registration::parse(some("alice"), some("alice@example.com"), some("Secr3t!pw")).unwrap();
        assert_eq!(reg.username, "alice");
    }
}
