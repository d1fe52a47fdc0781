//! Validation rules of the registration form.
//!
//! Every check is a pure function over the current text of a field: it is
//! re-run on each change and never fails, it only answers yes or no.

use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use strum_macros::EnumIter;
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

use crate::consts::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, PASSWORD_SPECIAL_CHARACTERS};
use crate::models::FormState;

// Letters, digits and underscore only. The empty string matches.
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]*$").expect("Failed to compile username regex")
});

/// Number of characters as a user would count them (extended grapheme
/// clusters): an accent, a flag or an emoji with its skin tone is one.
fn char_count(input: &str) -> usize {
    input.graphemes(true).count()
}

/// True if the username has at least 5 characters
pub fn is_username_length_valid(username: &str) -> bool {
    char_count(username) >= MIN_USERNAME_LENGTH
}

/// True if the username only contains ASCII letters, digits or underscores
pub fn is_username_format_valid(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// This function checks if the given password is strong enough:
/// at least 8 characters, with a lowercase letter, an uppercase letter,
/// a digit and one of `!@#$%^&*`
pub fn is_secure_password(password: &str) -> bool {
    char_count(password) >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(&c))
}

/// True if both passwords were typed and are identical
pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    !password.is_empty() && password == confirmation
}

/// True if both passwords were typed but differ.
///
/// Not the negation of [`passwords_match`]: nothing is reported while one
/// of the two fields is still empty.
pub fn passwords_mismatch(password: &str, confirmation: &str) -> bool {
    !password.is_empty() && !confirmation.is_empty() && password != confirmation
}

/// Advisory check of the e-mail syntax, surrounding whitespace ignored
pub fn is_email_format_valid(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// One rule the form enforces before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Rule {
    #[display("Min. of 5 characters.")]
    UsernameLength,
    #[display("Only alphabet, numbers or underscore.")]
    UsernameFormat,
    #[display("Strong Password")]
    PasswordStrength,
    #[display("Passwords match")]
    PasswordsMatch,
}

/// Flags derived from the current values of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    pub username_length_valid: bool,
    pub username_format_valid: bool,
    pub password_strong: bool,
    pub passwords_match: bool,
}

impl Default for ValidationReport {
    /// Flags of an untouched form: an empty username is well-formed but too short
    fn default() -> Self {
        Self::evaluate(&FormState::default())
    }
}

impl ValidationReport {
    pub fn evaluate(state: &FormState) -> Self {
        Self {
            username_length_valid: is_username_length_valid(&state.username),
            username_format_valid: is_username_format_valid(&state.username),
            password_strong: is_secure_password(&state.password_entry),
            passwords_match: passwords_match(&state.password_entry, &state.password_reentry),
        }
    }

    pub fn passes(&self, rule: Rule) -> bool {
        match rule {
            Rule::UsernameLength => self.username_length_valid,
            Rule::UsernameFormat => self.username_format_valid,
            Rule::PasswordStrength => self.password_strong,
            Rule::PasswordsMatch => self.passwords_match,
        }
    }

    /// Rules currently broken, in display order
    pub fn failures(&self) -> Vec<Rule> {
        use strum::IntoEnumIterator;

        Rule::iter().filter(|rule| !self.passes(*rule)).collect()
    }

    pub fn is_valid(&self) -> bool {
        self.failures().is_empty()
    }
}
