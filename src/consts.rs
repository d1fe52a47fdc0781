//! Constants of the registration form, and the few settings read from the environment.

use std::env;

use log::LevelFilter;

/// Minimum number of characters in a username
pub const MIN_USERNAME_LENGTH: usize = 5;
/// Minimum number of characters in a password
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Characters accepted as "special" by the password strength check
pub const PASSWORD_SPECIAL_CHARACTERS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// Age used to pre-fill the date of birth
pub const DEFAULT_AGE_YEARS: u32 = 20;
pub const DEFAULT_SUBSCRIBE: bool = true;

/// Maximum size of a profile image (5MB)
pub const MAX_IMAGE_FILE_SIZE: usize = 5 * 1024 * 1024;
/// Maximum dimensions of a profile image
pub const MAX_IMAGE_DIMENSIONS: (u32, u32) = (4096, 4096);

pub const LOG_FILE_ENV: &str = "SIGNUP_FORM_LOG";
pub const LOG_LEVEL_ENV: &str = "SIGNUP_FORM_LOG_LEVEL";
pub const DEFAULT_LOG_FILE: &str = "./signup-form.log";

/// Path of the log file, `SIGNUP_FORM_LOG` if set
pub fn log_file() -> String {
    env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_owned())
}

/// Log level from `SIGNUP_FORM_LOG_LEVEL`, `Info` when unset or unreadable
pub fn log_level() -> LevelFilter {
    env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}
