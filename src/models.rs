//! Data model of the registration form

use chrono::{Local, Months, NaiveDate};
use derive_more::Display;
use serde::Serialize;
use strum_macros::EnumIter;

use crate::consts::{DEFAULT_AGE_YEARS, DEFAULT_SUBSCRIBE};
use crate::utils::image_input::ProfileImage;

/// A named input of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Field {
    #[display("Username")]
    Username,
    #[display("Password")]
    PasswordEntry,
    #[display("Password (Confirm)")]
    PasswordReentry,
    #[display("First Name")]
    FirstName,
    #[display("Last Name")]
    LastName,
    #[display("Date of birth")]
    DateOfBirth,
    #[display("E-mail")]
    UserEmail,
    #[display("Subscribe for news and updates")]
    SubscribeYourEmail,
    #[display("Profile Image")]
    ProfileImage,
}

/// A new value typed into one field.
///
/// The profile image is not a change: it arrives asynchronously, see
/// [`crate::form::Form::set_profile_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Username(String),
    PasswordEntry(String),
    PasswordReentry(String),
    FirstName(String),
    LastName(String),
    DateOfBirth(NaiveDate),
    UserEmail(String),
    SubscribeYourEmail(bool),
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            FieldChange::Username(_) => Field::Username,
            FieldChange::PasswordEntry(_) => Field::PasswordEntry,
            FieldChange::PasswordReentry(_) => Field::PasswordReentry,
            FieldChange::FirstName(_) => Field::FirstName,
            FieldChange::LastName(_) => Field::LastName,
            FieldChange::DateOfBirth(_) => Field::DateOfBirth,
            FieldChange::UserEmail(_) => Field::UserEmail,
            FieldChange::SubscribeYourEmail(_) => Field::SubscribeYourEmail,
        }
    }
}

/// Current values of every field
#[derive(Debug, Clone)]
pub struct FormState {
    pub username: String,
    pub password_entry: String,
    pub password_reentry: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub user_email: String,
    pub subscribe_your_email: bool,
    pub profile_image: Option<ProfileImage>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            username: String::new(),
            password_entry: String::new(),
            password_reentry: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: default_date_of_birth(Local::now().date_naive()),
            user_email: String::new(),
            subscribe_your_email: DEFAULT_SUBSCRIBE,
            profile_image: None,
        }
    }
}

/// Today minus the default age, or today when that date cannot be built
pub fn default_date_of_birth(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(DEFAULT_AGE_YEARS * 12))
        .unwrap_or(today)
}

/// What a successful submission hands back, without the password
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub subscribed: bool,
    pub profile_image: Option<ImageSummary>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Display)]
#[display("{filename} ({width}x{height})")]
pub struct ImageSummary {
    pub filename: String,
    pub width: u32,
    pub height: u32,
}
