//! The registration form: current values plus the flags derived from them.
//!
//! Each change typed by the user goes through [`Form::apply`], which stores the
//! value and recomputes the flags that depend on the changed field.

use anyhow::Result;
use log::{debug, info, warn};
use thiserror::Error;

use crate::models::{Field, FieldChange, FormState, Registration};
use crate::utils::image_input::ProfileImage;
use crate::utils::input_validation::{
    is_secure_password, is_username_format_valid, is_username_length_valid, passwords_match,
    passwords_mismatch, Rule, ValidationReport,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Registration refused, broken rules: {}", list_rules(.0))]
    Invalid(Vec<Rule>),
}

fn list_rules(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    state: FormState,
    report: ValidationReport,
    show_password: bool,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn show_password(&self) -> bool {
        self.show_password
    }

    /// Flips between a masked and a clear password entry
    pub fn toggle_password_visibility(&mut self) -> bool {
        self.show_password = !self.show_password;
        self.show_password
    }

    /// True when both passwords are typed and differ
    pub fn passwords_mismatch(&self) -> bool {
        passwords_mismatch(&self.state.password_entry, &self.state.password_reentry)
    }

    /// Stores a new value and refreshes the flags depending on it
    pub fn apply(&mut self, change: FieldChange) -> &ValidationReport {
        let field = change.field();

        match change {
            FieldChange::Username(username) => {
                self.report.username_length_valid = is_username_length_valid(&username);
                self.report.username_format_valid = is_username_format_valid(&username);
                self.state.username = username;
            }
            FieldChange::PasswordEntry(password) => {
                self.report.password_strong = is_secure_password(&password);
                self.report.passwords_match = passwords_match(&password, &self.state.password_reentry);
                self.state.password_entry = password;
            }
            FieldChange::PasswordReentry(confirmation) => {
                self.report.passwords_match = passwords_match(&self.state.password_entry, &confirmation);
                self.state.password_reentry = confirmation;
            }
            FieldChange::FirstName(first_name) => self.state.first_name = first_name,
            FieldChange::LastName(last_name) => self.state.last_name = last_name,
            FieldChange::DateOfBirth(date) => self.state.date_of_birth = date,
            FieldChange::UserEmail(email) => self.state.user_email = email,
            FieldChange::SubscribeYourEmail(subscribe) => self.state.subscribe_your_email = subscribe,
        }

        debug!("{} changed: {:?}", field, self.report);
        &self.report
    }

    /// Takes the outcome of an image load.
    ///
    /// The current image is only replaced by a successfully loaded one.
    /// Returns whether it was replaced.
    pub fn set_profile_image(&mut self, loaded: Result<Option<ProfileImage>>) -> bool {
        match loaded {
            Ok(Some(image)) => {
                info!("{} set to {}", Field::ProfileImage, image.filename());
                self.state.profile_image = Some(image);
                true
            }
            Ok(None) => {
                warn!("Image load returned no data, keeping the previous image");
                false
            }
            Err(error) => {
                warn!("Image load failed, keeping the previous image: {:#}", error);
                false
            }
        }
    }

    /// Hands back the registration if every rule passes
    pub fn submit(&self) -> Result<Registration, FormError> {
        if !self.report.is_valid() {
            return Err(FormError::Invalid(self.report.failures()));
        }

        let state = &self.state;
        info!("Registration accepted for {}", state.username);
        Ok(Registration {
            username: state.username.clone(),
            first_name: state.first_name.trim().to_owned(),
            last_name: state.last_name.trim().to_owned(),
            date_of_birth: state.date_of_birth,
            email: state.user_email.trim().to_owned(),
            subscribed: state.subscribe_your_email,
            profile_image: state.profile_image.as_ref().map(ProfileImage::summary),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use anyhow::anyhow;
    use chrono::NaiveDate;
    use image::ImageFormat;

    use super::*;

    fn test_image(filename: &str) -> ProfileImage {
        let mut buffer = Vec::new();
        image::RgbImage::new(8, 8)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .expect("Failed to create test image");
        ProfileImage::new(&buffer, filename).unwrap()
    }

    fn filled_form() -> Form {
        let mut form = Form::new();
        form.apply(FieldChange::Username("user_123".into()));
        form.apply(FieldChange::PasswordEntry("Abcdef1!".into()));
        form.apply(FieldChange::PasswordReentry("Abcdef1!".into()));
        form
    }

    #[test]
    fn test_initial_flags() {
        let form = Form::new();
        assert_eq!(*form.report(), ValidationReport::default());
        assert!(form.report().username_format_valid);
        assert!(!form.show_password());
        assert!(!form.passwords_mismatch());
    }

    #[test]
    fn test_username_change() {
        let mut form = Form::new();

        let report = form.apply(FieldChange::Username("abcd".into()));
        assert!(!report.username_length_valid);
        assert!(report.username_format_valid);

        let report = form.apply(FieldChange::Username("user name".into()));
        assert!(report.username_length_valid);
        assert!(!report.username_format_valid);

        assert_eq!(form.state().username, "user name");
        assert!(!form.report().password_strong, "Password flags changed with the username");
    }

    #[test]
    fn test_password_changes() {
        let mut form = Form::new();

        form.apply(FieldChange::PasswordEntry("Abcdef1!".into()));
        assert!(form.report().password_strong);
        assert!(!form.report().passwords_match);
        assert!(!form.passwords_mismatch(), "Mismatch shown before confirmation was typed");

        form.apply(FieldChange::PasswordReentry("Abcdef1?".into()));
        assert!(!form.report().passwords_match);
        assert!(form.passwords_mismatch());

        form.apply(FieldChange::PasswordReentry("Abcdef1!".into()));
        assert!(form.report().passwords_match);

        // Editing the first entry invalidates the match again
        form.apply(FieldChange::PasswordEntry("Abcdef1!x".into()));
        assert!(!form.report().passwords_match);
        assert!(form.report().password_strong);
    }

    #[test]
    fn test_report_matches_fresh_evaluation() {
        let changes = vec![
            FieldChange::PasswordReentry("Secret1!".into()),
            FieldChange::Username("üser".into()),
            FieldChange::PasswordEntry("Secret1!".into()),
            FieldChange::UserEmail("user@example.com".into()),
            FieldChange::Username("valid_user".into()),
        ];

        let mut form = Form::new();
        for change in changes {
            form.apply(change);
            assert_eq!(*form.report(), ValidationReport::evaluate(form.state()));
        }
    }

    #[test]
    fn test_other_fields() {
        let mut form = Form::new();
        let date = NaiveDate::from_ymd_opt(1990, 1, 2).unwrap();

        form.apply(FieldChange::FirstName("Ada".into()));
        form.apply(FieldChange::LastName("Lovelace".into()));
        form.apply(FieldChange::DateOfBirth(date));
        form.apply(FieldChange::UserEmail("ada@example.com".into()));
        form.apply(FieldChange::SubscribeYourEmail(false));

        let state = form.state();
        assert_eq!(state.first_name, "Ada");
        assert_eq!(state.last_name, "Lovelace");
        assert_eq!(state.date_of_birth, date);
        assert_eq!(state.user_email, "ada@example.com");
        assert!(!state.subscribe_your_email);
        assert_eq!(*form.report(), ValidationReport::default());
    }

    #[test]
    fn test_toggle_password_visibility() {
        let mut form = Form::new();
        assert!(form.toggle_password_visibility());
        assert!(!form.toggle_password_visibility());
    }

    #[test]
    fn test_failed_image_load_keeps_previous_image() {
        let mut form = Form::new();
        assert!(form.set_profile_image(Ok(Some(test_image("first.png")))));

        assert!(!form.set_profile_image(Err(anyhow!("decoding failed"))));
        assert!(!form.set_profile_image(Ok(None)));
        assert_eq!(
            form.state().profile_image.as_ref().map(|image| image.filename()),
            Some("first.png")
        );

        assert!(form.set_profile_image(Ok(Some(test_image("second.png")))));
        assert_eq!(
            form.state().profile_image.as_ref().map(|image| image.filename()),
            Some("second.png")
        );
    }

    #[test]
    fn test_submit_refused() {
        let form = Form::new();
        assert_eq!(
            form.submit(),
            Err(FormError::Invalid(vec![
                Rule::UsernameLength,
                Rule::PasswordStrength,
                Rule::PasswordsMatch,
            ]))
        );

        let mut form = filled_form();
        form.apply(FieldChange::PasswordReentry("Abcdef1?".into()));
        let error = form.submit().unwrap_err();
        assert_eq!(error, FormError::Invalid(vec![Rule::PasswordsMatch]));
        assert_eq!(error.to_string(), "Registration refused, broken rules: Passwords match");
    }

    #[test]
    fn test_submit_accepted() {
        let mut form = filled_form();
        form.apply(FieldChange::FirstName("  Ada ".into()));
        form.apply(FieldChange::UserEmail(" ada@example.com".into()));
        form.set_profile_image(Ok(Some(test_image("avatar.png"))));

        let registration = form.submit().unwrap();
        assert_eq!(registration.username, "user_123");
        assert_eq!(registration.first_name, "Ada");
        assert_eq!(registration.email, "ada@example.com");
        assert!(registration.subscribed);
        assert_eq!(registration.profile_image.unwrap().width, 8);
    }

    #[test]
    fn test_registration_does_not_leak_password() {
        let registration = filled_form().submit().unwrap();
        let json = serde_json::to_string(&registration).unwrap();
        assert!(!json.contains("Abcdef1!"));
    }
}
