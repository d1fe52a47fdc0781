use anyhow::Result;
use derive_more::Display;
use dotenv::dotenv;
use inquire::{Confirm, DateSelect, InquireError, Password, PasswordDisplayMode, Select, Text};
use log::info;
use signup_form::consts::{log_file, log_level};
use signup_form::form::Form;
use signup_form::models::FieldChange;
use signup_form::utils::image_input::load_profile_image;
use signup_form::utils::input_validation::{is_email_format_valid, Rule};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tokio::runtime::Runtime;

type MenuExit = Option<()>;
const MENU_EXIT: MenuExit = None;
const MENU_LOOP: MenuExit = Some(());

/// A text menu
trait Menu {
    /// Runs the menu once. Returns None when the menu is done,
    /// Some(()) to show it again.
    fn enter(&mut self) -> Result<MenuExit>;

    /// Runs the menu until it is done, printing errors along the way.
    /// Esc or Ctrl-C on any prompt leaves the menu.
    fn enter_loop(&mut self) {
        while let Some(result) = self.enter().transpose() {
            if let Err(error) = result {
                if leaves_menu(&error) {
                    break;
                }
                eprintln!("Error: {error}");
            }
        }
    }
}

/// True for a prompt the user cancelled or interrupted
fn leaves_menu(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}

struct SignupMenu {
    form: Form,
    runtime: Runtime,
}

fn mark(passed: bool) -> &'static str {
    if passed {
        "✓"
    } else {
        "✗"
    }
}

impl SignupMenu {
    fn print_status(&self) {
        let form = &self.form;
        let report = form.report();

        println!();
        for rule in Rule::iter() {
            println!("  {} {}", mark(report.passes(rule)), rule);
        }
        if form.passwords_mismatch() {
            println!("  ✗ Passwords does not match");
        }

        let email = &form.state().user_email;
        if !email.trim().is_empty() && !is_email_format_valid(email) {
            println!("  ! E-mail does not look valid");
        }
        if let Some(image) = &form.state().profile_image {
            println!("  Profile image: {}", image.summary());
        }
        if report.is_valid() {
            println!("  Ready to register");
        }
        println!();
    }

    fn password_prompt(&self, message: &str) -> Result<String> {
        let password = if self.form.show_password() {
            Text::new(message).prompt()?
        } else {
            Password::new(message)
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .prompt()?
        };
        Ok(password)
    }
}

impl Menu for SignupMenu {
    fn enter(&mut self) -> Result<MenuExit> {
        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("Profile image")]
            ProfileImage,
            #[display("Username")]
            Username,
            #[display("Password")]
            Password,
            #[display("Password (Confirm)")]
            PasswordConfirm,
            #[display("Show / hide password")]
            TogglePassword,
            #[display("Personal information")]
            PersonalInformation,
            #[display("E-mail")]
            Email,
            #[display("News and updates subscription")]
            Subscription,
            #[display("Register")]
            Submit,
            #[display("Quit")]
            Exit,
        }

        self.print_status();
        let choice = Select::new("What do you want to fill in?", Choice::iter().collect()).prompt()?;

        let state = self.form.state();
        let change = match choice {
            Choice::ProfileImage => {
                let path = Text::new("Path of the profile image:").prompt()?;
                let loaded = self.runtime.block_on(load_profile_image(path.trim()));
                if let Err(error) = &loaded {
                    eprintln!("Could not load the image: {error:#}");
                }
                self.form.set_profile_image(loaded);
                return Ok(MENU_LOOP);
            }
            Choice::Username => FieldChange::Username(
                Text::new("Username:")
                    .with_initial_value(&state.username)
                    .prompt()?,
            ),
            Choice::Password => FieldChange::PasswordEntry(self.password_prompt("Password:")?),
            Choice::PasswordConfirm => {
                FieldChange::PasswordReentry(self.password_prompt("Password (Confirm):")?)
            }
            Choice::TogglePassword => {
                let shown = self.form.toggle_password_visibility();
                println!("Passwords are now {}", if shown { "shown" } else { "hidden" });
                return Ok(MENU_LOOP);
            }
            Choice::PersonalInformation => {
                let first_name = Text::new("First Name:")
                    .with_initial_value(&state.first_name)
                    .prompt()?;
                let last_name = Text::new("Last Name:")
                    .with_initial_value(&state.last_name)
                    .prompt()?;
                let date_of_birth = DateSelect::new("Date of birth:")
                    .with_default(state.date_of_birth)
                    .prompt()?;

                self.form.apply(FieldChange::FirstName(first_name));
                self.form.apply(FieldChange::LastName(last_name));
                FieldChange::DateOfBirth(date_of_birth)
            }
            Choice::Email => FieldChange::UserEmail(
                Text::new("E-mail:")
                    .with_initial_value(&state.user_email)
                    .prompt()?,
            ),
            Choice::Subscription => FieldChange::SubscribeYourEmail(
                Confirm::new("Want to subscribe for news and updates?")
                    .with_default(state.subscribe_your_email)
                    .prompt()?,
            ),
            Choice::Submit => {
                let registration = self.form.submit()?;
                println!("{}", serde_json::to_string_pretty(&registration)?);
                return Ok(MENU_EXIT);
            }
            Choice::Exit => return Ok(MENU_EXIT),
        };

        self.form.apply(change);
        Ok(MENU_LOOP)
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    simple_logging::log_to_file(log_file(), log_level())?;
    info!("Registration form started");

    SignupMenu {
        form: Form::new(),
        runtime: Runtime::new()?,
    }
    .enter_loop();
    Ok(())
}
