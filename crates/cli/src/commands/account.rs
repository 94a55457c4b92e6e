//! Consumer account commands.

use buzzgram_client::App;
use buzzgram_client::pages::{RegisterPage, SettingsPage};
use buzzgram_core::UserType;
use buzzgram_core::forms::RegistrationForm;
use secrecy::SecretString;

use super::CliError;

pub async fn login(app: &App, email: &str, password: String) -> Result<(), CliError> {
    let user = app
        .consumer
        .login(email, &SecretString::from(password))
        .await?;
    println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
    Ok(())
}

/// Build the registration form from command-line arguments.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown user type.
pub fn registration_form(
    email: String,
    name: String,
    password: String,
    user_type: &str,
    business_name: Option<String>,
    phone: Option<String>,
    instagram: Option<String>,
) -> Result<RegistrationForm, CliError> {
    let user_type: UserType = user_type.parse().map_err(CliError::InvalidArgument)?;
    Ok(RegistrationForm {
        user_type: Some(user_type),
        name,
        email,
        confirm_password: password.clone(),
        password,
        business_name: business_name.unwrap_or_default(),
        instagram_handle: instagram.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
    })
}

pub async fn register(app: &App, form: RegistrationForm) -> Result<(), CliError> {
    let mut page = RegisterPage::new(app);
    page.form = form;
    page.submit().await?;
    println!("Account created. Check your email to confirm it, then run `buzzgram login`.");
    Ok(())
}

pub async fn logout(app: &App) {
    app.consumer.logout().await;
    app.cache.invalidate_all().await;
    println!("Signed out");
}

pub async fn whoami(app: &App) {
    match app.consumer.user().await {
        Some(user) => println!("Consumer: {} <{}> ({})", user.name, user.email, user.role),
        None => println!("Consumer: signed out"),
    }
    match app.owner.owner().await {
        Some(owner) => println!("Business owner: {} <{}>", owner.display_name(), owner.email),
        None => println!("Business owner: signed out"),
    }
}

pub async fn change_password(app: &App, current: String, new: String) -> Result<(), CliError> {
    if !app.consumer.snapshot().await.is_authenticated() {
        return Err(CliError::NotSignedIn("buzzgram login"));
    }

    let mut page = SettingsPage::new(app);
    page.password.current_password = current;
    page.password.confirm_new_password.clone_from(&new);
    page.password.new_password = new;
    page.change_password().await?;
    if let Some(message) = &page.success {
        println!("{message}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_form_parses_user_type() {
        let form = registration_form(
            "sam@shop.com".to_owned(),
            "Sam".to_owned(),
            "password123".to_owned(),
            "business_owner",
            Some("Glow".to_owned()),
            Some("555-0100".to_owned()),
            None,
        )
        .unwrap();
        assert_eq!(form.user_type, Some(UserType::BusinessOwner));
        assert_eq!(form.confirm_password, "password123");

        let request = form.to_request().unwrap();
        assert_eq!(request.business_name.as_deref(), Some("Glow"));
    }

    #[test]
    fn test_unknown_user_type_is_rejected() {
        let err = registration_form(
            "a@b.co".to_owned(),
            "A".to_owned(),
            "password123".to_owned(),
            "vendor",
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
