//! Farmer account commands: registration, sessions and password recovery.

use agrimarket_core::KeyValueStore;
use agrimarket_core::farmer::{NewFarmer, SecurityQuestion};
use agrimarket_core::validation::{is_valid_password, password_strength, validate_registration};
use anyhow::{Context as _, Result};
use clap::Args;
use tracing::debug;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    /// 10-digit mobile number
    #[arg(long)]
    pub mobile: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
    /// Defaults to --password
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "India")]
    pub country: String,
    /// 6-digit postal code; city and state are looked up from it when omitted
    #[arg(long)]
    pub pin: String,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long, default_value = "")]
    pub aadhaar: String,
    /// First security question (mother, pet, school, village, color, food, city, teacher)
    #[arg(long)]
    pub q1: SecurityQuestion,
    #[arg(long)]
    pub a1: String,
    /// Second security question
    #[arg(long)]
    pub q2: SecurityQuestion,
    #[arg(long)]
    pub a2: String,
    /// Accept the privacy policy and terms of use
    #[arg(long)]
    pub accept_terms: bool,
}

pub async fn register<S: KeyValueStore>(ctx: &Context<S>, args: RegisterArgs) -> Result<()> {
    if !args.accept_terms {
        anyhow::bail!("Please accept the privacy policy and terms (--accept-terms)");
    }

    let (mut city, mut state) = (
        args.city.clone().unwrap_or_default(),
        args.state.clone().unwrap_or_default(),
    );
    if city.is_empty() || state.is_empty() {
        if let Some(found) = ctx.enricher.resolve_pin(&args.pin, &ctx.cancel).await {
            debug!(pin = %args.pin, city = %found.city, "Filled location from postal code");
            if city.is_empty() {
                city = found.city;
            }
            if state.is_empty() {
                state = found.state;
            }
        }
    }

    let confirm = args
        .confirm_password
        .clone()
        .unwrap_or_else(|| args.password.clone());
    let data = NewFarmer::new(
        args.name.trim(),
        args.mobile.trim(),
        args.username.trim(),
        args.password,
        (args.q1, args.a1.trim()),
        (args.q2, args.a2.trim()),
    )
    .with_email(args.email.trim())
    .with_location(args.country.trim(), args.pin.trim(), city, state)
    .with_aadhaar(args.aadhaar.trim());

    let errors = validate_registration(&data, &confirm);
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  ✗ {}", error);
        }
        anyhow::bail!("Registration rejected ({} field(s) invalid)", errors.len());
    }

    let farmer = ctx.repo.register_farmer(data)?;
    println!("✅ Registered {} (@{})", farmer.name, farmer.username);
    if !farmer.city.is_empty() {
        println!("📍 {}, {}", farmer.city, farmer.state);
    }
    println!("Run `agrimarket login` to sign in.");
    Ok(())
}

pub async fn login<S: KeyValueStore>(ctx: &Context<S>, username: &str, password: &str) -> Result<()> {
    let farmer = ctx.repo.login(username.trim(), password)?;

    let metadata = ctx.enricher.collect(&ctx.cancel).await;
    ctx.repo
        .record_login(&farmer.id, metadata)
        .context("Failed to record login")?;

    println!("👋 Welcome, {}!", farmer.name);
    Ok(())
}

pub fn logout<S: KeyValueStore>(ctx: &Context<S>) -> Result<()> {
    ctx.repo.logout()?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami<S: KeyValueStore>(ctx: &Context<S>) -> Result<()> {
    match ctx.repo.current_session()? {
        Some(session) => println!(
            "{} (@{}) · {} · id {}",
            session.name, session.username, session.mobile, session.id
        ),
        None => println!("Not logged in."),
    }
    Ok(())
}

#[derive(Args, Debug, Clone)]
pub struct RecoverArgs {
    #[arg(long)]
    pub username: String,
    /// Answer to the first security question; omit to see the questions
    #[arg(long, requires_all = ["a2", "new_password"])]
    pub a1: Option<String>,
    #[arg(long)]
    pub a2: Option<String>,
    #[arg(long)]
    pub new_password: Option<String>,
    /// Defaults to --new-password
    #[arg(long, requires = "new_password")]
    pub confirm_password: Option<String>,
}

pub fn recover<S: KeyValueStore>(ctx: &Context<S>, args: RecoverArgs) -> Result<()> {
    let username = args.username.trim();
    let (Some(a1), Some(a2), Some(new_password)) = (args.a1, args.a2, args.new_password) else {
        let (q1, q2) = ctx.repo.security_questions(username)?;
        println!("1. {}", q1.prompt());
        println!("2. {}", q2.prompt());
        println!("Answer with --a1, --a2 and --new-password.");
        return Ok(());
    };

    if args
        .confirm_password
        .as_deref()
        .is_some_and(|confirm| confirm != new_password)
    {
        anyhow::bail!("Passwords do not match");
    }
    if !is_valid_password(&new_password) {
        anyhow::bail!("New password needs 8+ characters with letters and numbers");
    }

    ctx.repo
        .recover_password(username, a1.trim(), a2.trim(), &new_password)?;
    println!("🔑 Password reset for @{}. You can log in now.", username);
    Ok(())
}

pub fn show_password_strength(password: &str) {
    println!("{}", password_strength(password));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;

    fn args(username: &str, mobile: &str) -> RegisterArgs {
        RegisterArgs {
            name: "Asha Patil".to_string(),
            mobile: mobile.to_string(),
            username: username.to_string(),
            password: "harvest2024".to_string(),
            confirm_password: None,
            email: String::new(),
            country: "India".to_string(),
            pin: "411001".to_string(),
            city: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            aadhaar: String::new(),
            q1: SecurityQuestion::Pet,
            a1: "Moti".to_string(),
            q2: SecurityQuestion::City,
            a2: "Pune".to_string(),
            accept_terms: true,
        }
    }

    #[tokio::test]
    async fn test_register_login_and_logout() {
        let ctx = context();
        register(&ctx, args("asha01", "9876543210")).await.unwrap();

        login(&ctx, "asha01", "harvest2024").await.unwrap();
        let session = ctx.require_session().unwrap();
        assert_eq!(session.username, "asha01");

        let history = ctx.repo.login_history(&session.id).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].metadata.location.is_unknown());

        logout(&ctx).unwrap();
        assert!(ctx.repo.current_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields() {
        let ctx = context();
        let mut bad = args("as", "12345");
        bad.confirm_password = Some("different1".to_string());

        assert!(register(&ctx, bad).await.is_err());
        assert!(ctx.repo.list_farmers().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let ctx = context();
        register(&ctx, args("asha01", "9876543210")).await.unwrap();

        let err = register(&ctx, args("asha01", "9876500000")).await.unwrap_err();
        assert_eq!(err.to_string(), "Username already exists");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let ctx = context();
        register(&ctx, args("asha01", "9876543210")).await.unwrap();

        assert!(login(&ctx, "asha01", "nope").await.is_err());
        assert!(ctx.repo.current_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recover_resets_password() {
        let ctx = context();
        register(&ctx, args("asha01", "9876543210")).await.unwrap();

        // Without answers only the questions are shown.
        recover(
            &ctx,
            RecoverArgs {
                username: "asha01".to_string(),
                a1: None,
                a2: None,
                new_password: None,
                confirm_password: None,
            },
        )
        .unwrap();

        recover(
            &ctx,
            RecoverArgs {
                username: "asha01".to_string(),
                a1: Some("moti".to_string()),
                a2: Some("PUNE".to_string()),
                new_password: Some("newcrop99".to_string()),
                confirm_password: Some("newcrop99".to_string()),
            },
        )
        .unwrap();

        login(&ctx, "asha01", "newcrop99").await.unwrap();
    }

    #[test]
    fn test_recover_rejects_weak_password() {
        let ctx = context();
        let err = recover(
            &ctx,
            RecoverArgs {
                username: "asha01".to_string(),
                a1: Some("moti".to_string()),
                a2: Some("pune".to_string()),
                new_password: Some("short".to_string()),
                confirm_password: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("8+ characters"));
    }

    #[tokio::test]
    async fn test_register_requires_accepted_terms() {
        let ctx = context();
        let mut unaccepted = args("asha01", "9876543210");
        unaccepted.accept_terms = false;

        let err = register(&ctx, unaccepted).await.unwrap_err();
        assert!(err.to_string().contains("--accept-terms"));
        assert!(ctx.repo.list_farmers().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recover_rejects_mismatched_confirmation() {
        let ctx = context();
        register(&ctx, args("asha01", "9876543210")).await.unwrap();

        let err = recover(
            &ctx,
            RecoverArgs {
                username: "asha01".to_string(),
                a1: Some("moti".to_string()),
                a2: Some("pune".to_string()),
                new_password: Some("newcrop99".to_string()),
                confirm_password: Some("newcrop98".to_string()),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");

        // the old password still works
        login(&ctx, "asha01", "harvest2024").await.unwrap();
    }
}
