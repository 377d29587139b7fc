//! Sign-in commands: login, logout, whoami.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password};

use crate::cli::output;
use crate::state::AppState;

/// Sign in, prompting for whatever was not passed as a flag.
pub async fn login(
    state: &AppState,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let spinner = output::spinner("Signing in...", "cyan");
    let result = state.auth_service.login(&email, &password).await;
    spinner.finish_and_clear();
    let credentials = result?;

    if json {
        let out = serde_json::json!({
            "user_id": credentials.user_id,
            "email": credentials.email,
            "token": credentials.masked_token(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        output::success(format!(
            "Signed in as {}",
            style(credentials.email.as_deref().unwrap_or(&email)).cyan().bold()
        ));
        println!(
            "    {} {}",
            style("Token:").dim(),
            style(credentials.masked_token()).dim()
        );
        println!();
    }

    Ok(())
}

pub async fn logout(state: &AppState, json: bool) -> Result<()> {
    let was_signed_in = state.auth_service.logout()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "signed_out": was_signed_in }))?
        );
    } else if was_signed_in {
        output::success("Signed out.");
        println!();
    } else {
        output::info("Not signed in.");
        println!();
    }

    Ok(())
}

pub async fn whoami(state: &AppState, json: bool) -> Result<()> {
    let identity = state.auth_service.whoami()?;
    let creds = &identity.credentials;

    if json {
        let out = serde_json::json!({
            "user_id": creds.user_id,
            "email": creds.email,
            "token": creds.masked_token(),
            "source": identity.source,
            "api": state.config.api_root(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Account ──").dim());
    println!(
        "  {}  {}",
        style("Email:").bold(),
        creds.email.as_deref().unwrap_or("(unknown)")
    );
    println!("  {}  {}", style("User:").bold(), creds.user_id);
    println!(
        "  {}  {} {}",
        style("Token:").bold(),
        creds.masked_token(),
        style(format!("({})", identity.source)).dim()
    );
    println!();
    println!("  {}", style("── Client ──").dim());
    println!("  {}  {}", style("API:").bold(), state.config.api_root());
    println!("  {}  {}", style("Data:").bold(), state.data_dir.display());
    println!();

    Ok(())
}
