//! Authentication commands.

use super::{prompt, prompt_optional};
use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::SignupRequest;

/// Login with username and password. Returns true when a session was
/// established (or already existed).
pub async fn login(ctx: &AppContext, format: &OutputFormat) -> Result<bool> {
    if let Some(user) = ctx.session().user() {
        output::print_success(
            &format!("Already logged in as {}", user.display_name()),
            format,
        );
        return Ok(true);
    }

    let username = prompt("Username")?;
    if username.is_empty() {
        output::print_error("Username is required", format);
        return Ok(false);
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(false);
    }

    println!("Logging in...");

    let payload = match ctx.api.login(&username, &password).await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(error = %err, "login request failed");
            output::print_error("Invalid username or password.", format);
            return Ok(false);
        }
    };

    match ctx.manager.login(payload.access_token.clone(), payload.account()) {
        Ok(session) => {
            let name = session
                .user()
                .map(|u| u.display_name())
                .unwrap_or_else(|| "user".to_string());
            output::print_success(&format!("Welcome back, {}!", name), format);
            Ok(true)
        }
        Err(err) => {
            // Malformed success payloads read the same as bad credentials.
            tracing::debug!(error = %err, "login response rejected");
            output::print_error("Invalid username or password.", format);
            Ok(false)
        }
    }
}

/// Create an account. Returns true when a session was established.
pub async fn signup(ctx: &AppContext, format: &OutputFormat) -> Result<bool> {
    if ctx.session().is_authenticated() {
        output::print_error("Already logged in. Log out before creating an account.", format);
        return Ok(true);
    }

    let role = prompt("Account type (user/employer)")?;
    let username = prompt("Username")?;
    if username.is_empty() {
        output::print_error("Username is required", format);
        return Ok(false);
    }
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(false);
    }

    let request = match role.as_str() {
        "employer" => {
            let employer_name = prompt("Company name")?;
            SignupRequest::employer(username, password, employer_name)
        }
        _ => {
            let first_name = prompt_optional("First name")?;
            let last_name = prompt_optional("Last name")?;
            SignupRequest::user(username, password, first_name, last_name)
        }
    };

    println!("Creating account...");

    let payload = match ctx.api.signup(&request).await {
        Ok(payload) => payload,
        Err(err) => {
            output::print_error(&format!("Signup failed: {}", err), format);
            return Ok(false);
        }
    };

    match ctx.manager.login(payload.access_token.clone(), payload.account()) {
        Ok(_) => {
            output::print_success("Account created!", format);
            Ok(true)
        }
        Err(err) => {
            tracing::debug!(error = %err, "signup response rejected");
            output::print_error("Signup failed", format);
            Ok(false)
        }
    }
}

/// Logout and clear the session.
pub async fn logout(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    ctx.manager.logout()?;
    output::print_success("Logged out successfully", format);
    Ok(())
}

/// Show the current session state.
pub async fn status(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let session = ctx.session();

    match format {
        OutputFormat::Text => {
            if let Some(user) = session.user() {
                println!("Auth:     logged in");
                println!("Name:     {}", user.display_name());
                if let Some(id) = user.id {
                    println!("User ID:  {}", id);
                }
                println!("Role:     {}", user.role);
            } else {
                println!("Auth:     not logged in");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "logged_in": session.is_authenticated(),
                "user_id": session.user_id(),
                "role": session.effective_role().map(|r| r.as_str()),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

/// Change the password: verify the old credentials, then set the new
/// password. The session in this process is untouched.
pub async fn reset(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let username = prompt("Username")?;
    let current = rpassword::prompt_password("Current password: ")?;

    let payload = match ctx.api.login(&username, &current).await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(error = %err, "reset verification failed");
            output::print_error("Invalid username or password.", format);
            return Ok(());
        }
    };

    let token = match payload.access_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            output::print_error("Invalid username or password.", format);
            return Ok(());
        }
    };

    let new_password = rpassword::prompt_password("New password: ")?;
    if new_password.is_empty() {
        output::print_error("New password is required", format);
        return Ok(());
    }

    match ctx.api.reset_password(&token, &new_password).await {
        Ok(()) => output::print_success(
            "Password updated. Log in with your new password.",
            format,
        ),
        Err(err) => output::print_error(&format!("Reset failed: {}", err), format),
    }

    Ok(())
}
