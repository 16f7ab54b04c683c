//! CLI command implementations.

mod applications;
mod auth;
mod chat;
mod jobs;
mod listings;
mod profile;

pub use applications::{applicant_detail, applicants, applied, dashboard, set_status};
pub use auth::{login, logout, reset, signup, status};
pub use chat::chat;
pub use jobs::{apply, browse, show_listing};
pub use listings::{
    create_listing, delete_listing, edit_listing, employer_listings, upload_csv, ListingFields,
};
pub use profile::{parse_pairs, profile_set, profile_show, resume_set, resume_show};

use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use crate::routes::{self, Destination};
use anyhow::Result;
use route_gate::RouteDecision;
use std::future::Future;
use std::io::{self, Write};

/// Run a destination behind the route gate.
///
/// `Allow` renders it; `RedirectLogin` sends the user to the login
/// screen and onward to the dashboard on success, like the web
/// client (the blocked destination is not retried); `RedirectHome`
/// lands on the welcome screen.
pub async fn run_gated<F, Fut>(
    ctx: &AppContext,
    format: &OutputFormat,
    destination: Destination,
    run: F,
) -> Result<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match routes::gate(ctx, destination) {
        RouteDecision::Allow => run().await,
        RouteDecision::RedirectLogin => {
            output::print_error("Please log in first.", format);
            if auth::login(ctx, format).await? {
                applications::dashboard(ctx, format).await?;
            }
            Ok(())
        }
        RouteDecision::RedirectHome => {
            output::print_error("That page is not available for your account type.", format);
            welcome(ctx, format)
        }
    }
}

/// The landing screen: a banner plus hints appropriate to the session.
pub fn welcome(ctx: &AppContext, _format: &OutputFormat) -> Result<()> {
    println!("JobberWobber - find your next job, or your next hire.");
    match ctx.session().user() {
        Some(user) => {
            println!("Logged in as {}.", user.display_name());
            println!("Try 'jobs', 'dashboard', or 'chat'.");
        }
        None => {
            println!("Browse with 'jobs <query>'. Log in or sign up to apply.");
        }
    }
    Ok(())
}

/// Prompt for a line of input on stdout/stdin.
pub(crate) fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Prompt for a line, returning `None` when left empty.
pub(crate) fn prompt_optional(label: &str) -> Result<Option<String>> {
    let value = prompt(label)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}
