//! Application tracking and review commands, plus the dashboards.

use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::StatusSummary;
use session_store::Role;

/// The seeker's submitted applications.
pub async fn applied(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let Some(user_id) = ctx.session().user_id() else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    let jobs = match ctx.api.applied_jobs(user_id).await {
        Ok(jobs) => jobs,
        Err(err) => {
            output::print_error(&format!("Unable to load applications: {}", err), format);
            return Ok(());
        }
    };

    if let OutputFormat::Json = format {
        output::print_json(&jobs);
        return Ok(());
    }

    if jobs.is_empty() {
        println!("You have not applied to any jobs yet.");
        return Ok(());
    }

    output::print_heading(&format!("{} application(s)", jobs.len()));
    for job in &jobs {
        println!(
            "[{}] {} at {} - {}",
            job.app_id,
            job.title,
            job.company,
            job.status.as_deref().unwrap_or("Submitted")
        );
    }
    Ok(())
}

/// Applications received by the employer, across all listings.
pub async fn applicants(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let Some(employer_id) = ctx.session().user_id() else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    let apps = match ctx.api.received_applications(employer_id).await {
        Ok(apps) => apps,
        Err(err) => {
            output::print_error(&format!("Unable to load applications: {}", err), format);
            return Ok(());
        }
    };

    if let OutputFormat::Json = format {
        output::print_json(&apps);
        return Ok(());
    }

    if apps.is_empty() {
        println!("You have not received any applications yet.");
        return Ok(());
    }

    output::print_heading(&format!("{} application(s)", apps.len()));
    for app in &apps {
        println!(
            "[{}] {} - {}",
            app.id,
            app.title,
            app.status.as_deref().unwrap_or("Submitted")
        );
    }
    Ok(())
}

/// Full detail for one received application.
pub async fn applicant_detail(ctx: &AppContext, app_id: i64, format: &OutputFormat) -> Result<()> {
    let detail = match ctx.api.application_detail(app_id).await {
        Ok(detail) => detail,
        Err(err) => {
            output::print_error(&format!("Unable to load application: {}", err), format);
            return Ok(());
        }
    };

    if let OutputFormat::Json = format {
        output::print_json(&detail);
        return Ok(());
    }

    let title = detail
        .listing
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or("(unknown listing)");
    output::print_heading(&format!("Application {} - {}", app_id, title));
    output::print_row(
        "Status",
        detail.application.status.as_deref().unwrap_or("Submitted"),
    );
    for (label, key) in [
        ("Name", "first_name"),
        ("Surname", "last_name"),
        ("Email", "email"),
        ("Phone", "phone"),
        ("Location", "location"),
        ("LinkedIn", "linkedin"),
        ("Experience", "experience"),
        ("Skills", "skills"),
        ("Education", "education"),
        ("Summary", "summary"),
        ("Other", "other"),
    ] {
        if let Some(value) = detail.applicant.get(key).and_then(|v| v.as_str()) {
            if !value.is_empty() {
                output::print_row(label, value);
            }
        }
    }
    Ok(())
}

/// Move a received application to a new status.
pub async fn set_status(
    ctx: &AppContext,
    app_id: i64,
    status: &str,
    format: &OutputFormat,
) -> Result<()> {
    match ctx.api.set_application_status(app_id, status).await {
        Ok(()) => output::print_success(&format!("Status updated to {}.", status), format),
        Err(err) => output::print_error(&format!("Unable to update status: {}", err), format),
    }
    Ok(())
}

/// Role-dispatched dashboard: seekers and employers get different
/// variants of the same destination.
pub async fn dashboard(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let session = ctx.session();
    let (Some(user), Some(id)) = (session.user(), session.user_id()) else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    match user.role {
        Role::User => {
            output::print_heading(&format!("Dashboard - {}", user.display_name()));
            match ctx.api.user_status_summary(id).await {
                Ok(summary) => print_status_summary(&summary, format),
                Err(err) => {
                    output::print_error(&format!("Unable to load application status: {}", err), format)
                }
            }
            println!("\nTry 'applications' or 'resume' for details.");
        }
        Role::Employer => {
            output::print_heading(&format!("Employer dashboard - {}", user.display_name()));
            match ctx.api.employer_status_summary(id).await {
                Ok(summary) => print_status_summary(&summary, format),
                Err(err) => {
                    output::print_error(&format!("Unable to load application status: {}", err), format)
                }
            }
            match ctx.api.employer_listings(id).await {
                Ok(listings) => println!("\nActive listings: {}", listings.len()),
                Err(err) => tracing::debug!(error = %err, "listing count unavailable"),
            }
            println!("Try 'listings' or 'applicants' for details.");
        }
    }
    Ok(())
}

fn print_status_summary(summary: &StatusSummary, format: &OutputFormat) {
    if let OutputFormat::Json = format {
        output::print_json(summary);
        return;
    }
    for (status, count) in summary {
        output::print_row(status, &count.to_string());
    }
}
