//! Listing browse, detail, and apply commands.

use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::{AdzunaJob, ApplicationForm, JobCard};

/// Browse listings: all of them, or a search, optionally merged with
/// aggregator results the way the web client's search page can.
pub async fn browse(
    ctx: &AppContext,
    query: Option<&str>,
    include_remote: bool,
    format: &OutputFormat,
) -> Result<()> {
    let local = match query {
        Some(q) => ctx.api.search(q).await,
        None => ctx.api.jobcards().await,
    };

    let local = match local {
        Ok(jobs) => jobs,
        Err(err) => {
            output::print_error(&format!("Server error: {}", err), format);
            return Ok(());
        }
    };

    if let OutputFormat::Json = format {
        output::print_json(&local);
    } else if local.is_empty() {
        println!("No listings found.");
    } else {
        output::print_heading(&format!("{} listing(s)", local.len()));
        for job in &local {
            print_job_card(job);
        }
    }

    if include_remote {
        if let Some(q) = query {
            match ctx.api.adzuna(q).await {
                Ok(remote) => print_remote_jobs(&remote, format),
                Err(err) => {
                    tracing::debug!(error = %err, "aggregator search failed");
                    output::print_error("Remote search unavailable.", format);
                }
            }
        }
    }

    Ok(())
}

fn print_job_card(job: &JobCard) {
    println!(
        "[{}] {} - {}",
        job.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
        job.title,
        job.company
    );
    println!(
        "      {} | {} | {} | {}",
        job.location, job.job_type, job.experience, job.salary
    );
}

fn print_remote_jobs(jobs: &[AdzunaJob], format: &OutputFormat) {
    if let OutputFormat::Json = format {
        output::print_json(jobs);
        return;
    }
    if jobs.is_empty() {
        return;
    }
    output::print_heading(&format!("{} remote match(es)", jobs.len()));
    for job in jobs {
        println!("{} - {} ({})", job.title, job.company, job.location);
        println!("      {}", job.url);
    }
}

/// Show one listing in full, with similar remote jobs when asked.
pub async fn show_listing(
    ctx: &AppContext,
    id: i64,
    with_similar: bool,
    format: &OutputFormat,
) -> Result<()> {
    let listing = match ctx.api.listing(id).await {
        Ok(listing) => listing,
        Err(err) => {
            output::print_error(&format!("Error fetching job listing: {}", err), format);
            return Ok(());
        }
    };

    if let OutputFormat::Json = format {
        output::print_json(&listing);
    } else {
        output::print_heading(&listing.title);
        output::print_row("Location", &listing.location);
        output::print_row("Type", &listing.job_type);
        output::print_row("Experience", &listing.experience);
        output::print_row("Salary", &listing.salary);
        println!("\n{}", listing.description);
    }

    if with_similar {
        match ctx.api.similar(id, 5).await {
            Ok(similar) if !similar.remote_matches.is_empty() => {
                output::print_heading("Similar jobs elsewhere");
                for job in &similar.remote_matches {
                    println!("{} - {}", job.title, job.company);
                    println!("      {}", job.url);
                }
            }
            Ok(_) => {}
            Err(err) => tracing::debug!(error = %err, "similar jobs unavailable"),
        }
    }

    Ok(())
}

/// Apply to a listing with the current profile as the application
/// snapshot. The route gate has already ensured a logged-in seeker.
pub async fn apply(ctx: &AppContext, listing_id: i64, format: &OutputFormat) -> Result<()> {
    let session = ctx.session();
    let (token, profile) = match (session.token(), session.user()) {
        (Some(token), Some(user)) => (token.to_string(), user.clone()),
        _ => {
            output::print_error("Please log in to apply for this job.", format);
            return Ok(());
        }
    };
    let user_id = match profile.id {
        Some(id) => id,
        None => {
            output::print_error("Please log in to apply for this job.", format);
            return Ok(());
        }
    };

    let listing = match ctx.api.listing(listing_id).await {
        Ok(listing) => listing,
        Err(err) => {
            output::print_error(&format!("Error fetching job listing: {}", err), format);
            return Ok(());
        }
    };

    let form = ApplicationForm::from_profile(user_id, listing.employer_id, listing_id, &profile);

    match ctx.api.apply(&form, &token).await {
        Ok(()) => {
            output::print_success("Application submitted successfully!", format);
        }
        Err(err) if err.status() == Some(409) => {
            output::print_error(&err.to_string(), format);
        }
        Err(err) => {
            tracing::debug!(error = %err, "apply failed");
            output::print_error("Error submitting application.", format);
        }
    }

    Ok(())
}
