//! Employer listing management commands.

use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::NewListing;

/// Field overrides for creating or editing a listing.
#[derive(Debug, Default, Clone)]
pub struct ListingFields {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
}

fn employer_id(ctx: &AppContext) -> Option<i64> {
    ctx.session().user_id()
}

/// List the employer's own listings.
pub async fn employer_listings(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let Some(id) = employer_id(ctx) else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    let listings = match ctx.api.employer_listings(id).await {
        Ok(listings) => listings,
        Err(err) => {
            output::print_error(&format!("Unable to load listings: {}", err), format);
            return Ok(());
        }
    };

    if let OutputFormat::Json = format {
        output::print_json(&listings);
        return Ok(());
    }

    if listings.is_empty() {
        println!("You have not posted any listings yet.");
        return Ok(());
    }

    output::print_heading(&format!("{} listing(s)", listings.len()));
    for listing in &listings {
        println!(
            "[{}] {} | {} | {} | {}",
            listing.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            listing.title,
            listing.location,
            listing.job_type,
            listing.salary
        );
    }
    Ok(())
}

/// Post a new listing. Missing fields are prompted for.
pub async fn create_listing(
    ctx: &AppContext,
    fields: ListingFields,
    format: &OutputFormat,
) -> Result<()> {
    let Some(id) = employer_id(ctx) else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    let listing = NewListing {
        employer_id: id,
        title: required(fields.title, "Title")?,
        location: required(fields.location, "Location")?,
        job_type: required(fields.job_type, "Type (Full-time/Part-time/Contract)")?,
        experience: required(fields.experience, "Experience level")?,
        salary: required(fields.salary, "Salary")?,
        description: required(fields.description, "Description")?,
    };

    match ctx.api.create_listing(&listing).await {
        Ok(created) => {
            let id = created.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
            output::print_success(&format!("Listing {} created.", id), format);
        }
        Err(err) => output::print_error(&format!("Unable to create listing: {}", err), format),
    }
    Ok(())
}

/// Edit an existing listing: fetch it, overlay the provided fields, and
/// save the result.
pub async fn edit_listing(
    ctx: &AppContext,
    listing_id: i64,
    fields: ListingFields,
    format: &OutputFormat,
) -> Result<()> {
    let current = match ctx.api.listing(listing_id).await {
        Ok(listing) => listing,
        Err(err) => {
            output::print_error(&format!("Unable to load listing: {}", err), format);
            return Ok(());
        }
    };

    let updated = NewListing {
        employer_id: current.employer_id,
        title: fields.title.unwrap_or(current.title),
        location: fields.location.unwrap_or(current.location),
        job_type: fields.job_type.unwrap_or(current.job_type),
        experience: fields.experience.unwrap_or(current.experience),
        salary: fields.salary.unwrap_or(current.salary),
        description: fields.description.unwrap_or(current.description),
    };

    match ctx.api.update_listing(listing_id, &updated).await {
        Ok(_) => output::print_success("Listing updated.", format),
        Err(err) => output::print_error(&format!("Unable to update listing: {}", err), format),
    }
    Ok(())
}

/// Delete a listing.
pub async fn delete_listing(ctx: &AppContext, listing_id: i64, format: &OutputFormat) -> Result<()> {
    match ctx.api.delete_listing(listing_id).await {
        Ok(()) => output::print_success("Listing deleted.", format),
        Err(err) => output::print_error(&format!("Unable to delete listing: {}", err), format),
    }
    Ok(())
}

/// Bulk-upload listings from a CSV file with `title,location,type,
/// experience,salary,description` columns.
pub async fn upload_csv(ctx: &AppContext, path: &str, format: &OutputFormat) -> Result<()> {
    let Some(id) = employer_id(ctx) else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    let contents = match std::fs::read(path) {
        Ok(contents) => contents,
        Err(err) => {
            output::print_error(&format!("Unable to read {}: {}", path, err), format);
            return Ok(());
        }
    };

    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("listings.csv");

    match ctx.api.upload_listings_csv(id, file_name, contents).await {
        Ok(message) => output::print_success(&message, format),
        Err(err) => output::print_error(&format!("Upload failed: {}", err), format),
    }
    Ok(())
}

fn required(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => super::prompt(label),
    }
}
