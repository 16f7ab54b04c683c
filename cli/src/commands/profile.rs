//! Profile and resume commands.

use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use session_store::Role;

/// Profile fields editable through the dashboard profile editor.
const PROFILE_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "phone",
    "about_me",
    "location",
    "linkedin_url",
    "profile_photo_url",
];

/// Resume fields editable through the resume screen.
const RESUME_FIELDS: &[&str] = &["experience", "skills", "education", "summary", "other"];

/// Employer profile fields.
const EMPLOYER_FIELDS: &[&str] = &["employer_name"];

/// Show the profile snapshot from the current session.
pub async fn profile_show(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let session = ctx.session();
    let Some(user) = session.user() else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    if let OutputFormat::Json = format {
        output::print_json(user);
        return Ok(());
    }

    output::print_heading(&user.display_name());
    if let Some(id) = user.id {
        output::print_row("ID", &id.to_string());
    }
    output::print_row("Role", user.role.as_str());
    let fields: &[&str] = match user.role {
        Role::User => PROFILE_FIELDS,
        Role::Employer => EMPLOYER_FIELDS,
    };
    for key in fields {
        if let Some(value) = user.field(key) {
            if !value.is_empty() {
                output::print_row(key, value);
            }
        }
    }
    Ok(())
}

/// Save profile edits, then refresh the stored session snapshot with
/// whatever the backend returns, the same write-through the browser
/// client did with its stored `user` record.
pub async fn profile_set(
    ctx: &AppContext,
    pairs: &[(String, String)],
    format: &OutputFormat,
) -> Result<()> {
    let session = ctx.session();
    let (Some(user), Some(id)) = (session.user(), session.user_id()) else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    let allowed: &[&str] = match user.role {
        Role::User => PROFILE_FIELDS,
        Role::Employer => EMPLOYER_FIELDS,
    };
    let Some(updated) = apply_pairs(user.clone(), pairs, allowed, format) else {
        return Ok(());
    };

    let saved = match user.role {
        Role::User => ctx.api.update_user(id, &updated).await,
        Role::Employer => ctx.api.update_employer(id, &updated).await,
    };

    match saved {
        Ok(profile) => {
            ctx.manager.refresh_profile(profile)?;
            output::print_success("Profile updated.", format);
        }
        Err(err) => output::print_error(&format!("Unable to save profile: {}", err), format),
    }
    Ok(())
}

/// Show the resume fields.
pub async fn resume_show(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let session = ctx.session();
    let Some(user) = session.user() else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    output::print_heading("Resume");
    let mut any = false;
    for key in RESUME_FIELDS {
        if let Some(value) = user.field(key) {
            if !value.is_empty() {
                output::print_row(key, value);
                any = true;
            }
        }
    }
    if !any {
        println!("No resume on file yet. Use 'resume set <field>=<value>'.");
    }
    Ok(())
}

/// Save resume edits and refresh the stored snapshot.
pub async fn resume_set(
    ctx: &AppContext,
    pairs: &[(String, String)],
    format: &OutputFormat,
) -> Result<()> {
    let session = ctx.session();
    let (Some(user), Some(id)) = (session.user(), session.user_id()) else {
        output::print_error("Not logged in.", format);
        return Ok(());
    };

    let Some(updated) = apply_pairs(user.clone(), pairs, RESUME_FIELDS, format) else {
        return Ok(());
    };

    match ctx.api.update_user(id, &updated).await {
        Ok(profile) => {
            ctx.manager.refresh_profile(profile)?;
            output::print_success("Resume updated.", format);
        }
        Err(err) => output::print_error(&format!("Unable to save resume: {}", err), format),
    }
    Ok(())
}

/// Overlay `field=value` pairs onto a profile, rejecting unknown fields.
fn apply_pairs(
    mut profile: session_store::Profile,
    pairs: &[(String, String)],
    allowed: &[&str],
    format: &OutputFormat,
) -> Option<session_store::Profile> {
    if pairs.is_empty() {
        output::print_error("Nothing to update. Pass <field>=<value> pairs.", format);
        return None;
    }
    for (key, value) in pairs {
        if !allowed.contains(&key.as_str()) {
            output::print_error(
                &format!("Unknown field '{}'. Allowed: {}", key, allowed.join(", ")),
                format,
            );
            return None;
        }
        profile.set_field(key, value.clone());
    }
    Some(profile)
}

/// Parse `field=value` arguments.
pub fn parse_pairs(args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| anyhow::anyhow!("expected <field>=<value>, got '{}'", arg))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let pairs = parse_pairs(&["skills=Rust, SQL".to_string(), "summary=hi".to_string()]).unwrap();
        assert_eq!(pairs[0], ("skills".to_string(), "Rust, SQL".to_string()));
        assert_eq!(pairs[1], ("summary".to_string(), "hi".to_string()));
    }

    #[test]
    fn test_parse_pairs_rejects_missing_equals() {
        assert!(parse_pairs(&["skills".to_string()]).is_err());
    }
}
