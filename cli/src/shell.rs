//! Interactive shell: the terminal analog of the single-page app.
//!
//! Each shell command is a navigation to a destination; the route gate
//! is re-evaluated on every one. The store watcher runs for the life of
//! the shell, so a login or logout in another terminal is announced and
//! reflected in the next navigation.

use crate::commands::{self, ListingFields};
use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use crate::routes::Destination;
use anyhow::Result;
use session_sync::StoreWatcher;
use std::io::{self, Write};

/// Run the shell until EOF or `quit`.
pub async fn run(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let watcher = StoreWatcher::spawn(ctx.manager.clone());
    let mut session_rx = watcher.subscribe();
    let mut search_history: Vec<String> = Vec::new();

    commands::welcome(ctx, format)?;
    println!("Type 'help' for the list of pages, 'quit' to leave.");

    loop {
        let line = prompt_line(ctx)?;

        if session_rx.has_changed().unwrap_or(false) {
            session_rx.mark_unchanged();
            announce_session_change(ctx);
        }

        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };
        let rest: Vec<String> = parts.map(str::to_string).collect();

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,

            "home" | "welcome" => {
                commands::run_gated(ctx, format, Destination::Welcome, || async {
                    commands::welcome(ctx, format)
                })
                .await?;
            }
            "status" => commands::status(ctx, format).await?,
            "login" => {
                commands::run_gated(ctx, format, Destination::Login, || async {
                    commands::login(ctx, format).await.map(|_| ())
                })
                .await?;
            }
            "logout" => commands::logout(ctx, format).await?,
            "signup" => {
                commands::run_gated(ctx, format, Destination::Signup, || async {
                    commands::signup(ctx, format).await.map(|_| ())
                })
                .await?;
            }
            "reset" => {
                commands::run_gated(ctx, format, Destination::Reset, || {
                    commands::reset(ctx, format)
                })
                .await?;
            }

            "jobs" | "search" => {
                let query = if rest.is_empty() {
                    None
                } else {
                    Some(rest.join(" "))
                };
                if let Some(q) = &query {
                    search_history.push(q.clone());
                }
                commands::run_gated(ctx, format, Destination::Jobs, || async {
                    commands::browse(ctx, query.as_deref(), false, format).await
                })
                .await?;
            }
            "open" => {
                if let Some(id) = parse_id(&rest, "open <listing-id>", format) {
                    commands::run_gated(ctx, format, Destination::Listing, || {
                        commands::show_listing(ctx, id, true, format)
                    })
                    .await?;
                }
            }
            "apply" => {
                if let Some(id) = parse_id(&rest, "apply <listing-id>", format) {
                    commands::run_gated(ctx, format, Destination::Apply, || {
                        commands::apply(ctx, id, format)
                    })
                    .await?;
                }
            }

            "dashboard" => {
                commands::run_gated(ctx, format, Destination::Dashboard, || {
                    commands::dashboard(ctx, format)
                })
                .await?;
            }
            "applications" => {
                commands::run_gated(ctx, format, Destination::Applications, || {
                    commands::applied(ctx, format)
                })
                .await?;
            }
            "resume" => {
                let pairs = match commands::parse_pairs(&rest) {
                    Ok(pairs) => pairs,
                    Err(err) => {
                        output::print_error(&err.to_string(), format);
                        continue;
                    }
                };
                commands::run_gated(ctx, format, Destination::Resume, || async {
                    if pairs.is_empty() {
                        commands::resume_show(ctx, format).await
                    } else {
                        commands::resume_set(ctx, &pairs, format).await
                    }
                })
                .await?;
            }
            "profile" => {
                let pairs = match commands::parse_pairs(&rest) {
                    Ok(pairs) => pairs,
                    Err(err) => {
                        output::print_error(&err.to_string(), format);
                        continue;
                    }
                };
                commands::run_gated(ctx, format, Destination::Profile, || async {
                    if pairs.is_empty() {
                        commands::profile_show(ctx, format).await
                    } else {
                        commands::profile_set(ctx, &pairs, format).await
                    }
                })
                .await?;
            }

            "listings" => {
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::employer_listings(ctx, format)
                })
                .await?;
            }
            "post" => {
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::create_listing(ctx, ListingFields::default(), format)
                })
                .await?;
            }
            "edit" => {
                if let Some(id) = parse_id(&rest, "edit <listing-id>", format) {
                    commands::run_gated(ctx, format, Destination::Listings, || async {
                        let fields = prompt_listing_overrides()?;
                        commands::edit_listing(ctx, id, fields, format).await
                    })
                    .await?;
                }
            }
            "drop" => {
                if let Some(id) = parse_id(&rest, "drop <listing-id>", format) {
                    commands::run_gated(ctx, format, Destination::Listings, || {
                        commands::delete_listing(ctx, id, format)
                    })
                    .await?;
                }
            }
            "upload" => {
                let Some(path) = rest.first().cloned() else {
                    output::print_error("Usage: upload <path-to-csv>", format);
                    continue;
                };
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::upload_csv(ctx, &path, format)
                })
                .await?;
            }

            "applicants" => {
                commands::run_gated(ctx, format, Destination::Applicants, || {
                    commands::applicants(ctx, format)
                })
                .await?;
            }
            "review" => {
                if let Some(id) = parse_id(&rest, "review <application-id>", format) {
                    commands::run_gated(ctx, format, Destination::Applicants, || {
                        commands::applicant_detail(ctx, id, format)
                    })
                    .await?;
                }
            }
            "set-status" => {
                let id = parse_id(&rest, "set-status <application-id> <status>", format);
                let status = rest.get(1..).map(|s| s.join(" ")).unwrap_or_default();
                match id {
                    Some(id) if !status.is_empty() => {
                        commands::run_gated(ctx, format, Destination::Applicants, || {
                            commands::set_status(ctx, id, &status, format)
                        })
                        .await?;
                    }
                    Some(_) => {
                        output::print_error("Usage: set-status <application-id> <status>", format)
                    }
                    None => {}
                }
            }

            "chat" => {
                let history = search_history.clone();
                commands::run_gated(ctx, format, Destination::Chat, || {
                    commands::chat(ctx, history, format)
                })
                .await?;
            }

            other => {
                println!("Unknown command '{}'. Type 'help'.", other);
            }
        }
    }

    Ok(())
}

fn prompt_line(ctx: &AppContext) -> Result<String> {
    let session = ctx.session();
    match session.user() {
        Some(user) => print!("jobwob({})> ", user.display_name()),
        None => print!("jobwob> "),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        // EOF behaves like quit.
        return Ok("quit".to_string());
    }
    Ok(line.trim().to_string())
}

fn parse_id(rest: &[String], usage: &str, format: &OutputFormat) -> Option<i64> {
    match rest.first().and_then(|s| s.parse::<i64>().ok()) {
        Some(id) => Some(id),
        None => {
            output::print_error(&format!("Usage: {}", usage), format);
            None
        }
    }
}

fn prompt_listing_overrides() -> Result<ListingFields> {
    println!("Leave a field empty to keep the current value.");
    Ok(ListingFields {
        title: commands::prompt_optional("Title")?,
        location: commands::prompt_optional("Location")?,
        job_type: commands::prompt_optional("Type")?,
        experience: commands::prompt_optional("Experience")?,
        salary: commands::prompt_optional("Salary")?,
        description: commands::prompt_optional("Description")?,
    })
}

fn announce_session_change(ctx: &AppContext) {
    match ctx.session().user() {
        Some(user) => println!(
            "(session changed in another window: now logged in as {})",
            user.display_name()
        ),
        None => println!("(session changed in another window: logged out)"),
    }
}

fn print_help() {
    println!("Pages:");
    println!("  home                    landing page");
    println!("  jobs [query]            browse or search listings");
    println!("  open <id>               listing detail with similar jobs");
    println!("  apply <id>              apply to a listing (job seekers)");
    println!("  dashboard               your dashboard");
    println!("  applications            your submitted applications (job seekers)");
    println!("  resume [field=value..]  view or edit your resume (job seekers)");
    println!("  profile [field=value..] view or edit your profile");
    println!("  listings                your posted listings (employers)");
    println!("  post                    post a new listing (employers)");
    println!("  edit <id>               edit a listing (employers)");
    println!("  drop <id>               delete a listing (employers)");
    println!("  upload <path>           bulk-upload listings from CSV (employers)");
    println!("  applicants              received applications (employers)");
    println!("  review <id>             application detail (employers)");
    println!("  set-status <id> <s>     update an application's status (employers)");
    println!("  chat                    talk to the job assistant");
    println!("  login / logout / signup / reset / status / quit");
}
