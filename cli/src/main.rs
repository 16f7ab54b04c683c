//! JobberWobber CLI - the job board from the terminal.

mod commands;
mod context;
mod output;
mod routes;
mod shell;

use clap::{Parser, Subcommand};
use client_config::{Config, Paths};
use context::AppContext;
use routes::Destination;

/// JobberWobber CLI - search, post, and apply to job listings.
#[derive(Parser)]
#[command(name = "jobwob")]
#[command(about = "JobberWobber job board from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with username and password
    Login,

    /// Logout and clear the session
    Logout,

    /// Create an account
    Signup,

    /// Show the current session
    Status,

    /// Change your password
    Reset,

    /// Browse or search job listings
    Jobs {
        /// Search query; omit to list everything
        query: Option<String>,
        /// Also search the remote aggregator
        #[arg(long)]
        remote: bool,
    },

    /// Inspect a single listing
    Listing {
        #[command(subcommand)]
        command: ListingCommands,
    },

    /// Apply to a listing (job seekers)
    Apply {
        /// Listing ID
        listing_id: i64,
    },

    /// Your submitted applications (job seekers)
    Applications,

    /// Your dashboard
    Dashboard,

    /// View or edit your resume (job seekers)
    Resume {
        #[command(subcommand)]
        command: FieldCommands,
    },

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: FieldCommands,
    },

    /// Manage your job listings (employers)
    Listings {
        #[command(subcommand)]
        command: ListingsCommands,
    },

    /// Review received applications (employers)
    Applicants {
        #[command(subcommand)]
        command: ApplicantCommands,
    },

    /// Talk to the job assistant
    Chat,
}

#[derive(Subcommand)]
enum ListingCommands {
    /// Show a listing in full
    Show {
        /// Listing ID
        id: i64,
        /// Include similar remote jobs
        #[arg(long)]
        similar: bool,
    },
}

#[derive(Subcommand)]
enum FieldCommands {
    /// Show current values
    Show,
    /// Set fields, e.g. `set skills="Rust, SQL"`
    Set {
        /// `<field>=<value>` pairs
        fields: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ListingsCommands {
    /// List your posted listings
    List,
    /// Post a new listing (missing fields are prompted for)
    Create {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long = "type")]
        job_type: Option<String>,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Edit a listing; unset fields keep their value
    Edit {
        /// Listing ID
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long = "type")]
        job_type: Option<String>,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a listing
    Delete {
        /// Listing ID
        id: i64,
    },
    /// Bulk-upload listings from a CSV file
    UploadCsv {
        /// Path to the CSV file
        path: String,
    },
}

#[derive(Subcommand)]
enum ApplicantCommands {
    /// List received applications
    List,
    /// Show one application in full
    Show {
        /// Application ID
        id: i64,
    },
    /// Update an application's status
    SetStatus {
        /// Application ID
        id: i64,
        /// New status (Submitted, Under Review, Interview, Rejected, Accepted)
        status: String,
    },
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let paths = match Paths::new() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let config = Config::load(&paths).unwrap_or_else(|e| {
        eprintln!("Warning: could not read config ({}), using defaults", e);
        Config::new()
    });

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    init_logging(&level);

    let ctx = match AppContext::build(config, &paths) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(command) => dispatch(&ctx, command, &cli.format).await,
        // No subcommand: run the interactive shell, the closest thing a
        // terminal has to the web client's single-page flow.
        None => shell::run(&ctx, &cli.format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn dispatch(
    ctx: &AppContext,
    command: Commands,
    format: &output::OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Login => {
            commands::run_gated(ctx, format, Destination::Login, || async {
                commands::login(ctx, format).await.map(|_| ())
            })
            .await
        }
        Commands::Logout => commands::logout(ctx, format).await,
        Commands::Signup => {
            commands::run_gated(ctx, format, Destination::Signup, || async {
                commands::signup(ctx, format).await.map(|_| ())
            })
            .await
        }
        Commands::Status => commands::status(ctx, format).await,
        Commands::Reset => {
            commands::run_gated(ctx, format, Destination::Reset, || {
                commands::reset(ctx, format)
            })
            .await
        }

        Commands::Jobs { query, remote } => {
            commands::run_gated(ctx, format, Destination::Jobs, || async {
                commands::browse(ctx, query.as_deref(), remote, format).await
            })
            .await
        }
        Commands::Listing { command } => match command {
            ListingCommands::Show { id, similar } => {
                commands::run_gated(ctx, format, Destination::Listing, || {
                    commands::show_listing(ctx, id, similar, format)
                })
                .await
            }
        },
        Commands::Apply { listing_id } => {
            commands::run_gated(ctx, format, Destination::Apply, || {
                commands::apply(ctx, listing_id, format)
            })
            .await
        }

        Commands::Applications => {
            commands::run_gated(ctx, format, Destination::Applications, || {
                commands::applied(ctx, format)
            })
            .await
        }
        Commands::Dashboard => {
            commands::run_gated(ctx, format, Destination::Dashboard, || {
                commands::dashboard(ctx, format)
            })
            .await
        }

        Commands::Resume { command } => {
            let pairs = match &command {
                FieldCommands::Show => Vec::new(),
                FieldCommands::Set { fields } => commands::parse_pairs(fields)?,
            };
            commands::run_gated(ctx, format, Destination::Resume, || async {
                match command {
                    FieldCommands::Show => commands::resume_show(ctx, format).await,
                    FieldCommands::Set { .. } => commands::resume_set(ctx, &pairs, format).await,
                }
            })
            .await
        }
        Commands::Profile { command } => {
            let pairs = match &command {
                FieldCommands::Show => Vec::new(),
                FieldCommands::Set { fields } => commands::parse_pairs(fields)?,
            };
            commands::run_gated(ctx, format, Destination::Profile, || async {
                match command {
                    FieldCommands::Show => commands::profile_show(ctx, format).await,
                    FieldCommands::Set { .. } => commands::profile_set(ctx, &pairs, format).await,
                }
            })
            .await
        }

        Commands::Listings { command } => match command {
            ListingsCommands::List => {
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::employer_listings(ctx, format)
                })
                .await
            }
            ListingsCommands::Create {
                title,
                location,
                job_type,
                experience,
                salary,
                description,
            } => {
                let fields = commands::ListingFields {
                    title,
                    location,
                    job_type,
                    experience,
                    salary,
                    description,
                };
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::create_listing(ctx, fields, format)
                })
                .await
            }
            ListingsCommands::Edit {
                id,
                title,
                location,
                job_type,
                experience,
                salary,
                description,
            } => {
                let fields = commands::ListingFields {
                    title,
                    location,
                    job_type,
                    experience,
                    salary,
                    description,
                };
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::edit_listing(ctx, id, fields, format)
                })
                .await
            }
            ListingsCommands::Delete { id } => {
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::delete_listing(ctx, id, format)
                })
                .await
            }
            ListingsCommands::UploadCsv { path } => {
                commands::run_gated(ctx, format, Destination::Listings, || {
                    commands::upload_csv(ctx, &path, format)
                })
                .await
            }
        },

        Commands::Applicants { command } => match command {
            ApplicantCommands::List => {
                commands::run_gated(ctx, format, Destination::Applicants, || {
                    commands::applicants(ctx, format)
                })
                .await
            }
            ApplicantCommands::Show { id } => {
                commands::run_gated(ctx, format, Destination::Applicants, || {
                    commands::applicant_detail(ctx, id, format)
                })
                .await
            }
            ApplicantCommands::SetStatus { id, status } => {
                commands::run_gated(ctx, format, Destination::Applicants, || {
                    commands::set_status(ctx, id, &status, format)
                })
                .await
            }
        },

        Commands::Chat => {
            commands::run_gated(ctx, format, Destination::Chat, || {
                commands::chat(ctx, Vec::new(), format)
            })
            .await
        }
    }
}
