//! Registrar CLI - command-line front end for course registration.
//!
//! This is the entry point for the `registrar` binary.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use registrar_control::{ControlConfig, CourseId, FileStore, RegistrarService, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use output::Printer;

/// Registrar CLI - browse courses, register, drop and edit your profile.
#[derive(Parser, Debug)]
#[command(name = "registrar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding students.txt, courses.txt and registrations.txt.
    #[arg(long, env = "REGISTRAR_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Do not write the default dataset into an empty data directory.
    #[arg(long, global = true)]
    no_seed: bool,

    /// Shortest password accepted on profile save.
    #[arg(
        long,
        env = "REGISTRAR_MIN_PASSWORD_LENGTH",
        default_value_t = 6,
        global = true
    )]
    min_password_length: usize,

    /// Print JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Login details shared by every command that acts for a student.
#[derive(clap::Args, Debug, Clone, Default)]
struct Credentials {
    /// Username to log in with.
    #[arg(long, env = "REGISTRAR_USERNAME")]
    username: Option<String>,

    /// Password to log in with.
    #[arg(long, env = "REGISTRAR_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

/// Profile fields to change; anything omitted keeps its current value.
#[derive(clap::Args, Debug, Clone, Default)]
struct ProfileArgs {
    /// New given name.
    #[arg(long)]
    first_name: Option<String>,

    /// New family name.
    #[arg(long)]
    last_name: Option<String>,

    /// New email address.
    #[arg(long)]
    email: Option<String>,

    /// New phone number; pass an empty string to clear it.
    #[arg(long)]
    phone: Option<String>,

    /// New postal address; pass an empty string to clear it.
    #[arg(long)]
    address: Option<String>,

    /// New password.
    #[arg(long)]
    new_password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every course; with credentials, mark the ones you hold.
    Courses {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Check credentials and show the student record.
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Register for one or more courses.
    Register {
        #[command(flatten)]
        credentials: Credentials,

        /// Course ids, e.g. CS101.
        #[arg(required = true)]
        course_ids: Vec<CourseId>,
    },

    /// Drop one or more courses.
    Drop {
        #[command(flatten)]
        credentials: Credentials,

        /// Course ids, e.g. CS101.
        #[arg(required = true)]
        course_ids: Vec<CourseId>,
    },

    /// Show your registered courses and credit totals.
    Schedule {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Update your profile.
    Profile {
        #[command(flatten)]
        credentials: Credentials,

        #[command(flatten)]
        changes: ProfileArgs,
    },

    /// Compare stored enrollment counters with the registration ledger.
    Check,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "info,registrar=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    init_tracing(args.debug);

    // Open the store, seeding on first run
    let store_config = StoreConfig {
        data_dir: args.data_dir.clone(),
        seed_defaults: !args.no_seed,
    };
    let store = Arc::new(FileStore::open_with(&store_config)?);
    tracing::debug!(data_dir = %args.data_dir.display(), "Opened data directory");

    let config = ControlConfig {
        min_password_length: args.min_password_length,
    };
    let registrar = RegistrarService::new(store, config);
    let printer = Printer::new(args.json);

    let succeeded = commands::run(&registrar, &printer, args.command)?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn register_takes_many_course_ids() {
        let args = Args::try_parse_from([
            "registrar",
            "register",
            "--username",
            "johndoe",
            "--password",
            "password123",
            "CS101",
            "MATH101",
        ])
        .unwrap();

        match args.command {
            Command::Register {
                credentials,
                course_ids,
            } => {
                assert_eq!(credentials.username.as_deref(), Some("johndoe"));
                assert_eq!(
                    course_ids,
                    [
                        CourseId::new("CS101").unwrap(),
                        CourseId::new("MATH101").unwrap()
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn register_requires_a_course() {
        assert!(Args::try_parse_from(["registrar", "register"]).is_err());
    }

    #[test]
    fn course_id_with_delimiter_is_rejected() {
        assert!(Args::try_parse_from(["registrar", "drop", "CS|101"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from(["registrar", "check", "--json", "--data-dir", "/tmp/reg"])
            .unwrap();
        assert!(args.json);
        assert_eq!(args.data_dir, PathBuf::from("/tmp/reg"));
        assert!(matches!(args.command, Command::Check));
    }
}
