//! Subcommand handlers.

use anyhow::{Context, Result};
use registrar_control::{ProfileUpdate, Registrar, ScheduleSummary, Session, Student};

use crate::output::{Outcome, Printer};
use crate::{Command, Credentials, ProfileArgs};

impl Credentials {
    fn is_given(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    fn login<R: Registrar>(&self, registrar: &R) -> Result<Session> {
        let username = self
            .username
            .as_deref()
            .context("--username is required (or set REGISTRAR_USERNAME)")?;
        let password = self
            .password
            .as_deref()
            .context("--password is required (or set REGISTRAR_PASSWORD)")?;
        Ok(registrar.login(username, password)?)
    }
}

impl ProfileArgs {
    /// Merge the requested changes over the student's current profile.
    fn apply(self, student: &Student) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self
                .first_name
                .unwrap_or_else(|| student.first_name.clone()),
            last_name: self.last_name.unwrap_or_else(|| student.last_name.clone()),
            email: self.email.unwrap_or_else(|| student.email.clone()),
            phone_number: self
                .phone
                .or_else(|| student.phone_number.clone())
                .unwrap_or_default(),
            address: self
                .address
                .or_else(|| student.address.clone())
                .unwrap_or_default(),
            password: self
                .new_password
                .unwrap_or_else(|| student.password.clone()),
        }
    }
}

/// Run one subcommand. Returns `false` when it completed with partial failures.
pub fn run<R: Registrar>(registrar: &R, printer: &Printer, command: Command) -> Result<bool> {
    match command {
        Command::Courses { credentials } => {
            if credentials.is_given() {
                let session = credentials.login(registrar)?;
                printer.catalog(&registrar.catalog(&session))?;
                registrar.logout(session);
            } else {
                printer.courses(&registrar.courses())?;
            }
            Ok(true)
        }

        Command::Login { credentials } => {
            let session = credentials.login(registrar)?;
            printer.session(&session)?;
            registrar.logout(session);
            Ok(true)
        }

        Command::Register {
            credentials,
            course_ids,
        } => {
            let mut session = credentials.login(registrar)?;
            let outcomes: Vec<Outcome> = course_ids
                .into_iter()
                .map(|course_id| {
                    let result = registrar.register(&mut session, &course_id).map(Some);
                    Outcome::new(course_id, result)
                })
                .collect();
            printer.outcomes("registered", &outcomes)?;
            registrar.logout(session);
            Ok(outcomes.iter().all(Outcome::is_ok))
        }

        Command::Drop {
            credentials,
            course_ids,
        } => {
            let mut session = credentials.login(registrar)?;
            let outcomes: Vec<Outcome> = registrar
                .drop_many(&mut session, &course_ids)
                .into_iter()
                .map(Outcome::from)
                .collect();
            printer.outcomes("dropped", &outcomes)?;
            registrar.logout(session);
            Ok(outcomes.iter().all(Outcome::is_ok))
        }

        Command::Schedule { credentials } => {
            let session = credentials.login(registrar)?;
            let courses = registrar.schedule(&session);
            printer.schedule(&courses, &ScheduleSummary::of(&courses))?;
            registrar.logout(session);
            Ok(true)
        }

        Command::Profile {
            credentials,
            changes,
        } => {
            let mut session = credentials.login(registrar)?;
            let update = changes.apply(session.student());
            let student = registrar.save_profile(&mut session, &update)?;
            printer.student(&student)?;
            registrar.logout(session);
            Ok(true)
        }

        Command::Check => {
            let drift = registrar.enrollment_drift()?;
            printer.drift(&drift)?;
            Ok(drift.is_empty())
        }
    }
}
