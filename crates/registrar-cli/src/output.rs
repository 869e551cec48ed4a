//! Plain-text and JSON rendering.

use std::fmt::Write as _;

use anyhow::Result;
use registrar_control::{
    CatalogEntry, ControlError, Course, CourseId, DropOutcome, EnrollmentDrift, ScheduleSummary,
    Session, Student,
};
use serde::Serialize;

/// Result of one course in a register or drop command.
///
/// A successful drop of a course that is no longer listed has neither a
/// course nor an error.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub course_id: CourseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn new(course_id: CourseId, result: Result<Option<Course>, ControlError>) -> Self {
        match result {
            Ok(course) => Self {
                course_id,
                course,
                error: None,
            },
            Err(e) => Self {
                course_id,
                course: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl From<DropOutcome> for Outcome {
    fn from(outcome: DropOutcome) -> Self {
        Self::new(outcome.course_id, outcome.result)
    }
}

/// Writes command results to stdout.
pub struct Printer {
    json: bool,
}

impl Printer {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T, plain: impl FnOnce() -> String) -> Result<()> {
        let text = if self.json {
            serde_json::to_string_pretty(value)?
        } else {
            plain()
        };
        println!("{text}");
        Ok(())
    }

    pub fn courses(&self, courses: &[Course]) -> Result<()> {
        self.emit(courses, || render_courses(courses))
    }

    pub fn catalog(&self, entries: &[CatalogEntry]) -> Result<()> {
        self.emit(entries, || render_catalog(entries))
    }

    pub fn session(&self, session: &Session) -> Result<()> {
        self.emit(session, || render_session(session))
    }

    pub fn student(&self, student: &Student) -> Result<()> {
        self.emit(student, || render_student(student))
    }

    pub fn outcomes(&self, verb: &str, outcomes: &[Outcome]) -> Result<()> {
        self.emit(outcomes, || render_outcomes(verb, outcomes))
    }

    pub fn schedule(&self, courses: &[Course], summary: &ScheduleSummary) -> Result<()> {
        #[derive(Serialize)]
        struct Schedule<'a> {
            courses: &'a [Course],
            summary: &'a ScheduleSummary,
        }

        self.emit(&Schedule { courses, summary }, || {
            render_schedule(courses, summary)
        })
    }

    pub fn drift(&self, drift: &[EnrollmentDrift]) -> Result<()> {
        self.emit(drift, || render_drift(drift))
    }
}

fn course_line(course: &Course) -> String {
    format!(
        "{:<8} {:<30} {:<14} {:<16} {} cr  {}/{}",
        course.course_id.as_str(),
        course.course_name,
        course.instructor,
        course.schedule,
        course.credits,
        course.current_enrollment,
        course.max_capacity
    )
}

fn render_courses(courses: &[Course]) -> String {
    if courses.is_empty() {
        return "No courses available.".to_string();
    }
    courses
        .iter()
        .map(course_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_catalog(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No courses available.".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            let mark = if entry.registered { '*' } else { ' ' };
            let full = if entry.available { "" } else { "  (full)" };
            format!("{mark} {}{full}", course_line(&entry.course))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_student(student: &Student) -> String {
    let mut out = format!("{} ({})\n", student.full_name(), student.student_id);
    let _ = writeln!(out, "Username: {}", student.username);
    let _ = writeln!(out, "Email:    {}", student.email);
    if let Some(phone) = &student.phone_number {
        let _ = writeln!(out, "Phone:    {phone}");
    }
    if let Some(address) = &student.address {
        let _ = writeln!(out, "Address:  {address}");
    }
    if student.registered_courses.is_empty() {
        out.push_str("Courses:  none");
    } else {
        let ids: Vec<&str> = student
            .registered_courses
            .iter()
            .map(CourseId::as_str)
            .collect();
        let _ = write!(out, "Courses:  {}", ids.join(", "));
    }
    out
}

fn render_session(session: &Session) -> String {
    format!(
        "{}\nSession:  {} (since {})",
        render_student(session.student()),
        session.id(),
        session.started_at().format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn render_outcomes(verb: &str, outcomes: &[Outcome]) -> String {
    outcomes
        .iter()
        .map(|outcome| match (&outcome.error, &outcome.course) {
            (Some(error), _) => format!("{}: {error}", outcome.course_id),
            (None, Some(course)) => format!(
                "{verb} {} ({}/{})",
                outcome.course_id, course.current_enrollment, course.max_capacity
            ),
            (None, None) => format!("{verb} {} (no longer listed)", outcome.course_id),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_schedule(courses: &[Course], summary: &ScheduleSummary) -> String {
    if courses.is_empty() {
        return "No registered courses.".to_string();
    }
    format!(
        "{}\n{} courses, {} credits, {:.1} credits on average",
        render_courses(courses),
        summary.total_courses,
        summary.total_credits,
        summary.average_credits
    )
}

fn render_drift(drift: &[EnrollmentDrift]) -> String {
    if drift.is_empty() {
        return "All enrollment counters match the registration ledger.".to_string();
    }
    drift
        .iter()
        .map(|d| {
            format!(
                "{}: recorded {}, ledger {}",
                d.course_id, d.recorded, d.ledger
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
