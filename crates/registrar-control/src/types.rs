//! Request and response types for enrollment and account operations.

use registrar_core::CourseId;
use registrar_store::Course;
use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Configuration for the registrar service.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    /// Shortest password accepted on profile save.
    #[serde(default = "ControlConfig::default_min_password_length")]
    pub min_password_length: usize,
}

impl ControlConfig {
    const fn default_min_password_length() -> usize {
        6
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            min_password_length: Self::default_min_password_length(),
        }
    }
}

/// Editable profile fields submitted on save.
///
/// `student_id` and `username` are not editable and therefore absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
    /// Phone number; empty clears it.
    #[serde(default)]
    pub phone_number: String,
    /// Postal address; empty clears it.
    #[serde(default)]
    pub address: String,
    /// New password, stored as typed.
    pub password: String,
}

/// Result of dropping one course in a bulk drop.
#[derive(Debug)]
pub struct DropOutcome {
    /// The course that was requested.
    pub course_id: CourseId,
    /// The updated course (`None` if it is no longer listed), or why the
    /// drop failed.
    pub result: Result<Option<Course>, ControlError>,
}

impl DropOutcome {
    /// Whether this drop went through.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A course whose stored enrollment disagrees with the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentDrift {
    /// The affected course.
    pub course_id: CourseId,
    /// `current_enrollment` as stored in the course file.
    pub recorded: u32,
    /// Number of ledger rows naming the course.
    pub ledger: u32,
}

/// One catalog row as seen by a logged-in student.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    /// The course record.
    #[serde(flatten)]
    pub course: Course,
    /// The student holds a seat in this course.
    pub registered: bool,
    /// At least one seat is free.
    pub available: bool,
}

/// Totals over a student's schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScheduleSummary {
    /// Number of registered courses.
    pub total_courses: u32,
    /// Sum of credits.
    pub total_credits: u32,
    /// Mean credits per course, zero when the schedule is empty.
    pub average_credits: f64,
}

impl ScheduleSummary {
    /// Summarize a list of courses.
    #[must_use]
    pub fn of(courses: &[Course]) -> Self {
        let total_courses = u32::try_from(courses.len()).unwrap_or(u32::MAX);
        let total_credits = courses
            .iter()
            .map(|c| c.credits)
            .fold(0, u32::saturating_add);
        let average_credits = if total_courses == 0 {
            0.0
        } else {
            f64::from(total_credits) / f64::from(total_courses)
        };

        Self {
            total_courses,
            total_credits,
            average_credits,
        }
    }
}
