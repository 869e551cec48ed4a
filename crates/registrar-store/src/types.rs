//! Domain types stored in the data files.
//!
//! These types represent the persisted state of students, courses and
//! registrations.

use registrar_core::{CourseId, StudentId};
use serde::{Deserialize, Serialize};

/// A student record stored in `students.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier, immutable after creation.
    pub student_id: StudentId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
    /// Login name, unique and immutable.
    pub username: String,
    /// Plaintext credential compared by equality at login.
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Optional postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Courses this student is registered in.
    ///
    /// Filled from the registration ledger at login; never written to the
    /// student file.
    #[serde(default)]
    pub registered_courses: Vec<CourseId>,
}

impl Student {
    /// Create a student with the required fields and no optional data.
    #[must_use]
    pub fn new(
        student_id: StudentId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            student_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            username: username.into(),
            password: password.into(),
            phone_number: None,
            address: None,
            registered_courses: Vec::new(),
        }
    }

    /// First and last name separated by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A course record stored in `courses.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier, immutable.
    pub course_id: CourseId,
    /// Display name.
    pub course_name: String,
    /// Instructor name.
    pub instructor: String,
    /// Free-text meeting times (e.g. `MWF 10:00-11:00`).
    pub schedule: String,
    /// Credit hours.
    pub credits: u32,
    /// Seat limit, fixed at creation.
    pub max_capacity: u32,
    /// Seats taken. Only the enrollment coordinator changes this.
    pub current_enrollment: u32,
    /// Optional course description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional prerequisites, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<String>,
}

impl Course {
    /// Create an empty course with no optional data.
    #[must_use]
    pub fn new(
        course_id: CourseId,
        course_name: impl Into<String>,
        instructor: impl Into<String>,
        schedule: impl Into<String>,
        credits: u32,
        max_capacity: u32,
    ) -> Self {
        Self {
            course_id,
            course_name: course_name.into(),
            instructor: instructor.into(),
            schedule: schedule.into(),
            credits,
            max_capacity,
            current_enrollment: 0,
            description: None,
            prerequisites: None,
        }
    }

    /// Whether at least one seat is free.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.current_enrollment < self.max_capacity
    }

    /// Number of free seats.
    #[must_use]
    pub const fn available_spots(&self) -> u32 {
        self.max_capacity.saturating_sub(self.current_enrollment)
    }

    /// Take one seat. Does nothing once the course is full.
    pub fn increment_enrollment(&mut self) {
        if self.current_enrollment < self.max_capacity {
            self.current_enrollment += 1;
        }
    }

    /// Release one seat. Never goes below zero.
    pub fn decrement_enrollment(&mut self) {
        self.current_enrollment = self.current_enrollment.saturating_sub(1);
    }
}

/// One row of `registrations.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registration {
    /// The registered student.
    pub student_id: StudentId,
    /// The course they hold a seat in.
    pub course_id: CourseId,
}

impl Registration {
    /// Create a registration pair.
    #[must_use]
    pub const fn new(student_id: StudentId, course_id: CourseId) -> Self {
        Self {
            student_id,
            course_id,
        }
    }

    /// Whether this row names the given pair.
    #[must_use]
    pub fn matches(&self, student_id: &StudentId, course_id: &CourseId) -> bool {
        self.student_id == *student_id && self.course_id == *course_id
    }
}
