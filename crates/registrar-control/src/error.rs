//! Error types for the enrollment and account layer.
//!
//! This module defines all errors that can occur while registering, dropping,
//! logging in or editing a profile.

use registrar_core::{CourseId, StudentId};
use thiserror::Error;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Broad classification of a [`ControlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A student, course or registration lookup missed.
    NotFound,
    /// The course has no free seat.
    CapacityExceeded,
    /// The request conflicts with existing state.
    Conflict,
    /// Login failed.
    Unauthorized,
    /// User input was rejected.
    Validation,
    /// A data file could not be read or written.
    Io,
}

/// Errors that can occur in enrollment and account operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The requested course does not exist.
    #[error("course not found: {0}")]
    CourseNotFound(CourseId),

    /// The requested student does not exist.
    #[error("student not found: {0}")]
    StudentNotFound(StudentId),

    /// The course is full.
    #[error("course {course_id} is full: capacity is {max_capacity}")]
    CapacityExceeded {
        /// The course that was requested.
        course_id: CourseId,
        /// Its seat limit.
        max_capacity: u32,
    },

    /// The student already holds a seat in the course.
    #[error("student {student_id} is already registered for {course_id}")]
    AlreadyRegistered {
        /// The student making the request.
        student_id: StudentId,
        /// The course being requested.
        course_id: CourseId,
    },

    /// The student holds no seat in the course.
    #[error("student {student_id} is not registered for {course_id}")]
    NotRegistered {
        /// The student making the request.
        student_id: StudentId,
        /// The course being dropped.
        course_id: CourseId,
    },

    /// Username or password did not match. Deliberately does not say which.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// One or more input fields were rejected.
    #[error("invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] registrar_store::StoreError),
}

impl ControlError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CourseNotFound(_) | Self::StudentNotFound(_) | Self::NotRegistered { .. } => {
                ErrorKind::NotFound
            }
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::AlreadyRegistered { .. } => ErrorKind::Conflict,
            Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Io,
        }
    }
}
