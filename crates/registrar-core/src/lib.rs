//! Core types for the course registrar.
//!
//! This crate provides the identifier types shared by the storage layer, the
//! enrollment coordinator and the command-line front end:
//!
//! - [`StudentId`] and [`CourseId`]: validated text keys that are safe to
//!   write into a `|`-delimited record
//! - [`SessionId`]: random identifier for a login session
//!
//! # Example
//!
//! ```
//! use registrar_core::{CourseId, SessionId, StudentId};
//!
//! let student = StudentId::new("STU001").unwrap();
//! let course: CourseId = "CS101".parse().unwrap();
//! let session = SessionId::generate();
//!
//! assert!(CourseId::new("CS|101").is_err());
//! # let _ = (student, course, session);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;

pub use ids::{CourseId, IdError, SessionId, StudentId};
