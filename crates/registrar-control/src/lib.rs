//! Enrollment coordination for the course registrar.
//!
//! This crate provides the business logic behind every front end: logging in,
//! registering for and dropping courses, editing a profile, and the catalog
//! and schedule views. It keeps the course file's enrollment counters and the
//! registration ledger consistent with each other.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI / UI                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RegistrarService                        │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  Session    │ │ Enrollment  │ │      Profile        │    │
//! │  │  Login      │ │ Register/   │ │      Validation     │    │
//! │  │             │ │ Drop        │ │                     │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                       ┌────────────┐
//!                       │   Store    │
//!                       │ (files)    │
//!                       └────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use registrar_control::{CourseId, FileStore, Registrar, RegistrarService};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(FileStore::open("data")?);
//! let registrar = RegistrarService::with_defaults(store);
//!
//! let mut session = registrar.login("johndoe", "password123")?;
//! let course = registrar.register(&mut session, &CourseId::new("CS101")?)?;
//!
//! println!(
//!     "{}: {}/{}",
//!     course.course_id, course.current_enrollment, course.max_capacity
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod enrollment;
pub mod error;
pub mod profile;
pub mod service;
pub mod session;
pub mod types;

pub use error::{ControlError, ErrorKind, Result};
pub use service::{Registrar, RegistrarService};
pub use session::Session;
pub use types::{
    CatalogEntry, ControlConfig, DropOutcome, EnrollmentDrift, ProfileUpdate, ScheduleSummary,
};

// Re-export commonly used types from dependencies for convenience
pub use registrar_core::{CourseId, SessionId, StudentId};
pub use registrar_store::{Course, FileStore, Registration, Store, StoreConfig, Student};
