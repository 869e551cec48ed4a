//! Flat-file storage layer for the course registrar.
//!
//! This crate persists students, courses and registrations as `|`-delimited
//! text files inside a single data directory.
//!
//! # Architecture
//!
//! The store uses the following files:
//!
//! - `students.txt`: student records, keyed by `studentId`
//! - `courses.txt`: course records including the enrollment counter
//! - `registrations.txt`: the ledger of `(studentId, courseId)` pairs
//!
//! Every operation is a full synchronous read or rewrite of one file; nothing
//! is cached between calls. Missing files read as empty collections. On first
//! open the [`seed`] module writes the default dataset for any file that does
//! not exist yet.
//!
//! # Example
//!
//! ```no_run
//! use registrar_store::{FileStore, Store};
//!
//! let store = FileStore::open("data").unwrap();
//!
//! if let Some(student) = store.authenticate("johndoe", "password123").unwrap() {
//!     println!("{} holds {} seats", student.full_name(), student.registered_courses.len());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod error;
pub mod file;
pub mod schema;
pub mod seed;
pub mod types;

pub use error::{CodecError, Result, StoreError};
pub use file::FileStore;
pub use schema::{DataFile, StoreConfig};
pub use seed::SeedReport;
pub use types::{Course, Registration, Student};

use registrar_core::{CourseId, StudentId};

/// The storage trait defining all persistence operations.
///
/// This trait abstracts the storage layer so the enrollment coordinator does
/// not depend on the file layout.
pub trait Store: Send + Sync {
    // =========================================================================
    // Student Operations
    // =========================================================================

    /// Load every well-formed student record, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn load_students(&self) -> Result<Vec<Student>>;

    /// Replace the student file with the given records, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be encoded or the file cannot be written.
    fn save_students(&self, students: &[Student]) -> Result<()>;

    /// Find the first student whose username and password both match exactly.
    ///
    /// On a match the returned student's `registered_courses` is filled from
    /// the ledger. A miss is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the student file or the ledger cannot be read.
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<Student>> {
        let Some(mut student) = self
            .load_students()?
            .into_iter()
            .find(|s| s.username == username && s.password == password)
        else {
            return Ok(None);
        };

        student.registered_courses = self.registrations_for(&student.student_id)?;
        Ok(Some(student))
    }

    // =========================================================================
    // Course Operations
    // =========================================================================

    /// Load every well-formed course record, in file order.
    ///
    /// Loading stops at the first record with a malformed number and returns
    /// what was read up to that point.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn load_courses(&self) -> Result<Vec<Course>>;

    /// Load the complete course file ahead of rewriting it.
    ///
    /// Unlike [`Store::load_courses`] this never returns a partial list: any
    /// record that fails to decode is an error. Lines too short to be a record
    /// are still skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` naming the first bad line, or an error if
    /// the file exists but cannot be read.
    fn load_courses_strict(&self) -> Result<Vec<Course>>;

    /// Replace the course file with the given records, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be encoded or the file cannot be written.
    fn save_courses(&self, courses: &[Course]) -> Result<()>;

    // =========================================================================
    // Registration Ledger
    // =========================================================================

    /// Load every well-formed ledger row, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn load_registrations(&self) -> Result<Vec<Registration>>;

    /// List the courses a student is registered in, in ledger order.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn registrations_for(&self, student_id: &StudentId) -> Result<Vec<CourseId>> {
        Ok(self
            .load_registrations()?
            .into_iter()
            .filter(|r| r.student_id == *student_id)
            .map(|r| r.course_id)
            .collect())
    }

    /// Append a ledger row.
    ///
    /// Returns `false` without writing if the pair is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read or appended to.
    fn add_registration(&self, student_id: &StudentId, course_id: &CourseId) -> Result<bool>;

    /// Rewrite the ledger without any row matching the pair.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read or rewritten.
    fn remove_registration(&self, student_id: &StudentId, course_id: &CourseId) -> Result<usize>;

    // =========================================================================
    // Housekeeping
    // =========================================================================

    /// Whether the backing file of a collection exists.
    fn exists(&self, file: DataFile) -> bool;
}
