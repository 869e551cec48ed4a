//! Registrar service implementation.
//!
//! This module provides the `Registrar` trait and the `RegistrarService`
//! implementation that front ends call into.
//!
//! All mutating operations are serialized through one in-process writer lock,
//! so a capacity check and the increment that follows it can never interleave
//! with another register or drop issued through the same service. Separate
//! processes sharing a data directory are not coordinated; the last full-file
//! rewrite wins.

use std::sync::Arc;

use parking_lot::Mutex;
use registrar_core::{CourseId, SessionId};
use registrar_store::{Course, Store, Student};
use tracing::warn;

use crate::enrollment;
use crate::error::Result;
use crate::profile;
use crate::session::{self, Session};
use crate::types::{
    CatalogEntry, ControlConfig, DropOutcome, EnrollmentDrift, ProfileUpdate, ScheduleSummary,
};

/// Trait defining the operations available to a front end.
pub trait Registrar: Send + Sync {
    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Authenticate and open a session.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::InvalidCredentials` on any mismatch.
    fn login(&self, username: &str, password: &str) -> Result<Session>;

    /// End a session.
    fn logout(&self, session: Session) -> SessionId;

    /// Reload the session's registrations from the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn refresh(&self, session: &mut Session) -> Result<()>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every course, in course file order.
    ///
    /// Read failures are logged and yield an empty list.
    fn courses(&self) -> Vec<Course>;

    /// Every course, flagged for the session's student.
    ///
    /// Read failures are logged and yield an empty catalog.
    fn catalog(&self, session: &Session) -> Vec<CatalogEntry>;

    /// The session student's registered courses, in ledger order.
    ///
    /// Read failures are logged and yield an empty schedule.
    fn schedule(&self, session: &Session) -> Vec<Course>;

    /// Totals over [`Registrar::schedule`].
    fn summary(&self, session: &Session) -> ScheduleSummary {
        ScheduleSummary::of(&self.schedule(session))
    }

    /// Courses whose stored enrollment disagrees with the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if a data file cannot be read.
    fn enrollment_drift(&self) -> Result<Vec<EnrollmentDrift>>;

    // =========================================================================
    // Enrollment Operations
    // =========================================================================

    /// Register the session's student for a course.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::CourseNotFound`, `AlreadyRegistered` or
    /// `CapacityExceeded`, or a storage error.
    fn register(&self, session: &mut Session, course_id: &CourseId) -> Result<Course>;

    /// Drop a course for the session's student.
    ///
    /// Returns `None` when the registration was removed but the course itself
    /// is no longer listed.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::NotRegistered`, or a storage error.
    fn drop_course(
        &self,
        session: &mut Session,
        course_id: &CourseId,
    ) -> Result<Option<Course>>;

    /// Drop several courses; failures do not stop or undo the others.
    fn drop_many(&self, session: &mut Session, course_ids: &[CourseId]) -> Vec<DropOutcome>;

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Validate and save the session student's profile.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Validation` listing every rejected field, or a
    /// storage error.
    fn save_profile(&self, session: &mut Session, update: &ProfileUpdate) -> Result<Student>;
}

/// The main registrar service implementation.
pub struct RegistrarService<S: Store> {
    store: Arc<S>,
    config: ControlConfig,
    writer: Mutex<()>,
}

impl<S: Store> RegistrarService<S> {
    /// Create a new registrar service.
    #[must_use]
    pub fn new(store: Arc<S>, config: ControlConfig) -> Self {
        Self {
            store,
            config,
            writer: Mutex::new(()),
        }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, ControlConfig::default())
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ControlConfig {
        &self.config
    }
}

fn or_empty<T: Default>(what: &str, result: registrar_store::Result<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load {what}; continuing with no data");
        T::default()
    })
}

impl<S: Store> Registrar for RegistrarService<S> {
    // =========================================================================
    // Session Operations
    // =========================================================================

    fn login(&self, username: &str, password: &str) -> Result<Session> {
        session::login(self.store.as_ref(), username, password)
    }

    fn logout(&self, session: Session) -> SessionId {
        session::logout(session)
    }

    fn refresh(&self, session: &mut Session) -> Result<()> {
        session::refresh(self.store.as_ref(), session)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn courses(&self) -> Vec<Course> {
        or_empty("courses", self.store.load_courses())
    }

    fn catalog(&self, session: &Session) -> Vec<CatalogEntry> {
        self.courses()
            .into_iter()
            .map(|course| CatalogEntry {
                registered: session.is_registered(&course.course_id),
                available: course.is_available(),
                course,
            })
            .collect()
    }

    fn schedule(&self, session: &Session) -> Vec<Course> {
        let registered = or_empty(
            "registrations",
            self.store.registrations_for(session.student_id()),
        );
        let courses = or_empty("courses", self.store.load_courses());

        registered
            .iter()
            .filter_map(|id| courses.iter().find(|c| c.course_id == *id).cloned())
            .collect()
    }

    fn enrollment_drift(&self) -> Result<Vec<EnrollmentDrift>> {
        enrollment::enrollment_drift(self.store.as_ref())
    }

    // =========================================================================
    // Enrollment Operations
    // =========================================================================

    fn register(&self, session: &mut Session, course_id: &CourseId) -> Result<Course> {
        let _guard = self.writer.lock();
        let course = enrollment::register(self.store.as_ref(), session.student_id(), course_id)?;

        if !session.is_registered(course_id) {
            session.student.registered_courses.push(course_id.clone());
        }
        Ok(course)
    }

    fn drop_course(
        &self,
        session: &mut Session,
        course_id: &CourseId,
    ) -> Result<Option<Course>> {
        let _guard = self.writer.lock();
        let course = enrollment::drop_course(self.store.as_ref(), session.student_id(), course_id)?;

        session.student.registered_courses.retain(|id| id != course_id);
        Ok(course)
    }

    fn drop_many(&self, session: &mut Session, course_ids: &[CourseId]) -> Vec<DropOutcome> {
        let _guard = self.writer.lock();
        let outcomes = enrollment::drop_many(self.store.as_ref(), session.student_id(), course_ids);

        for outcome in outcomes.iter().filter(|o| o.is_ok()) {
            session
                .student
                .registered_courses
                .retain(|id| *id != outcome.course_id);
        }
        outcomes
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    fn save_profile(&self, session: &mut Session, update: &ProfileUpdate) -> Result<Student> {
        let _guard = self.writer.lock();
        profile::save_profile(self.store.as_ref(), &self.config, session, update)
    }
}
