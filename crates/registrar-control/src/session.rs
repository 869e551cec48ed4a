//! Login sessions.
//!
//! A [`Session`] is the explicit, owned context for one logged-in student. It
//! is created by [`login`], handed to every operation that acts on behalf of
//! the student, and consumed by [`logout`]. Nothing about the active user is
//! held in global state.

use chrono::{DateTime, Utc};
use registrar_core::{CourseId, SessionId, StudentId};
use registrar_store::{Store, Student};
use serde::Serialize;
use tracing::info;

use crate::error::{ControlError, Result};

/// An authenticated student and when they logged in.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    session_id: SessionId,
    pub(crate) student: Student,
    started_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(student: Student) -> Self {
        Self {
            session_id: SessionId::generate(),
            student,
            started_at: Utc::now(),
        }
    }

    /// The session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.session_id
    }

    /// The logged-in student, as of the last login, refresh or profile save.
    #[must_use]
    pub const fn student(&self) -> &Student {
        &self.student
    }

    /// Shorthand for the logged-in student's id.
    #[must_use]
    pub const fn student_id(&self) -> &StudentId {
        &self.student.student_id
    }

    /// When the session was created.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Course ids the student is registered in.
    #[must_use]
    pub fn registered_courses(&self) -> &[CourseId] {
        &self.student.registered_courses
    }

    /// Whether the student holds a seat in `course_id`.
    #[must_use]
    pub fn is_registered(&self, course_id: &CourseId) -> bool {
        self.student.registered_courses.contains(course_id)
    }
}

/// Authenticate and open a session.
///
/// The username is trimmed; the password is compared exactly as given.
///
/// # Errors
///
/// Returns `ControlError::Validation` if either field is empty and
/// `ControlError::InvalidCredentials` if no student matches. An unknown
/// username and a wrong password are not distinguished.
pub fn login<S: Store + ?Sized>(store: &S, username: &str, password: &str) -> Result<Session> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ControlError::Validation(vec![
            "Please enter both username and password.".to_string(),
        ]));
    }

    let student = store
        .authenticate(username, password)?
        .ok_or(ControlError::InvalidCredentials)?;

    let session = Session::new(student);
    info!(
        session_id = %session.session_id,
        student_id = %session.student.student_id,
        "Student logged in"
    );
    Ok(session)
}

/// Reload the session's registered courses from the ledger.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read.
pub fn refresh<S: Store + ?Sized>(store: &S, session: &mut Session) -> Result<()> {
    session.student.registered_courses = store.registrations_for(&session.student.student_id)?;
    Ok(())
}

/// End a session.
pub fn logout(session: Session) -> SessionId {
    info!(
        session_id = %session.session_id,
        student_id = %session.student.student_id,
        "Student logged out"
    );
    session.session_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_store::FileStore;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn login_with_seeded_account() {
        let (store, _dir) = create_test_store();
        let session = login(&store, "  johndoe ", "password123").unwrap();
        assert_eq!(session.student_id().as_str(), "STU001");
        assert_eq!(session.student().full_name(), "John Doe");
        assert!(session.registered_courses().is_empty());
    }

    #[test]
    fn login_loads_registrations() {
        let (store, _dir) = create_test_store();
        let student = StudentId::new("STU001").unwrap();
        let course = CourseId::new("CS101").unwrap();
        store.add_registration(&student, &course).unwrap();

        let session = login(&store, "johndoe", "password123").unwrap();
        assert!(session.is_registered(&course));
        assert_eq!(
            session.registered_courses(),
            store.registrations_for(&student).unwrap().as_slice()
        );
    }

    #[test]
    fn bad_credentials_are_indistinguishable() {
        let (store, _dir) = create_test_store();
        let wrong_password = login(&store, "johndoe", "nope").unwrap_err();
        let unknown_user = login(&store, "ghost", "password123").unwrap_err();
        assert!(matches!(wrong_password, ControlError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn empty_fields_rejected() {
        let (store, _dir) = create_test_store();
        assert!(matches!(
            login(&store, "   ", "password123"),
            Err(ControlError::Validation(_))
        ));
        assert!(matches!(
            login(&store, "johndoe", ""),
            Err(ControlError::Validation(_))
        ));
    }

    #[test]
    fn password_is_not_trimmed() {
        let (store, _dir) = create_test_store();
        assert!(login(&store, "johndoe", " password123").is_err());
    }

    #[test]
    fn refresh_picks_up_ledger_changes() {
        let (store, _dir) = create_test_store();
        let mut session = login(&store, "johndoe", "password123").unwrap();
        let course = CourseId::new("ENG101").unwrap();
        store
            .add_registration(session.student_id(), &course)
            .unwrap();

        assert!(!session.is_registered(&course));
        refresh(&store, &mut session).unwrap();
        assert!(session.is_registered(&course));
    }

    #[test]
    fn logout_returns_session_id() {
        let (store, _dir) = create_test_store();
        let session = login(&store, "admin", "admin123").unwrap();
        let id = session.id();
        assert_eq!(logout(session), id);
    }
}
