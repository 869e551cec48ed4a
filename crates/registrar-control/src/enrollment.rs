//! Enrollment coordination.
//!
//! This module keeps the course file's enrollment counters and the
//! registration ledger in step. Every operation reloads both from disk, so the
//! capacity check always runs against current state. The course file is loaded
//! strictly: if any record in it is unreadable the operation fails before
//! anything is written, since rewriting the file would drop that record. The functions here do no
//! locking of their own; callers that may run concurrently must serialize them
//! (see [`RegistrarService`](crate::RegistrarService)).
//!
//! A register writes the course file first and appends to the ledger second.
//! The two writes are not atomic: if the append fails the seat is handed back,
//! but a crash in between leaves the files out of step. [`enrollment_drift`]
//! reports any course where that has happened.

use std::collections::HashMap;

use registrar_core::{CourseId, StudentId};
use registrar_store::{Course, Store};
use tracing::{info, warn};

use crate::error::{ControlError, Result};
use crate::types::{DropOutcome, EnrollmentDrift};

fn find_course<'a>(courses: &'a mut [Course], course_id: &CourseId) -> Result<&'a mut Course> {
    courses
        .iter_mut()
        .find(|c| c.course_id == *course_id)
        .ok_or_else(|| ControlError::CourseNotFound(course_id.clone()))
}

/// Register a student for a course.
///
/// Returns the course with its updated enrollment.
///
/// # Errors
///
/// Returns an error if:
/// - The course does not exist
/// - The student is already registered for it
/// - The course is full
/// - The course file holds a corrupt record
/// - A data file cannot be read or written
pub fn register<S: Store + ?Sized>(
    store: &S,
    student_id: &StudentId,
    course_id: &CourseId,
) -> Result<Course> {
    let mut courses = store.load_courses_strict()?;
    let course = find_course(&mut courses, course_id)?;

    if store.registrations_for(student_id)?.contains(course_id) {
        return Err(ControlError::AlreadyRegistered {
            student_id: student_id.clone(),
            course_id: course_id.clone(),
        });
    }

    if !course.is_available() {
        return Err(ControlError::CapacityExceeded {
            course_id: course_id.clone(),
            max_capacity: course.max_capacity,
        });
    }

    course.increment_enrollment();
    let updated = course.clone();
    store.save_courses(&courses)?;

    let appended = match store.add_registration(student_id, course_id) {
        Ok(appended) => appended,
        Err(e) => {
            release_seat(store, &mut courses, course_id);
            return Err(e.into());
        }
    };
    if !appended {
        warn!(%student_id, %course_id, "Registration appeared during register");
        release_seat(store, &mut courses, course_id);
        return Err(ControlError::AlreadyRegistered {
            student_id: student_id.clone(),
            course_id: course_id.clone(),
        });
    }

    info!(
        %student_id,
        %course_id,
        enrollment = updated.current_enrollment,
        capacity = updated.max_capacity,
        "Registered for course"
    );
    Ok(updated)
}

/// Give back a seat taken by a register whose ledger append did not happen.
fn release_seat<S: Store + ?Sized>(store: &S, courses: &mut [Course], course_id: &CourseId) {
    if let Ok(course) = find_course(courses, course_id) {
        course.decrement_enrollment();
    }
    if let Err(e) = store.save_courses(courses) {
        warn!(%course_id, error = %e, "Failed to release seat; enrollment has drifted");
    }
}

/// Drop a course for a student.
///
/// Removes the pair from the ledger and releases one seat per removed row.
/// Returns the course with its updated enrollment, or `None` if the ledger
/// rows were removed but the course is no longer in the course file.
///
/// # Errors
///
/// Returns an error if:
/// - The student is not registered for the course
/// - The course file holds a corrupt record
/// - A data file cannot be read or written
pub fn drop_course<S: Store + ?Sized>(
    store: &S,
    student_id: &StudentId,
    course_id: &CourseId,
) -> Result<Option<Course>> {
    let mut courses = store.load_courses_strict()?;

    let removed = store.remove_registration(student_id, course_id)?;
    if removed == 0 {
        return Err(ControlError::NotRegistered {
            student_id: student_id.clone(),
            course_id: course_id.clone(),
        });
    }
    if removed > 1 {
        warn!(%student_id, %course_id, removed, "Removed duplicate ledger rows");
    }

    let Some(course) = courses.iter_mut().find(|c| c.course_id == *course_id) else {
        warn!(%student_id, %course_id, "Dropped registration for a course that is no longer listed");
        return Ok(None);
    };
    for _ in 0..removed {
        course.decrement_enrollment();
    }
    let updated = course.clone();
    store.save_courses(&courses)?;

    info!(
        %student_id,
        %course_id,
        enrollment = updated.current_enrollment,
        "Dropped course"
    );
    Ok(Some(updated))
}

/// Drop several courses, one after another.
///
/// A failure does not undo the drops before it or stop the ones after it.
pub fn drop_many<S: Store + ?Sized>(
    store: &S,
    student_id: &StudentId,
    course_ids: &[CourseId],
) -> Vec<DropOutcome> {
    let outcomes: Vec<DropOutcome> = course_ids
        .iter()
        .map(|course_id| DropOutcome {
            course_id: course_id.clone(),
            result: drop_course(store, student_id, course_id),
        })
        .collect();

    let dropped = outcomes.iter().filter(|o| o.is_ok()).count();
    info!(%student_id, requested = course_ids.len(), dropped, "Bulk drop finished");
    outcomes
}

/// Compare every course's stored enrollment with its ledger row count.
///
/// Returns one entry per course that disagrees, in course file order.
///
/// # Errors
///
/// Returns an error if a data file cannot be read.
pub fn enrollment_drift<S: Store + ?Sized>(store: &S) -> Result<Vec<EnrollmentDrift>> {
    let mut counts: HashMap<CourseId, u32> = HashMap::new();
    for registration in store.load_registrations()? {
        *counts.entry(registration.course_id).or_default() += 1;
    }

    Ok(store
        .load_courses()?
        .into_iter()
        .filter_map(|course| {
            let ledger = counts.get(&course.course_id).copied().unwrap_or(0);
            (ledger != course.current_enrollment).then(|| EnrollmentDrift {
                course_id: course.course_id,
                recorded: course.current_enrollment,
                ledger,
            })
        })
        .collect())
}
