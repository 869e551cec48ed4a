//! Line codec for the `|`-delimited data files.
//!
//! Each record occupies exactly one line. Fields are written in a fixed order
//! and are not escaped, so values containing the delimiter or a line break are
//! refused on encode instead of silently corrupting the file.
//!
//! Decoding follows the tolerant rules the files have always been read with:
//! trailing empty fields are ignored, records with fewer than
//! [`MIN_RECORD_FIELDS`] fields are skipped, and empty optional fields come
//! back as `None`.

use registrar_core::{CourseId, StudentId};

use crate::error::CodecError;
use crate::types::{Course, Registration, Student};

/// Field separator used by every data file.
pub const DELIMITER: char = '|';

/// Student and course lines with fewer fields than this are skipped.
pub const MIN_RECORD_FIELDS: usize = 6;

/// Split a line into fields, dropping trailing empty ones.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(DELIMITER).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn optional(fields: &[&str], index: usize) -> Option<String> {
    fields
        .get(index)
        .filter(|f| !f.is_empty())
        .map(|f| (*f).to_string())
}

fn text(fields: &[&str], index: usize) -> String {
    fields.get(index).map_or_else(String::new, |f| (*f).to_string())
}

fn integer(fields: &[&str], index: usize, field: &'static str) -> Result<u32, CodecError> {
    let raw = fields.get(index).copied().unwrap_or_default();
    raw.parse().map_err(|_| CodecError::InvalidInteger {
        field,
        value: raw.to_string(),
    })
}

fn check(field: &'static str, value: &str) -> Result<(), CodecError> {
    if value.contains([DELIMITER, '\r', '\n']) {
        return Err(CodecError::ForbiddenChar { field });
    }
    Ok(())
}

fn join(fields: &[(&'static str, &str)]) -> Result<String, CodecError> {
    let mut line = String::new();
    for (i, (name, value)) in fields.iter().enumerate() {
        check(name, value)?;
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(value);
    }
    Ok(line)
}

/// Encode a student as
/// `studentId|firstName|lastName|email|username|password|phoneNumber|address`.
///
/// `registered_courses` is never written.
///
/// # Errors
///
/// Returns `CodecError::ForbiddenChar` if any field contains `|`, CR or LF.
pub fn encode_student(student: &Student) -> Result<String, CodecError> {
    join(&[
        ("studentId", student.student_id.as_str()),
        ("firstName", &student.first_name),
        ("lastName", &student.last_name),
        ("email", &student.email),
        ("username", &student.username),
        ("password", &student.password),
        ("phoneNumber", student.phone_number.as_deref().unwrap_or("")),
        ("address", student.address.as_deref().unwrap_or("")),
    ])
}

/// Decode one line of `students.txt`.
///
/// Returns `Ok(None)` for lines with fewer than six fields.
///
/// # Errors
///
/// Returns `CodecError::InvalidId` if the key column is not a valid identifier.
pub fn decode_student(line: &str) -> Result<Option<Student>, CodecError> {
    let fields = split_fields(line);
    if fields.len() < MIN_RECORD_FIELDS {
        return Ok(None);
    }

    Ok(Some(Student {
        student_id: StudentId::new(fields[0])?,
        first_name: text(&fields, 1),
        last_name: text(&fields, 2),
        email: text(&fields, 3),
        username: text(&fields, 4),
        password: text(&fields, 5),
        phone_number: optional(&fields, 6),
        address: optional(&fields, 7),
        registered_courses: Vec::new(),
    }))
}

/// Encode a course as
/// `courseId|courseName|instructor|schedule|credits|maxCapacity|currentEnrollment|description|prerequisites`.
///
/// # Errors
///
/// Returns `CodecError::ForbiddenChar` if any text field contains `|`, CR or LF.
pub fn encode_course(course: &Course) -> Result<String, CodecError> {
    let credits = course.credits.to_string();
    let max_capacity = course.max_capacity.to_string();
    let current_enrollment = course.current_enrollment.to_string();

    join(&[
        ("courseId", course.course_id.as_str()),
        ("courseName", &course.course_name),
        ("instructor", &course.instructor),
        ("schedule", &course.schedule),
        ("credits", &credits),
        ("maxCapacity", &max_capacity),
        ("currentEnrollment", &current_enrollment),
        ("description", course.description.as_deref().unwrap_or("")),
        ("prerequisites", course.prerequisites.as_deref().unwrap_or("")),
    ])
}

/// Decode one line of `courses.txt`.
///
/// Returns `Ok(None)` for lines with fewer than six fields. A missing
/// enrollment column reads as zero.
///
/// # Errors
///
/// Returns `CodecError::InvalidInteger` if `credits`, `maxCapacity` or
/// `currentEnrollment` is not an unsigned integer, and
/// `CodecError::InvalidId` if the key column is not a valid identifier.
pub fn decode_course(line: &str) -> Result<Option<Course>, CodecError> {
    let fields = split_fields(line);
    if fields.len() < MIN_RECORD_FIELDS {
        return Ok(None);
    }

    let credits = integer(&fields, 4, "credits")?;
    let max_capacity = integer(&fields, 5, "maxCapacity")?;
    let current_enrollment = if fields.len() > 6 {
        integer(&fields, 6, "currentEnrollment")?
    } else {
        0
    };

    Ok(Some(Course {
        course_id: CourseId::new(fields[0])?,
        course_name: text(&fields, 1),
        instructor: text(&fields, 2),
        schedule: text(&fields, 3),
        credits,
        max_capacity,
        current_enrollment,
        description: optional(&fields, 7),
        prerequisites: optional(&fields, 8),
    }))
}

/// Encode a ledger row as `studentId|courseId`.
#[must_use]
pub fn encode_registration(registration: &Registration) -> String {
    format!(
        "{}{DELIMITER}{}",
        registration.student_id, registration.course_id
    )
}

/// Decode one line of `registrations.txt`.
///
/// Only lines with exactly two non-empty fields are rows; everything else
/// yields `None`.
#[must_use]
pub fn decode_registration(line: &str) -> Option<Registration> {
    match split_fields(line).as_slice() {
        [student, course] => Some(Registration::new(
            StudentId::new(*student).ok()?,
            CourseId::new(*course).ok()?,
        )),
        _ => None,
    }
}
