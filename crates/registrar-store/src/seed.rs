//! Default dataset written on first run.
//!
//! Seeding is keyed on file existence only: a collection is written when its
//! file is absent and left alone otherwise, even if the existing file is empty
//! or unreadable.

use registrar_core::{CourseId, IdError, StudentId};
use tracing::info;

use crate::error::{CodecError, Result};
use crate::schema::DataFile;
use crate::types::{Course, Student};
use crate::Store;

/// What a call to [`bootstrap`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// The course file was created.
    pub courses: bool,
    /// The student file was created.
    pub students: bool,
}

impl SeedReport {
    /// Whether anything was written.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.courses || self.students
    }
}

/// `(id, name, instructor, schedule, credits, capacity, description, prerequisites)`
type CourseRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u32,
    u32,
    &'static str,
    &'static str,
);

const COURSES: [CourseRow; 5] = [
    (
        "CS101",
        "Introduction to Programming",
        "Dr. Smith",
        "MWF 10:00-11:00",
        3,
        30,
        "Basic programming concepts using Java",
        "None",
    ),
    (
        "CS201",
        "Data Structures",
        "Dr. Johnson",
        "TTh 2:00-3:30",
        3,
        25,
        "Advanced data structures and algorithms",
        "CS101",
    ),
    (
        "MATH101",
        "Calculus I",
        "Prof. Wilson",
        "MWF 9:00-10:00",
        4,
        40,
        "Differential and integral calculus",
        "High School Math",
    ),
    (
        "ENG101",
        "English Composition",
        "Dr. Brown",
        "TTh 11:00-12:30",
        3,
        35,
        "Academic writing and composition",
        "None",
    ),
    (
        "PHYS101",
        "General Physics",
        "Dr. Davis",
        "MWF 1:00-2:00",
        4,
        30,
        "Mechanics and thermodynamics",
        "MATH101",
    ),
];

/// `(id, first, last, email, username, password, phone, address)`
type StudentRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const STUDENTS: [StudentRow; 2] = [
    (
        "ADMIN001",
        "Admin",
        "User",
        "admin@university.edu",
        "admin",
        "admin123",
        "555-0000",
        "Admin Office",
    ),
    (
        "STU001",
        "John",
        "Doe",
        "john.doe@student.edu",
        "johndoe",
        "password123",
        "555-1234",
        "123 Student St",
    ),
];

/// The five default courses, all with zero enrollment.
///
/// # Errors
///
/// Returns an error if a built-in identifier is rejected.
pub fn default_courses() -> std::result::Result<Vec<Course>, IdError> {
    COURSES
        .iter()
        .map(
            |&(id, name, instructor, schedule, credits, capacity, description, prereqs)|
             -> std::result::Result<Course, IdError> {
                let mut course = Course::new(
                    CourseId::new(id)?,
                    name,
                    instructor,
                    schedule,
                    credits,
                    capacity,
                );
                course.description = Some(description.to_string());
                course.prerequisites = Some(prereqs.to_string());
                Ok(course)
            },
        )
        .collect()
}

/// The admin account and one sample student.
///
/// # Errors
///
/// Returns an error if a built-in identifier is rejected.
pub fn default_students() -> std::result::Result<Vec<Student>, IdError> {
    STUDENTS
        .iter()
        .map(
            |&(id, first, last, email, username, password, phone, address)|
             -> std::result::Result<Student, IdError> {
                let mut student =
                    Student::new(StudentId::new(id)?, first, last, email, username, password);
                student.phone_number = Some(phone.to_string());
                student.address = Some(address.to_string());
                Ok(student)
            },
        )
        .collect()
}

/// Write the default dataset for every collection whose file is missing.
///
/// # Errors
///
/// Returns an error if a seed file cannot be written.
pub fn bootstrap<S: Store + ?Sized>(store: &S) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if !store.exists(DataFile::Courses) {
        let courses = default_courses().map_err(CodecError::from)?;
        store.save_courses(&courses)?;
        info!(count = courses.len(), "Initialized default courses");
        report.courses = true;
    }

    if !store.exists(DataFile::Students) {
        let students = default_students().map_err(CodecError::from)?;
        store.save_students(&students)?;
        info!(count = students.len(), "Initialized default students");
        report.students = true;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn seeds_missing_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let report = bootstrap(&store).unwrap();
        assert_eq!(
            report,
            SeedReport {
                courses: true,
                students: true
            }
        );

        let ids: Vec<String> = store
            .load_courses()
            .unwrap()
            .into_iter()
            .map(|c| c.course_id.into())
            .collect();
        assert_eq!(ids, ["CS101", "CS201", "MATH101", "ENG101", "PHYS101"]);

        let admin = store.authenticate("admin", "admin123").unwrap().unwrap();
        assert_eq!(admin.student_id.as_str(), "ADMIN001");
        assert!(store.authenticate("johndoe", "password123").unwrap().is_some());
    }

    #[test]
    fn seeded_course_file_matches_format() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        bootstrap(&store).unwrap();

        let content = fs::read_to_string(dir.path().join("courses.txt")).unwrap();
        let first = content.lines().next().unwrap();
        assert_eq!(
            first,
            "CS101|Introduction to Programming|Dr. Smith|MWF 10:00-11:00|3|30|0|Basic programming concepts using Java|None"
        );

        let students = fs::read_to_string(dir.path().join("students.txt")).unwrap();
        assert!(students.contains(
            "STU001|John|Doe|john.doe@student.edu|johndoe|password123|555-1234|123 Student St\n"
        ));
    }

    #[test]
    fn second_bootstrap_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        bootstrap(&store).unwrap();

        let courses_before = fs::read_to_string(dir.path().join("courses.txt")).unwrap();
        let students_before = fs::read_to_string(dir.path().join("students.txt")).unwrap();

        let report = bootstrap(&store).unwrap();
        assert!(!report.any());
        assert_eq!(
            fs::read_to_string(dir.path().join("courses.txt")).unwrap(),
            courses_before
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("students.txt")).unwrap(),
            students_before
        );
    }

    #[test]
    fn existing_empty_file_is_not_reseeded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("courses.txt"), "").unwrap();
        let store = FileStore::new(dir.path());

        let report = bootstrap(&store).unwrap();
        assert!(!report.courses);
        assert!(report.students);
        assert!(store.load_courses().unwrap().is_empty());
    }
}
