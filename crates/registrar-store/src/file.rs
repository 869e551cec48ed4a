//! Flat-file storage implementation.
//!
//! This module provides the `FileStore` implementation of the `Store` trait.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use registrar_core::{CourseId, StudentId};
use tracing::{debug, error, warn};

use crate::codec;
use crate::error::{CodecError, Result, StoreError};
use crate::schema::{DataFile, StoreConfig};
use crate::seed;
use crate::types::{Course, Registration, Student};
use crate::Store;

/// Store backed by `|`-delimited text files in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store over `data_dir` without touching the filesystem.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Open or create a data directory and seed any missing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or seeding fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(&StoreConfig::at(path.as_ref()))
    }

    /// Open a store as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or seeding fails.
    pub fn open_with(config: &StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::io(&config.data_dir, e))?;

        let store = Self::new(&config.data_dir);
        if config.seed_defaults {
            let report = seed::bootstrap(&store)?;
            if report.any() {
                debug!(
                    data_dir = %config.data_dir.display(),
                    courses = report.courses,
                    students = report.students,
                    "Seeded default data"
                );
            }
        }
        Ok(store)
    }

    /// The directory holding the data files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a collection's file.
    #[must_use]
    pub fn path(&self, file: DataFile) -> PathBuf {
        file.path_in(&self.data_dir)
    }

    /// Read a whole file. A missing file is `None`.
    fn read(&self, file: DataFile) -> Result<Option<String>> {
        let path = self.path(file);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Replace a file with the given lines.
    ///
    /// The content goes to a sibling temp file first and is renamed over the
    /// target, so readers never see a half-written file.
    fn write_lines(&self, file: DataFile, lines: &[String]) -> Result<()> {
        let path = self.path(file);
        let tmp = path.with_extension("txt.tmp");

        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        fs::write(&tmp, content)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|e| {
                error!(path = %path.display(), error = %e, "Failed to write data file");
                StoreError::io(&path, e)
            })?;

        debug!(path = %path.display(), records = lines.len(), "Wrote data file");
        Ok(())
    }
}

impl Store for FileStore {
    // =========================================================================
    // Student Operations
    // =========================================================================

    fn load_students(&self) -> Result<Vec<Student>> {
        let Some(content) = self.read(DataFile::Students)? else {
            return Ok(Vec::new());
        };

        let mut students = Vec::new();
        for (index, line) in content.lines().enumerate() {
            match codec::decode_student(line) {
                Ok(Some(student)) => students.push(student),
                Ok(None) => {}
                Err(e) => warn!(line = index + 1, error = %e, "Skipping unreadable student record"),
            }
        }

        debug!(count = students.len(), "Loaded students");
        Ok(students)
    }

    fn save_students(&self, students: &[Student]) -> Result<()> {
        let lines = students
            .iter()
            .map(codec::encode_student)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.write_lines(DataFile::Students, &lines)
    }

    // =========================================================================
    // Course Operations
    // =========================================================================

    fn load_courses(&self) -> Result<Vec<Course>> {
        let Some(content) = self.read(DataFile::Courses)? else {
            return Ok(Vec::new());
        };

        let mut courses = Vec::new();
        for (index, line) in content.lines().enumerate() {
            match codec::decode_course(line) {
                Ok(Some(course)) => courses.push(course),
                Ok(None) => {}
                Err(e @ CodecError::InvalidInteger { .. }) => {
                    warn!(
                        line = index + 1,
                        error = %e,
                        loaded = courses.len(),
                        "Stopping course load at malformed record"
                    );
                    break;
                }
                Err(e) => warn!(line = index + 1, error = %e, "Skipping unreadable course record"),
            }
        }

        debug!(count = courses.len(), "Loaded courses");
        Ok(courses)
    }

    fn load_courses_strict(&self) -> Result<Vec<Course>> {
        let Some(content) = self.read(DataFile::Courses)? else {
            return Ok(Vec::new());
        };

        let mut courses = Vec::new();
        for (index, line) in content.lines().enumerate() {
            match codec::decode_course(line) {
                Ok(Some(course)) => courses.push(course),
                Ok(None) => {}
                Err(source) => {
                    let path = self.path(DataFile::Courses);
                    error!(
                        path = %path.display(),
                        line = index + 1,
                        error = %source,
                        "Refusing to use a corrupt course file for an update"
                    );
                    return Err(StoreError::Corrupt {
                        path,
                        line: index + 1,
                        source,
                    });
                }
            }
        }

        debug!(count = courses.len(), "Loaded courses for update");
        Ok(courses)
    }

    fn save_courses(&self, courses: &[Course]) -> Result<()> {
        let lines = courses
            .iter()
            .map(codec::encode_course)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.write_lines(DataFile::Courses, &lines)
    }

    // =========================================================================
    // Registration Ledger
    // =========================================================================

    fn load_registrations(&self) -> Result<Vec<Registration>> {
        Ok(self
            .read(DataFile::Registrations)?
            .map(|content| {
                content
                    .lines()
                    .filter_map(codec::decode_registration)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn add_registration(&self, student_id: &StudentId, course_id: &CourseId) -> Result<bool> {
        let content = self.read(DataFile::Registrations)?.unwrap_or_default();
        let exists = content
            .lines()
            .filter_map(codec::decode_registration)
            .any(|r| r.matches(student_id, course_id));
        if exists {
            debug!(%student_id, %course_id, "Registration already in ledger");
            return Ok(false);
        }

        let mut line = String::new();
        if !content.is_empty() && !content.ends_with('\n') {
            line.push('\n');
        }
        line.push_str(&codec::encode_registration(&Registration::new(
            student_id.clone(),
            course_id.clone(),
        )));
        line.push('\n');

        let path = self.path(DataFile::Registrations);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut f| f.write_all(line.as_bytes()))
            .map_err(|e| {
                error!(path = %path.display(), error = %e, "Failed to append registration");
                StoreError::io(&path, e)
            })?;

        debug!(%student_id, %course_id, "Appended registration");
        Ok(true)
    }

    fn remove_registration(&self, student_id: &StudentId, course_id: &CourseId) -> Result<usize> {
        let rows = self.load_registrations()?;
        let before = rows.len();
        let kept: Vec<String> = rows
            .iter()
            .filter(|r| !r.matches(student_id, course_id))
            .map(codec::encode_registration)
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            self.write_lines(DataFile::Registrations, &kept)?;
            debug!(%student_id, %course_id, removed, "Removed registration");
        }
        Ok(removed)
    }

    // =========================================================================
    // Housekeeping
    // =========================================================================

    fn exists(&self, file: DataFile) -> bool {
        self.path(file).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (store, dir)
    }

    fn sid(s: &str) -> StudentId {
        StudentId::new(s).unwrap()
    }

    fn cid(s: &str) -> CourseId {
        CourseId::new(s).unwrap()
    }

    fn create_test_student(id: &str, username: &str) -> Student {
        let mut student = Student::new(
            sid(id),
            "Test",
            "Student",
            format!("{username}@student.edu"),
            username,
            "secret123",
        );
        student.phone_number = Some("555-0101".to_string());
        student
    }

    fn create_test_course(id: &str, max: u32) -> Course {
        let mut course = Course::new(cid(id), "Course", "Dr. Test", "MWF 9:00", 3, max);
        course.description = Some("Description".to_string());
        course
    }

    #[test]
    fn missing_files_load_empty() {
        let (store, _dir) = create_test_store();
        assert!(store.load_students().unwrap().is_empty());
        assert!(store.load_courses().unwrap().is_empty());
        assert!(store.load_registrations().unwrap().is_empty());
        assert!(store.registrations_for(&sid("STU001")).unwrap().is_empty());
        assert!(!store.exists(DataFile::Students));
    }

    #[test]
    fn students_save_and_load_in_order() {
        let (store, _dir) = create_test_store();
        let students = vec![
            create_test_student("STU002", "bob"),
            create_test_student("STU001", "alice"),
        ];

        store.save_students(&students).unwrap();
        assert!(store.exists(DataFile::Students));

        let loaded = store.load_students().unwrap();
        assert_eq!(loaded, students);
    }

    #[test]
    fn save_overwrites_whole_file() {
        let (store, _dir) = create_test_store();
        store
            .save_students(&[
                create_test_student("STU001", "alice"),
                create_test_student("STU002", "bob"),
            ])
            .unwrap();
        store
            .save_students(&[create_test_student("STU003", "carol")])
            .unwrap();

        let loaded = store.load_students().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].username, "carol");
    }

    #[test]
    fn corrupt_student_lines_skipped() {
        let (store, dir) = create_test_store();
        fs::write(
            dir.path().join("students.txt"),
            "STU001|A|B|a@b.c|alice|pw1234|555|Home\n\
             garbage\n\
             |No|Id|x@y.z|noid|pw1234\n\
             STU002|C|D|c@d.e|carol|pw5678\n",
        )
        .unwrap();

        let loaded = store.load_students().unwrap();
        let names: Vec<_> = loaded.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, ["alice", "carol"]);
    }

    #[test]
    fn save_refuses_delimiter_in_field() {
        let (store, _dir) = create_test_store();
        let mut student = create_test_student("STU001", "alice");
        student.address = Some("A|B".to_string());

        let result = store.save_students(&[student]);
        assert!(matches!(
            result,
            Err(StoreError::Codec(CodecError::ForbiddenChar { .. }))
        ));
        assert!(!store.exists(DataFile::Students));
    }

    #[test]
    fn courses_roundtrip_enrollment() {
        let (store, _dir) = create_test_store();
        let mut course = create_test_course("CS101", 30);
        course.current_enrollment = 12;

        store.save_courses(&[course.clone()]).unwrap();
        let loaded = store.load_courses().unwrap();
        assert_eq!(loaded, vec![course]);
    }

    #[test]
    fn course_load_stops_at_bad_number() {
        let (store, dir) = create_test_store();
        fs::write(
            dir.path().join("courses.txt"),
            "CS101|Intro|Dr. Smith|MWF|3|30|0||\n\
             CS201|Data|Dr. Johnson|TTh|x|25|0||\n\
             MATH101|Calc|Prof. Wilson|MWF|4|40|0||\n",
        )
        .unwrap();

        let loaded = store.load_courses().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].course_id, cid("CS101"));
    }

    #[test]
    fn strict_course_load_rejects_bad_record() {
        let (store, dir) = create_test_store();
        fs::write(
            dir.path().join("courses.txt"),
            "CS101|Intro|Dr. Smith|MWF|3|30|0||\n\
             CS201|Data|Dr. Johnson|TTh|x|25|0||\n\
             MATH101|Calc|Prof. Wilson|MWF|4|40|7||\n",
        )
        .unwrap();

        let result = store.load_courses_strict();
        assert!(matches!(
            result,
            Err(StoreError::Corrupt {
                line: 2,
                source: CodecError::InvalidInteger { field: "credits", .. },
                ..
            })
        ));
    }

    #[test]
    fn strict_course_load_skips_short_lines() {
        let (store, dir) = create_test_store();
        fs::write(
            dir.path().join("courses.txt"),
            "CS101|Intro|Dr. Smith|MWF|3|30|0||\n\n\
             MATH101|Calc|Prof. Wilson|MWF|4|40|7||\n",
        )
        .unwrap();

        let loaded = store.load_courses_strict().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].current_enrollment, 7);
    }

    #[test]
    fn ledger_add_and_list() {
        let (store, _dir) = create_test_store();
        assert!(store.add_registration(&sid("STU001"), &cid("CS101")).unwrap());
        assert!(store.add_registration(&sid("STU001"), &cid("MATH101")).unwrap());
        assert!(store.add_registration(&sid("STU002"), &cid("CS101")).unwrap());

        assert_eq!(
            store.registrations_for(&sid("STU001")).unwrap(),
            vec![cid("CS101"), cid("MATH101")]
        );
        assert_eq!(
            store.registrations_for(&sid("STU002")).unwrap(),
            vec![cid("CS101")]
        );
    }

    #[test]
    fn ledger_add_rejects_duplicate_pair() {
        let (store, dir) = create_test_store();
        assert!(store.add_registration(&sid("STU001"), &cid("CS101")).unwrap());
        assert!(!store.add_registration(&sid("STU001"), &cid("CS101")).unwrap());

        let content = fs::read_to_string(dir.path().join("registrations.txt")).unwrap();
        assert_eq!(content, "STU001|CS101\n");
    }

    #[test]
    fn ledger_append_after_unterminated_line() {
        let (store, dir) = create_test_store();
        fs::write(dir.path().join("registrations.txt"), "STU001|CS101").unwrap();

        store.add_registration(&sid("STU002"), &cid("CS201")).unwrap();
        let content = fs::read_to_string(dir.path().join("registrations.txt")).unwrap();
        assert_eq!(content, "STU001|CS101\nSTU002|CS201\n");
    }

    #[test]
    fn ledger_remove_deletes_every_match() {
        let (store, dir) = create_test_store();
        fs::write(
            dir.path().join("registrations.txt"),
            "STU001|CS101\nSTU002|CS101\nSTU001|CS101\nSTU001|MATH101\n",
        )
        .unwrap();

        let removed = store
            .remove_registration(&sid("STU001"), &cid("CS101"))
            .unwrap();
        assert_eq!(removed, 2);

        let content = fs::read_to_string(dir.path().join("registrations.txt")).unwrap();
        assert_eq!(content, "STU002|CS101\nSTU001|MATH101\n");
    }

    #[test]
    fn ledger_remove_missing_pair_is_noop() {
        let (store, _dir) = create_test_store();
        store.add_registration(&sid("STU001"), &cid("CS101")).unwrap();

        let removed = store
            .remove_registration(&sid("STU001"), &cid("CS201"))
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.load_registrations().unwrap().len(), 1);
    }

    #[test]
    fn authenticate_fills_registered_courses() {
        let (store, _dir) = create_test_store();
        store
            .save_students(&[
                create_test_student("STU001", "alice"),
                create_test_student("STU002", "bob"),
            ])
            .unwrap();
        store.add_registration(&sid("STU002"), &cid("CS101")).unwrap();
        store.add_registration(&sid("STU001"), &cid("ENG101")).unwrap();

        let bob = store.authenticate("bob", "secret123").unwrap().unwrap();
        assert_eq!(bob.student_id, sid("STU002"));
        assert_eq!(bob.registered_courses, vec![cid("CS101")]);
        assert_eq!(
            bob.registered_courses,
            store.registrations_for(&bob.student_id).unwrap()
        );
    }

    #[test]
    fn authenticate_miss_is_none() {
        let (store, _dir) = create_test_store();
        store
            .save_students(&[create_test_student("STU001", "alice")])
            .unwrap();

        assert!(store.authenticate("alice", "wrong").unwrap().is_none());
        assert!(store.authenticate("nobody", "secret123").unwrap().is_none());
        assert!(store.authenticate("ALICE", "secret123").unwrap().is_none());
    }

    #[test]
    fn open_creates_directory_and_seeds() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("nested").join("data");

        let store = FileStore::open(&data_dir).unwrap();
        assert!(data_dir.is_dir());
        assert_eq!(store.load_courses().unwrap().len(), 5);
        assert_eq!(store.load_students().unwrap().len(), 2);
        assert!(!store.exists(DataFile::Registrations));
    }

    #[test]
    fn open_without_seeding() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            data_dir: dir.path().join("data"),
            seed_defaults: false,
        };

        let store = FileStore::open_with(&config).unwrap();
        assert!(store.data_dir().is_dir());
        assert!(!store.exists(DataFile::Courses));
        assert!(!store.exists(DataFile::Students));
    }
}
