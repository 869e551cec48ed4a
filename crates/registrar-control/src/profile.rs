//! Profile editing.
//!
//! Validation collects every problem before reporting, so a caller can show
//! the whole list at once. Values destined for the student file may not carry
//! the field delimiter or a line break.

use registrar_store::{Store, Student};
use tracing::info;

use crate::error::{ControlError, Result};
use crate::session::Session;
use crate::types::{ControlConfig, ProfileUpdate};

fn is_valid_email(email: &str) -> bool {
    email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.is_empty()
            && local
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '_' | '.' | '-'))
    })
}

fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '(' | ')' | '+'))
}

fn has_forbidden_char(value: &str) -> bool {
    value.contains(['|', '\r', '\n'])
}

/// Check a profile update, returning every problem found.
///
/// # Errors
///
/// Returns `ControlError::Validation` listing each rejected field.
pub fn validate(update: &ProfileUpdate, config: &ControlConfig) -> Result<()> {
    let mut errors = Vec::new();

    let first_name = update.first_name.trim();
    let last_name = update.last_name.trim();
    let email = update.email.trim();

    if first_name.is_empty() {
        errors.push("First name is required.".to_string());
    }
    if last_name.is_empty() {
        errors.push("Last name is required.".to_string());
    }

    if email.is_empty() {
        errors.push("Email is required.".to_string());
    } else if !is_valid_email(email) {
        errors.push("Please enter a valid email address.".to_string());
    }

    if update.password.is_empty() {
        errors.push("Password is required.".to_string());
    } else if update.password.chars().count() < config.min_password_length {
        errors.push(format!(
            "Password must be at least {} characters long.",
            config.min_password_length
        ));
    }

    if !is_valid_phone(update.phone_number.trim()) {
        errors.push("Phone number may only contain digits, spaces and + - ( ).".to_string());
    }

    for (name, value) in [
        ("First name", &update.first_name),
        ("Last name", &update.last_name),
        ("Email", &update.email),
        ("Phone number", &update.phone_number),
        ("Address", &update.address),
        ("Password", &update.password),
    ] {
        if has_forbidden_char(value) {
            errors.push(format!("{name} must not contain '|' or line breaks."));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ControlError::Validation(errors))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Validate and persist a profile update for the session's student.
///
/// Every field except the password is trimmed. The student id and username
/// are never changed. On success the session's copy of the student is
/// replaced with the saved record.
///
/// # Errors
///
/// Returns an error if:
/// - The update fails validation
/// - The student no longer exists in the student file
/// - The student file cannot be read or written
pub fn save_profile<S: Store + ?Sized>(
    store: &S,
    config: &ControlConfig,
    session: &mut Session,
    update: &ProfileUpdate,
) -> Result<Student> {
    validate(update, config)?;

    let mut students = store.load_students()?;
    let student = students
        .iter_mut()
        .find(|s| s.student_id == *session.student_id())
        .ok_or_else(|| ControlError::StudentNotFound(session.student_id().clone()))?;

    student.first_name = update.first_name.trim().to_string();
    student.last_name = update.last_name.trim().to_string();
    student.email = update.email.trim().to_string();
    student.phone_number = non_empty(&update.phone_number);
    student.address = non_empty(&update.address);
    student.password.clone_from(&update.password);

    let mut saved = student.clone();
    store.save_students(&students)?;

    saved.registered_courses = session.student.registered_courses.clone();
    session.student = saved.clone();

    info!(student_id = %saved.student_id, "Profile updated");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session;
    use registrar_store::FileStore;
    use tempfile::TempDir;

    fn valid_update() -> ProfileUpdate {
        ProfileUpdate {
            first_name: "  Johnny ".to_string(),
            last_name: "Doe".to_string(),
            email: "johnny@student.edu".to_string(),
            phone_number: "(555) 123-4567".to_string(),
            address: " 9 Elm Rd ".to_string(),
            password: "newsecret".to_string(),
        }
    }

    fn errors_of(update: &ProfileUpdate) -> Vec<String> {
        match validate(update, &ControlConfig::default()) {
            Err(ControlError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn valid_update_passes() {
        assert!(validate(&valid_update(), &ControlConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let update = ProfileUpdate {
            first_name: " ".to_string(),
            last_name: String::new(),
            email: String::new(),
            password: "abc".to_string(),
            ..ProfileUpdate::default()
        };
        let errors = errors_of(&update);
        assert_eq!(
            errors,
            [
                "First name is required.",
                "Last name is required.",
                "Email is required.",
                "Password must be at least 6 characters long.",
            ]
        );
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a.b+c@x"));
        assert!(is_valid_email("john_doe-1@student.edu"));
        assert!(!is_valid_email("@student.edu"));
        assert!(!is_valid_email("john@"));
        assert!(!is_valid_email("john doe@student.edu"));
        assert!(!is_valid_email("johndoe"));
    }

    #[test]
    fn phone_characters() {
        assert!(is_valid_phone(""));
        assert!(is_valid_phone("+1 (555) 000-1111"));
        assert!(!is_valid_phone("555-CALL"));
    }

    #[test]
    fn delimiter_rejected_in_any_field() {
        let mut update = valid_update();
        update.address = "Flat 2|B".to_string();
        assert_eq!(
            errors_of(&update),
            ["Address must not contain '|' or line breaks."]
        );

        let mut update = valid_update();
        update.password = "pass|word".to_string();
        assert_eq!(
            errors_of(&update),
            ["Password must not contain '|' or line breaks."]
        );
    }

    #[test]
    fn min_password_length_is_configurable() {
        let config = ControlConfig {
            min_password_length: 12,
        };
        let result = validate(&valid_update(), &config);
        assert!(matches!(result, Err(ControlError::Validation(_))));
    }

    #[test]
    fn save_persists_and_updates_session() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let mut session = session::login(&store, "johndoe", "password123").unwrap();

        let saved = save_profile(
            &store,
            &ControlConfig::default(),
            &mut session,
            &valid_update(),
        )
        .unwrap();

        assert_eq!(saved.first_name, "Johnny");
        assert_eq!(saved.address.as_deref(), Some("9 Elm Rd"));
        assert_eq!(saved.username, "johndoe");
        assert_eq!(session.student().first_name, "Johnny");

        let students = store.load_students().unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].username, "admin");
        assert_eq!(students[1].email, "johnny@student.edu");

        assert!(session::login(&store, "johndoe", "password123").is_err());
        assert!(session::login(&store, "johndoe", "newsecret").is_ok());
    }

    #[test]
    fn empty_optionals_clear_fields() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let mut session = session::login(&store, "johndoe", "password123").unwrap();

        let mut update = valid_update();
        update.phone_number = "  ".to_string();
        update.address = String::new();
        let saved =
            save_profile(&store, &ControlConfig::default(), &mut session, &update).unwrap();

        assert_eq!(saved.phone_number, None);
        assert_eq!(saved.address, None);
    }

    #[test]
    fn invalid_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let mut session = session::login(&store, "johndoe", "password123").unwrap();
        let before = store.load_students().unwrap();

        let mut update = valid_update();
        update.email = "not-an-email".to_string();
        assert!(save_profile(&store, &ControlConfig::default(), &mut session, &update).is_err());
        assert_eq!(store.load_students().unwrap(), before);
        assert_eq!(session.student().first_name, "John");
    }
}
