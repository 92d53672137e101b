use crate::err::{Error, Maybe};
use crate::models::NewSubmission;

pub const FILL_ALL_FIELDS: &str =
    "Please fill all fields and provide at least one certificate link.";

/// A urlencoded body kept as ordered pairs, so repeated keys survive.
pub type FormPairs = Vec<(String, String)>;

fn field(pairs: &[(String, String)], key: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default()
}

fn fields(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trims every field, drops blank links, and rejects the form unless all
/// six scalars and at least one link remain.
pub fn parse_submission(pairs: &[(String, String)]) -> Maybe<NewSubmission> {
    let submission = NewSubmission {
        name: field(pairs, "name"),
        regno: field(pairs, "regno"),
        course: field(pairs, "course"),
        department: field(pairs, "department"),
        provider: field(pairs, "provider"),
        email: field(pairs, "email"),
        certificate_links: fields(pairs, "certificate_links"),
    };

    let scalars = [
        &submission.name,
        &submission.regno,
        &submission.course,
        &submission.department,
        &submission.provider,
        &submission.email,
    ];
    if scalars.iter().any(|v| v.is_empty()) || submission.certificate_links.is_empty() {
        return Err(Error::Validation {
            message: FILL_ALL_FIELDS,
        });
    }
    Ok(submission)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub regno: String,
    pub name: String,
    pub email: String,
}

pub fn parse_lookup(pairs: &[(String, String)]) -> Lookup {
    Lookup {
        regno: field(pairs, "regno").to_lowercase(),
        name: field(pairs, "name").to_lowercase(),
        email: field(pairs, "email").to_lowercase(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn parse_login(pairs: &[(String, String)]) -> Credentials {
    Credentials {
        username: field(pairs, "username"),
        password: field(pairs, "password"),
    }
}
