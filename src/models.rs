use crate::err::{Error, Maybe};

/// A validated submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub regno: String,
    pub course: String,
    pub department: String,
    pub provider: String,
    pub email: String,
    pub certificate_links: Vec<String>,
}

/// A `student_certificates` row as stored; links are still serialized.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SubmissionRow {
    pub name: String,
    pub regno: String,
    pub course: String,
    pub department: String,
    pub provider: String,
    pub email: String,
    pub certificate_links: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub regno: String,
    pub course: String,
    pub department: String,
    pub provider: String,
    pub email: String,
    pub certificate_links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Inserted,
    NotRegistered,
}

pub fn encode_links(links: &[String]) -> String {
    // a Vec<String> always serializes
    serde_json::to_string(links).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_links(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}

impl NewSubmission {
    pub fn into_row(self) -> SubmissionRow {
        SubmissionRow {
            certificate_links: encode_links(&self.certificate_links),
            name: self.name,
            regno: self.regno,
            course: self.course,
            department: self.department,
            provider: self.provider,
            email: self.email,
        }
    }
}

impl SubmissionRow {
    /// Decodes the stored links, failing on a malformed blob.
    pub fn decode(self) -> Maybe<Submission> {
        match decode_links(&self.certificate_links) {
            Ok(links) => Ok(self.with_links(links)),
            Err(err) => Err(Error::Deserialization {
                regno: self.regno,
                message: err.to_string(),
            }),
        }
    }

    /// Decodes the stored links, substituting an empty list for a malformed blob.
    pub fn decode_or_empty(self) -> Submission {
        match decode_links(&self.certificate_links) {
            Ok(links) => self.with_links(links),
            Err(err) => {
                log::warn!(
                    "Malformed certificate links for {} ({}), showing none",
                    self.regno,
                    err
                );
                self.with_links(Vec::new())
            }
        }
    }

    fn with_links(self, certificate_links: Vec<String>) -> Submission {
        Submission {
            name: self.name,
            regno: self.regno,
            course: self.course,
            department: self.department,
            provider: self.provider,
            email: self.email,
            certificate_links,
        }
    }
}
