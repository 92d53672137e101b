#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use certdesk::db::{CertificateStore, DynStore};
use certdesk::err::{Error, Maybe};
use certdesk::models::{NewSubmission, SubmissionRow, SubmitOutcome};
use certdesk::session::signing_key;

pub const SECRET: &str = "a8s5e6g1t5y3w5q4";

#[derive(Default)]
struct Tables {
    students: Vec<(String, String)>,
    admins: Vec<(String, String)>,
    certificates: Vec<SubmissionRow>,
    offline: bool,
}

/// In-memory stand-in for the MySQL tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn with_student(self, regno: &str, email: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .students
            .push((regno.to_string(), email.to_string()));
        self
    }

    pub fn with_admin(self, username: &str, password: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .admins
            .push((username.to_string(), password.to_string()));
        self
    }

    pub fn with_row(self, row: SubmissionRow) -> Self {
        self.tables.lock().unwrap().certificates.push(row);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.tables.lock().unwrap().offline = offline;
    }

    pub fn rows(&self) -> Vec<SubmissionRow> {
        self.tables.lock().unwrap().certificates.clone()
    }

    fn check_online(tables: &Tables) -> Maybe<()> {
        if tables.offline {
            Err(Error::Connection {
                message: "connection refused".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn submit(&self, submission: NewSubmission) -> Maybe<SubmitOutcome> {
        let mut tables = self.tables.lock().unwrap();
        Self::check_online(&tables)?;
        let registered = tables
            .students
            .iter()
            .any(|(regno, email)| *regno == submission.regno && *email == submission.email);
        if !registered {
            return Ok(SubmitOutcome::NotRegistered);
        }
        tables.certificates.push(submission.into_row());
        Ok(SubmitOutcome::Inserted)
    }

    async fn find_submissions(
        &self,
        name: &str,
        regno: &str,
        email: &str,
    ) -> Maybe<Vec<SubmissionRow>> {
        let tables = self.tables.lock().unwrap();
        Self::check_online(&tables)?;
        Ok(tables
            .certificates
            .iter()
            .filter(|row| {
                row.name.to_lowercase() == name
                    && row.regno.to_lowercase() == regno
                    && row.email.to_lowercase() == email
            })
            .cloned()
            .collect())
    }

    async fn all_submissions(&self) -> Maybe<Vec<SubmissionRow>> {
        let tables = self.tables.lock().unwrap();
        Self::check_online(&tables)?;
        let mut rows = tables.certificates.clone();
        rows.sort_by(|a, b| a.department.cmp(&b.department));
        Ok(rows)
    }

    async fn admin_exists(&self, username: &str, password: &str) -> Maybe<bool> {
        let tables = self.tables.lock().unwrap();
        Self::check_online(&tables)?;
        Ok(tables
            .admins
            .iter()
            .any(|(u, p)| u == username && p == password))
    }
}

pub fn row(name: &str, regno: &str, department: &str, links: &str) -> SubmissionRow {
    SubmissionRow {
        name: name.to_string(),
        regno: regno.to_string(),
        course: "B.Tech".to_string(),
        department: department.to_string(),
        provider: "Coursera".to_string(),
        email: format!("{}@x.com", regno.to_lowercase()),
        certificate_links: links.to_string(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// Drives the router like a browser would, keeping cookies between calls.
pub struct Client {
    app: Router,
    cookies: HashMap<String, String>,
}

impl Client {
    pub fn new(store: MemoryStore) -> Self {
        let store: DynStore = Arc::new(store);
        Client {
            app: certdesk::app(store, signing_key(SECRET)),
            cookies: HashMap::new(),
        }
    }

    pub fn set_raw_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self
            .request("GET", path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let body = form
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default();
            let (name, cookie) = pair.split_once('=').unwrap_or((pair, ""));
            if cookie.is_empty() || value.contains("Max-Age=0") {
                self.cookies.remove(name.trim());
            } else {
                self.cookies.insert(name.trim().to_string(), cookie.to_string());
            }
        }
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        TestResponse {
            status,
            location,
            // older template escapers turn `/` into an entity
            body: String::from_utf8(bytes.to_vec()).unwrap().replace("&#x2f;", "/"),
        }
    }
}

fn encode(raw: &str) -> String {
    let mut out = String::new();
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
