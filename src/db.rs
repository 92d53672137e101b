use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::DatabaseConfig;
use crate::err::Maybe;
use crate::models::{NewSubmission, SubmissionRow, SubmitOutcome};

pub type DynStore = Arc<dyn CertificateStore>;

/// Everything the request handlers need from the relational store.
///
/// Each call acquires its own connection and releases it before returning,
/// whichever way it returns.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Checks `(regno, email)` against `students` and, only if a row exists,
    /// inserts the submission and commits.
    async fn submit(&self, submission: NewSubmission) -> Maybe<SubmitOutcome>;

    /// Submissions whose name, regno and email equal the (already lowercased)
    /// arguments, compared case-insensitively.
    async fn find_submissions(
        &self,
        name: &str,
        regno: &str,
        email: &str,
    ) -> Maybe<Vec<SubmissionRow>>;

    /// Every submission, ordered by department.
    async fn all_submissions(&self) -> Maybe<Vec<SubmissionRow>>;

    /// Plaintext comparison against `admin_users`.
    async fn admin_exists(&self, username: &str, password: &str) -> Maybe<bool>;
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS students (
        id INT AUTO_INCREMENT PRIMARY KEY,
        regno VARCHAR(64) NOT NULL,
        email VARCHAR(255) NOT NULL,
        INDEX students_regno_email (regno, email)
    )",
    "CREATE TABLE IF NOT EXISTS admin_users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(255) NOT NULL,
        password VARCHAR(255) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS student_certificates (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        regno VARCHAR(64) NOT NULL,
        course VARCHAR(255) NOT NULL,
        department VARCHAR(255) NOT NULL,
        provider VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        certificate_links TEXT NOT NULL
    )",
];

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Builds the pool without touching the server; connection failures
    /// surface on the first request that needs one.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy_with(config.connect_options());
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Maybe<()> {
        let mut conn = self.pool.acquire().await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&mut conn).await?;
        }
        log::info!("Database schema is in place");
        Ok(())
    }
}

#[async_trait]
impl CertificateStore for MySqlStore {
    async fn submit(&self, submission: NewSubmission) -> Maybe<SubmitOutcome> {
        let mut tx = self.pool.begin().await?;

        let registered = sqlx::query("SELECT 1 FROM students WHERE regno = ? AND email = ? LIMIT 1")
            .bind(&submission.regno)
            .bind(&submission.email)
            .fetch_optional(&mut tx)
            .await?
            .is_some();

        if !registered {
            // dropping the transaction rolls it back
            return Ok(SubmitOutcome::NotRegistered);
        }

        let row = submission.into_row();
        sqlx::query(
            "INSERT INTO student_certificates \
             (name, regno, course, department, provider, email, certificate_links) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.name)
        .bind(&row.regno)
        .bind(&row.course)
        .bind(&row.department)
        .bind(&row.provider)
        .bind(&row.email)
        .bind(&row.certificate_links)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        Ok(SubmitOutcome::Inserted)
    }

    async fn find_submissions(
        &self,
        name: &str,
        regno: &str,
        email: &str,
    ) -> Maybe<Vec<SubmissionRow>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, SubmissionRow>(
            "SELECT name, regno, course, department, provider, email, certificate_links \
             FROM student_certificates \
             WHERE LOWER(name) = ? AND LOWER(regno) = ? AND LOWER(email) = ?",
        )
        .bind(name)
        .bind(regno)
        .bind(email)
        .fetch_all(&mut conn)
        .await?;
        Ok(rows)
    }

    async fn all_submissions(&self) -> Maybe<Vec<SubmissionRow>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, SubmissionRow>(
            "SELECT name, regno, course, department, provider, email, certificate_links \
             FROM student_certificates ORDER BY department",
        )
        .fetch_all(&mut conn)
        .await?;
        Ok(rows)
    }

    async fn admin_exists(&self, username: &str, password: &str) -> Maybe<bool> {
        let mut conn = self.pool.acquire().await?;
        let found = sqlx::query("SELECT 1 FROM admin_users WHERE username = ? AND password = ? LIMIT 1")
            .bind(username)
            .bind(password)
            .fetch_optional(&mut conn)
            .await?
            .is_some();
        Ok(found)
    }
}
