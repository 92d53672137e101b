//! Per-browser session state, carried in signed cookies.
//!
//! Handlers never read cookies directly. They extract a [`Session`], ask it
//! about or change the admin flag, queue flash messages, and hand it back in
//! their response so the cookie changes reach the browser.

use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

const ADMIN_COOKIE: &str = "admin_logged_in";
const FLASH_COOKIE: &str = "_flashes";

/// Stretches the configured secret to the 64 bytes a signing key needs.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

pub struct Session {
    jar: SignedCookieJar,
}

#[async_trait]
impl<B> FromRequest<B> for Session
where
    B: Send,
{
    type Rejection = <SignedCookieJar as FromRequest<B>>::Rejection;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_request(req).await?;
        Ok(Session { jar })
    }
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.jar
            .get(ADMIN_COOKIE)
            .map(|cookie| cookie.value() == "true")
            .unwrap_or(false)
    }

    pub fn login_admin(mut self) -> Self {
        self.jar = self.jar.add(session_cookie(ADMIN_COOKIE, "true".to_string()));
        self
    }

    /// Clears the admin flag. Fine to call when it was never set.
    pub fn logout_admin(mut self) -> Self {
        self.jar = self.jar.remove(session_cookie(ADMIN_COOKIE, String::new()));
        self
    }

    pub fn flash<S: Into<String>>(mut self, level: FlashLevel, message: S) -> Self {
        let mut pending = self.pending_flashes();
        pending.push(FlashMessage {
            level,
            message: message.into(),
        });
        self.jar = self.jar.add(session_cookie(FLASH_COOKIE, encode_flashes(&pending)));
        self
    }

    /// Drains the queued flash messages; they are shown once.
    pub fn take_flashes(mut self) -> (Self, Vec<FlashMessage>) {
        let pending = self.pending_flashes();
        if self.jar.get(FLASH_COOKIE).is_some() {
            self.jar = self.jar.remove(session_cookie(FLASH_COOKIE, String::new()));
        }
        (self, pending)
    }

    pub fn into_jar(self) -> SignedCookieJar {
        self.jar
    }

    fn pending_flashes(&self) -> Vec<FlashMessage> {
        self.jar
            .get(FLASH_COOKIE)
            .map(|cookie| decode_flashes(cookie.value()))
            .unwrap_or_default()
    }
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

// Hex keeps arbitrary message text inside the cookie-value grammar.
fn encode_flashes(flashes: &[FlashMessage]) -> String {
    hex::encode(serde_json::to_vec(flashes).unwrap_or_default())
}

fn decode_flashes(raw: &str) -> Vec<FlashMessage> {
    hex::decode(raw)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}
