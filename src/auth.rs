use axum::extract::Form;
use axum::response::Response;
use axum::Extension;

use crate::db::DynStore;
use crate::err::Error;
use crate::forms::{parse_login, FormPairs};
use crate::models::Submission;
use crate::session::{FlashLevel, Session};
use crate::views::{redirect, render, AdminLoginPage, AdminViewPage};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AuthResult {
    Success,
    InvalidCredentials,
}

/// Admin credentials are stored and compared as plain text.
pub async fn check_credentials(
    store: &DynStore,
    username: &str,
    password: &str,
) -> Result<AuthResult, Error> {
    Ok(if store.admin_exists(username, password).await? {
        AuthResult::Success
    } else {
        AuthResult::InvalidCredentials
    })
}

/// The one authorization gate: admin pages need the session flag.
pub fn ensure_admin(session: &Session) -> Result<(), Error> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(Error::NotAuthorized)
    }
}

pub async fn login_form(session: Session) -> Response {
    render(session, |flashes| AdminLoginPage { flashes })
}

pub async fn login_admin(
    session: Session,
    Extension(store): Extension<DynStore>,
    Form(pairs): Form<FormPairs>,
) -> Response {
    let credentials = parse_login(&pairs);

    let session = match check_credentials(&store, &credentials.username, &credentials.password).await {
        Ok(AuthResult::Success) => {
            log::info!("Admin `{}` logged in", credentials.username);
            return redirect(session.login_admin(), "/adminview");
        }
        Ok(AuthResult::InvalidCredentials) => {
            log::warn!("Failed admin login for `{}`", credentials.username);
            session.flash(FlashLevel::Error, "Invalid username or password.")
        }
        Err(err) => {
            log::error!("Admin login lookup failed: {}", err);
            session.flash(FlashLevel::Error, err.to_string())
        }
    };

    render(session, |flashes| AdminLoginPage { flashes })
}

/// Every submission, department first. Rows whose links cannot be decoded
/// are listed with no links.
pub async fn list_submissions(
    session: Session,
    Extension(store): Extension<DynStore>,
) -> Response {
    if let Err(err) = ensure_admin(&session) {
        log::warn!("Unauthenticated request for the admin listing");
        return redirect(session.flash(FlashLevel::Error, err.to_string()), "/admin");
    }

    let (session, submissions): (Session, Vec<Submission>) = match store.all_submissions().await {
        Ok(rows) => (
            session,
            rows.into_iter().map(|row| row.decode_or_empty()).collect(),
        ),
        Err(err) => {
            log::error!("Admin listing failed: {}", err);
            (session.flash(FlashLevel::Error, err.to_string()), Vec::new())
        }
    };

    render(session, |flashes| AdminViewPage {
        flashes,
        submissions,
    })
}

pub async fn logout(session: Session) -> Response {
    let session = session
        .logout_admin()
        .flash(FlashLevel::Success, "Logged out successfully.");
    redirect(session, "/")
}
