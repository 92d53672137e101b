use askama::Template;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::err::Error;
use crate::models::Submission;
use crate::session::{FlashMessage, Session};

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub flashes: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "student.html")]
pub struct StudentPage {
    pub flashes: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "studentview.html")]
pub struct StudentViewPage {
    pub flashes: Vec<FlashMessage>,
    pub submissions: Vec<Submission>,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminLoginPage {
    pub flashes: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "adminview.html")]
pub struct AdminViewPage {
    pub flashes: Vec<FlashMessage>,
    pub submissions: Vec<Submission>,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundPage {
    pub flashes: Vec<FlashMessage>,
    pub path: String,
}

/// Renders a page with whatever flash messages are pending, clearing them.
pub fn render<T, F>(session: Session, build: F) -> Response
where
    T: Template,
    F: FnOnce(Vec<FlashMessage>) -> T,
{
    let (session, flashes) = session.take_flashes();
    match build(flashes).render() {
        Ok(html) => (session.into_jar(), Html(html)).into_response(),
        Err(err) => {
            log::error!("Failed to render page: {}", err);
            Error::from(err).into_response()
        }
    }
}

pub fn redirect(session: Session, to: &str) -> Response {
    (session.into_jar(), Redirect::to(to)).into_response()
}
