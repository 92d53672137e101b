use axum::extract::Form;
use axum::response::{IntoResponse, Response};
use axum::Extension;

use crate::db::DynStore;
use crate::forms::{parse_lookup, parse_submission, FormPairs};
use crate::models::{Submission, SubmitOutcome};
use crate::session::{FlashLevel, Session};
use crate::views::{redirect, render, StudentPage, StudentViewPage};

pub async fn submission_form(session: Session) -> Response {
    render(session, |flashes| StudentPage { flashes })
}

pub async fn submit_certificates(
    session: Session,
    Extension(store): Extension<DynStore>,
    Form(pairs): Form<FormPairs>,
) -> Response {
    let submission = match parse_submission(&pairs) {
        Ok(submission) => submission,
        Err(err) => return redirect(session.flash(FlashLevel::Error, err.to_string()), "/student"),
    };
    let regno = submission.regno.clone();

    match store.submit(submission).await {
        Ok(SubmitOutcome::Inserted) => {
            log::info!("Stored certificate submission for {}", regno);
            let session = session.flash(
                FlashLevel::Success,
                "Your certificate submission was successful!",
            );
            render(session, |flashes| StudentPage { flashes })
        }
        Ok(SubmitOutcome::NotRegistered) => {
            log::warn!("Rejected submission from unregistered student {}", regno);
            redirect(
                session.flash(
                    FlashLevel::Error,
                    "You are not a registered student. Submission denied.",
                ),
                "/student",
            )
        }
        Err(err) => {
            log::error!("Submission for {} failed: {}", regno, err);
            redirect(session.flash(FlashLevel::Error, err.to_string()), "/student")
        }
    }
}

pub async fn lookup_form(session: Session) -> Response {
    render(session, |flashes| StudentViewPage {
        flashes,
        submissions: Vec::new(),
    })
}

/// Shows a student's own submissions. A stored link list that cannot be
/// decoded fails the whole request.
pub async fn lookup_submissions(
    mut session: Session,
    Extension(store): Extension<DynStore>,
    Form(pairs): Form<FormPairs>,
) -> Response {
    let lookup = parse_lookup(&pairs);
    let submissions: Vec<Submission> = match store
        .find_submissions(&lookup.name, &lookup.regno, &lookup.email)
        .await
    {
        Ok(rows) => match rows
            .into_iter()
            .map(|row| row.decode())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(submissions) => submissions,
            Err(err) => {
                log::error!("Lookup for {} hit unreadable data: {}", lookup.regno, err);
                return (session.into_jar(), err).into_response();
            }
        },
        Err(err) => {
            log::error!("Lookup for {} failed: {}", lookup.regno, err);
            session = session.flash(FlashLevel::Error, err.to_string());
            Vec::new()
        }
    };

    if submissions.is_empty() {
        session = session.flash(FlashLevel::Error, "No submissions found for the given details.");
    }

    render(session, |flashes| StudentViewPage {
        flashes,
        submissions,
    })
}
