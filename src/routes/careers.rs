use crate::domain::{CareerSubmission, Resume, SubmitterEmail, SubmitterName};
use crate::email_client::{DispatchError, Dispatcher, EmailMessage, MailRouting};
use crate::startup::UploadLimits;
use crate::utils::error_chain_fmt;
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use futures_util::TryStreamExt;

const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

/// The raw parts of a career submission, as they came off the wire.
#[derive(Default)]
pub struct CareerFormData {
    name: Option<String>,
    email: Option<String>,
    resume: Option<Resume>,
}

impl TryFrom<CareerFormData> for CareerSubmission {
    type Error = CareerError;

    fn try_from(form: CareerFormData) -> Result<Self, Self::Error> {
        let (name, email, resume) = match (form.name, form.email, form.resume) {
            (Some(name), Some(email), Some(resume))
                if !name.trim().is_empty() && !email.trim().is_empty() =>
            {
                (name, email, resume)
            }
            _ => return Err(CareerError::MissingFields),
        };
        let name = SubmitterName::parse(name).map_err(CareerError::ValidationError)?;
        let email = SubmitterEmail::parse(email).map_err(CareerError::ValidationError)?;
        Ok(CareerSubmission {
            name,
            email,
            resume,
        })
    }
}

#[derive(thiserror::Error)]
pub enum CareerError {
    #[error("Name, email, and resume are required")]
    MissingFields,
    #[error("{0}")]
    ValidationError(String),
    #[error("Resume must not exceed {0} bytes")]
    ResumeTooLarge(usize),
    #[error("Failed to submit application")]
    DispatchFailed(#[from] DispatchError),
}

impl std::fmt::Debug for CareerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CareerError {
    fn status_code(&self) -> StatusCode {
        match self {
            CareerError::MissingFields | CareerError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CareerError::ResumeTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CareerError::DispatchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Display of DispatchFailed is generic; the cause chain only goes to the logs.
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[tracing::instrument(
    name = "Relaying a career application",
    skip(payload, dispatcher, routing, limits),
    fields(
        applicant_name = tracing::field::Empty,
        applicant_email = tracing::field::Empty,
        resume_filename = tracing::field::Empty
    )
)]
pub async fn apply(
    payload: Multipart,
    dispatcher: web::Data<dyn Dispatcher>,
    routing: web::Data<MailRouting>,
    limits: web::Data<UploadLimits>,
) -> Result<HttpResponse, CareerError> {
    let form = read_career_form(payload, limits.max_resume_bytes).await?;
    let submission: CareerSubmission = form.try_into()?;
    let span = tracing::Span::current();
    span.record("applicant_name", &tracing::field::display(&submission.name));
    span.record("applicant_email", &tracing::field::display(&submission.email));
    span.record("resume_filename", &submission.resume.filename());

    send_application(dispatcher.get_ref(), &routing, submission)
        .await
        .map_err(|e| {
            tracing::error!(error.cause_chain = ?e, "Failed to send the career application");
            e
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Application submitted successfully"
    })))
}

#[tracing::instrument(name = "Reading the career form", skip(payload))]
async fn read_career_form(
    mut payload: Multipart,
    max_resume_bytes: usize,
) -> Result<CareerFormData, CareerError> {
    let mut form = CareerFormData::default();
    let mut seen_resume = false;
    let mut seen_any_field = false;
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // A form with every input left out arrives as a body with no parts at all.
            Err(MultipartError::Incomplete) if !seen_any_field => {
                return Err(CareerError::MissingFields)
            }
            Err(e) => return Err(malformed(e)),
        };
        seen_any_field = true;
        let disposition = field.content_disposition().clone();
        let field_name = disposition.get_name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                let value = read_text(&mut field, &field_name).await?;
                set_once(&mut form.name, value, &field_name)?;
            }
            "email" => {
                let value = read_text(&mut field, &field_name).await?;
                set_once(&mut form.email, value, &field_name)?;
            }
            "resume" => {
                if seen_resume {
                    return Err(duplicated(&field_name));
                }
                seen_resume = true;
                let content_type = field.content_type().map(|mime| mime.to_string());
                let content = read_bytes(&mut field, max_resume_bytes)
                    .await?
                    .ok_or(CareerError::ResumeTooLarge(max_resume_bytes))?;
                form.resume = Resume::parse(
                    disposition.get_filename().map(ToOwned::to_owned),
                    content_type,
                    content,
                );
            }
            "" => return Err(CareerError::ValidationError("Unnamed form field".into())),
            other => {
                return Err(CareerError::ValidationError(format!(
                    "Unexpected form field `{}`",
                    other
                )))
            }
        }
    }
    Ok(form)
}

async fn read_text(field: &mut Field, field_name: &str) -> Result<String, CareerError> {
    let bytes = read_bytes(field, MAX_TEXT_FIELD_BYTES).await?.ok_or_else(|| {
        CareerError::ValidationError(format!("Field `{}` is too long", field_name))
    })?;
    String::from_utf8(bytes)
        .map_err(|_| CareerError::ValidationError(format!("Field `{}` is not valid UTF-8", field_name)))
}

/// Buffers a field in memory, returning `None` as soon as it grows past `limit`.
async fn read_bytes(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, CareerError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if buffer.len() + chunk.len() > limit {
            return Ok(None);
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(Some(buffer))
}

fn set_once(slot: &mut Option<String>, value: String, field_name: &str) -> Result<(), CareerError> {
    if slot.is_some() {
        return Err(duplicated(field_name));
    }
    *slot = Some(value);
    Ok(())
}

fn duplicated(field_name: &str) -> CareerError {
    CareerError::ValidationError(format!("Field `{}` was submitted more than once", field_name))
}

fn malformed(e: MultipartError) -> CareerError {
    CareerError::ValidationError(format!("Malformed multipart payload: {}", e))
}

#[tracing::instrument(name = "Notify the business of a career application", skip_all)]
async fn send_application(
    dispatcher: &dyn Dispatcher,
    routing: &MailRouting,
    submission: CareerSubmission,
) -> Result<(), DispatchError> {
    let text_body = format!(
        "New career application\n\n\
        Name: {name}\n\
        Email: {email}\n\n\
        The applicant's resume is attached.\n",
        name = submission.name,
        email = submission.email,
    );
    let message = EmailMessage {
        from: routing.sender.clone(),
        to: routing.support_address.clone(),
        reply_to: Some(submission.email.clone()),
        subject: format!("New career application from {}", submission.name),
        text_body,
        attachments: vec![submission.resume.into()],
    };
    dispatcher.send(&message).await
}
