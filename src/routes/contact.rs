use crate::domain::{ContactSubmission, MessageText, PhoneNumber, SubmitterEmail, SubmitterName};
use crate::email_client::{DispatchError, Dispatcher, EmailMessage, MailRouting};
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactFormData {
    name: String,
    #[serde(default)]
    email: Option<String>,
    phone: String,
    message: String,
}

impl TryFrom<ContactFormData> for ContactSubmission {
    type Error = String;

    fn try_from(form: ContactFormData) -> Result<Self, Self::Error> {
        let name = SubmitterName::parse(form.name)?;
        let email = form.email.map(SubmitterEmail::parse).transpose()?;
        let phone = PhoneNumber::parse(form.phone)?;
        let message = MessageText::parse(form.message)?;
        Ok(ContactSubmission {
            name,
            email,
            phone,
            message,
        })
    }
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to relay the contact submission")]
    DispatchFailed(#[from] DispatchError),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::DispatchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ContactError::ValidationError(message) => HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": message })),
            ContactError::DispatchFailed(e) => {
                let error = match e {
                    DispatchError::VerificationFailed(_) => "The email service is unavailable",
                    DispatchError::SendFailed(_) => "The email could not be delivered",
                };
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Failed to send email",
                    "error": error,
                }))
            }
        }
    }
}

#[tracing::instrument(
    name = "Relaying a contact form submission",
    skip(body, dispatcher, routing),
    fields(
        submitter_name = %body.name,
        submitter_email = tracing::field::Empty
    )
)]
pub async fn contact(
    body: web::Json<ContactFormData>,
    dispatcher: web::Data<dyn Dispatcher>,
    routing: web::Data<MailRouting>,
) -> Result<HttpResponse, ContactError> {
    let submission: ContactSubmission = body
        .into_inner()
        .try_into()
        .map_err(ContactError::ValidationError)?;
    if let Some(email) = &submission.email {
        tracing::Span::current().record("submitter_email", &tracing::field::display(email));
    }

    dispatcher.verify().await.map_err(|e| {
        tracing::error!(error.cause_chain = ?e, "Mail transport verification failed");
        e
    })?;

    send_notification(dispatcher.get_ref(), &routing, &submission)
        .await
        .map_err(|e| {
            tracing::error!(error.cause_chain = ?e, "Failed to send the contact notification");
            e
        })?;

    if let Some(email) = &submission.email {
        send_acknowledgment(dispatcher.get_ref(), &routing, &submission.name, email)
            .await
            .map_err(|e| {
                tracing::error!(
                    error.cause_chain = ?e,
                    "Notification delivered but the acknowledgment failed"
                );
                e
            })?;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Email sent successfully" })))
}

#[tracing::instrument(name = "Notify the business of a contact submission", skip_all)]
async fn send_notification(
    dispatcher: &dyn Dispatcher,
    routing: &MailRouting,
    submission: &ContactSubmission,
) -> Result<(), DispatchError> {
    let email = submission
        .email
        .as_ref()
        .map(AsRef::as_ref)
        .unwrap_or("(not provided)");
    let text_body = format!(
        "New contact form submission\n\n\
        Name: {name}\n\
        Email: {email}\n\
        Phone: {phone}\n\n\
        Message:\n{message}\n",
        name = submission.name,
        email = email,
        phone = submission.phone,
        message = submission.message.as_ref(),
    );
    let message = EmailMessage {
        from: routing.sender.clone(),
        to: routing.support_address.clone(),
        reply_to: submission.email.clone(),
        subject: format!("New contact form submission from {}", submission.name),
        text_body,
        attachments: Vec::new(),
    };
    dispatcher.send(&message).await
}

#[tracing::instrument(name = "Acknowledge a contact submission", skip_all)]
async fn send_acknowledgment(
    dispatcher: &dyn Dispatcher,
    routing: &MailRouting,
    name: &SubmitterName,
    email: &SubmitterEmail,
) -> Result<(), DispatchError> {
    let text_body = format!(
        "Hi {name},\n\n\
        Thank you for contacting {business}. We have received your message \
        and a member of our team will get back to you shortly.\n\n\
        Best regards,\n\
        The {business} team\n",
        name = name,
        business = routing.business_name,
    );
    let message = EmailMessage {
        from: routing.sender.clone(),
        to: email.clone(),
        reply_to: Some(routing.support_address.clone()),
        subject: format!("Thank you for contacting {}", routing.business_name),
        text_body,
        attachments: Vec::new(),
    };
    dispatcher.send(&message).await
}
