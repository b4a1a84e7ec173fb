use crate::helpers::{assert_error_body, spawn_app, spawn_app_with, Behaviour, TEST_MAX_RESUME_BYTES};
use reqwest::multipart::{Form, Part};

const RESUME: &[u8] = b"%PDF-1.7 Ada Lovelace - Analytical Engine programmer";

fn resume_part(filename: &str, content: Vec<u8>) -> Part {
    Part::bytes(content)
        .file_name(filename.to_string())
        .mime_str("application/pdf")
        .unwrap()
}

fn valid_form() -> Form {
    Form::new()
        .text("name", "Ada Lovelace")
        .text("email", "ada@example.com")
        .part("resume", resume_part("ada-lovelace.pdf", RESUME.to_vec()))
}

#[tokio::test]
async fn careers_returns_a_200_and_sends_one_email_with_the_resume_attached() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_careers(valid_form()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Application submitted successfully");

    let emails = app.dispatcher.send_attempts();
    assert_eq!(emails.len(), 1, "Expected 1 email, {} were sent", emails.len());
    let email = &emails[0];
    assert_eq!(email.to.as_ref(), app.routing.support_address.as_ref());
    assert_eq!(email.reply_to.as_ref().map(|e| e.as_ref()), Some("ada@example.com"));
    assert!(email.subject.contains("Ada Lovelace"));
    assert!(email.text_body.contains("Name: Ada Lovelace"));
    assert!(email.text_body.contains("Email: ada@example.com"));

    assert_eq!(email.attachments.len(), 1);
    let attachment = &email.attachments[0];
    assert_eq!(attachment.filename, "ada-lovelace.pdf");
    assert_eq!(attachment.content_type, "application/pdf");
    assert_eq!(attachment.content, RESUME);
}

#[tokio::test]
async fn careers_does_not_run_the_verification_step() {
    // Arrange
    let app = spawn_app().await;

    // Act
    app.post_careers(valid_form()).await;

    // Assert
    assert_eq!(app.dispatcher.verifications(), 0);
}

#[tokio::test]
async fn careers_returns_a_400_when_data_is_missing() {
    // Arrange
    let app = spawn_app().await;
    let resume = || resume_part("cv.pdf", RESUME.to_vec());
    let test_cases = vec![
        (
            Form::new().text("name", "Ada Lovelace").text("email", "ada@example.com"),
            "missing the resume",
        ),
        (
            Form::new()
                .text("name", "Ada Lovelace")
                .text("email", "ada@example.com")
                .part("resume", resume_part("", Vec::new())),
            "an empty file input",
        ),
        (
            Form::new()
                .text("name", "Ada Lovelace")
                .text("email", "ada@example.com")
                .part("resume", resume_part("cv.pdf", Vec::new())),
            "a zero-byte resume",
        ),
        (
            Form::new().text("email", "ada@example.com").part("resume", resume()),
            "missing the name",
        ),
        (
            Form::new().text("name", "Ada Lovelace").part("resume", resume()),
            "missing the email",
        ),
        (
            Form::new()
                .text("name", "")
                .text("email", "ada@example.com")
                .part("resume", resume()),
            "an empty name",
        ),
        (Form::new(), "missing everything"),
    ];

    for (form, description) in test_cases {
        // Act
        let response = app.post_careers(form).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body["error"], "Name, email, and resume are required",
            "Unexpected error body when the payload was {}.",
            description
        );
    }
    assert_eq!(app.dispatcher.invocations(), 0);
}

#[tokio::test]
async fn careers_returns_a_400_when_fields_are_invalid_or_unexpected() {
    // Arrange
    let app = spawn_app().await;
    let resume = || resume_part("cv.pdf", RESUME.to_vec());
    let test_cases = vec![
        (
            Form::new()
                .text("name", "Ada Lovelace")
                .text("email", "definitely-not-an-email")
                .part("resume", resume()),
            "an invalid email",
        ),
        (
            Form::new()
                .text("name", "Ada Lovelace")
                .text("email", "ada@example.com")
                .text("salary", "a lot")
                .part("resume", resume()),
            "an unexpected field",
        ),
        (
            Form::new()
                .text("name", "Ada Lovelace")
                .text("name", "Charles Babbage")
                .text("email", "ada@example.com")
                .part("resume", resume()),
            "a duplicated field",
        ),
    ];

    for (form, description) in test_cases {
        // Act
        let response = app.post_careers(form).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had {}.",
            description
        );
        assert_error_body(&response.json().await.unwrap());
    }
    assert_eq!(app.dispatcher.invocations(), 0);
}

#[tokio::test]
async fn careers_returns_a_400_when_the_body_is_not_multipart() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .api_client
        .post(&format!("{}/api/careers", &app.address))
        .json(&serde_json::json!({ "name": "Ada Lovelace", "email": "ada@example.com" }))
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(400, response.status().as_u16());
    assert_eq!(app.dispatcher.invocations(), 0);
}

#[tokio::test]
async fn careers_returns_a_413_when_the_resume_is_too_large() {
    // Arrange
    let app = spawn_app().await;
    let form = Form::new()
        .text("name", "Ada Lovelace")
        .text("email", "ada@example.com")
        .part("resume", resume_part("cv.pdf", vec![b'x'; TEST_MAX_RESUME_BYTES + 1]));

    // Act
    let response = app.post_careers(form).await;

    // Assert
    assert_eq!(413, response.status().as_u16());
    assert_error_body(&response.json().await.unwrap());
    assert_eq!(app.dispatcher.invocations(), 0);
}

#[tokio::test]
async fn careers_accepts_a_resume_at_the_size_limit() {
    // Arrange
    let app = spawn_app().await;
    let form = Form::new()
        .text("name", "Ada Lovelace")
        .text("email", "ada@example.com")
        .part("resume", resume_part("cv.pdf", vec![b'x'; TEST_MAX_RESUME_BYTES]));

    // Act
    let response = app.post_careers(form).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(app.dispatcher.send_attempts().len(), 1);
}

#[tokio::test]
async fn careers_returns_a_generic_500_when_sending_fails() {
    // Arrange
    let app = spawn_app_with(Behaviour::FailSendAttempt(1)).await;

    // Act
    let response = app.post_careers(valid_form()).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Failed to submit application" }));
    assert_eq!(app.dispatcher.send_attempts().len(), 1);
}

#[tokio::test]
async fn careers_reports_missing_fields_for_a_form_without_any_parts() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_careers(Form::new()).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "error": "Name, email, and resume are required" })
    );
    assert_eq!(app.dispatcher.invocations(), 0);
}
