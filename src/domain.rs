mod career_submission;
mod contact_submission;
mod message_text;
mod phone_number;
mod resume;
mod submitter_email;
mod submitter_name;

pub use career_submission::CareerSubmission;
pub use contact_submission::ContactSubmission;
pub use message_text::MessageText;
pub use phone_number::{sanitize_phone, PhoneNumber};
pub use resume::Resume;
pub use submitter_email::{validate_email, SubmitterEmail};
pub use submitter_name::SubmitterName;
