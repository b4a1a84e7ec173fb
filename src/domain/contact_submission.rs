use crate::domain::{MessageText, PhoneNumber, SubmitterEmail, SubmitterName};

pub struct ContactSubmission {
    pub name: SubmitterName,
    /// Without an address the submitter gets no acknowledgment.
    pub email: Option<SubmitterEmail>,
    pub phone: PhoneNumber,
    pub message: MessageText,
}
