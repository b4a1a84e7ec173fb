use crate::domain::{Resume, SubmitterEmail, SubmitterName};

pub struct CareerSubmission {
    pub name: SubmitterName,
    pub email: SubmitterEmail,
    pub resume: Resume,
}
