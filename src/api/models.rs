use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub question: String,
}

/// One entry in the `details` array of a 400 response.
#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: &'static str,
    pub message: &'static str,
}

/// Trim-then-validate: the trimmed form is what gets generated against
/// and stored.
pub fn validate_question(raw: &str) -> Result<String, Vec<ValidationDetail>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(vec![ValidationDetail {
            field: "question",
            message: "Question cannot be empty",
        }]);
    }
    Ok(trimmed.to_string())
}
