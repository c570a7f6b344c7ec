pub mod pagination;
pub mod records;
pub mod tag;

use serde::Serialize;

use self::tag::Tag;

pub const MAX_LABEL_LENGTH: usize = 64;
pub const MAX_TEXT_LENGTH: usize = 512;

/// One record plus its associated tags, as produced by the grouped
/// tags-joined fetch and serialized on the list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct RecordWithTags<T> {
    #[serde(flatten)]
    pub record: T,
    pub tags: Vec<Tag>,
}

/// Request-body validation, run before anything reaches the store.
pub trait ValidateBody {
    /// Returns one message per violated constraint; empty means valid.
    fn validate(&self) -> Vec<String>;
}

pub(crate) fn check_label(label: &str, errors: &mut Vec<String>) {
    if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
        errors.push(format!(
            "Value of label is not 1 to {MAX_LABEL_LENGTH} characters long"
        ));
    }
}

pub(crate) fn check_text(text: &str, errors: &mut Vec<String>) {
    if text.is_empty() || text.len() > MAX_TEXT_LENGTH {
        errors.push(format!(
            "Value of text is not 1 to {MAX_TEXT_LENGTH} characters long"
        ));
    }
}
