//! Validation of the post submission form.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_url;
use crate::validate::{FIELD_MIN_CHARS, TITLE_MIN_CHARS, has_min_chars, is_valid_url};

/// Raw fields of the submission form. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A submission that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    /// Trimmed title.
    pub title: String,
    /// Normalized link, if one was given.
    pub url: Option<String>,
    /// Free-text content exactly as submitted, if any.
    pub body: Option<String>,
}

/// Reasons a submission is rejected. The display text is the message shown
/// to the user next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title missing or shorter than two characters.
    #[error("Başlık en az iki harfli olmalıdır.")]
    TitleTooShort,

    /// Neither content nor a link was provided.
    #[error("En az 1 harften oluşacak içerik veya URL adresi eklenmelidir.")]
    MissingContentOrUrl,

    /// A link was provided but is not a well-formed web address.
    #[error("Lütfen geçerli bir URL adresi girin.")]
    InvalidUrl,
}

impl ValidationError {
    /// Short machine-readable code, used as a metrics label.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TitleTooShort => "title_too_short",
            Self::MissingContentOrUrl => "missing_content_or_url",
            Self::InvalidUrl => "invalid_url",
        }
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionInput
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Build from raw form pairs. A repeated field keeps its first value;
    /// unknown fields are ignored.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut input = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "title" => &mut input.title,
                "content" => &mut input.content,
                "url" => &mut input.url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        input
    }
}

impl SubmissionInput {
    /// Validate the fields in order; the first failing rule wins.
    ///
    /// 1. the title needs at least two characters
    /// 2. content or a URL must be present
    /// 3. a present URL must be well formed
    ///
    /// A present URL is normalized; absent content becomes `None`.
    pub fn validate(&self) -> Result<ValidSubmission, ValidationError> {
        let title = self.title.as_deref();
        let content = self.content.as_deref();
        let url = self.url.as_deref();

        if !has_min_chars(title, TITLE_MIN_CHARS) {
            return Err(ValidationError::TitleTooShort);
        }

        let has_content = has_min_chars(content, FIELD_MIN_CHARS);
        let has_url = has_min_chars(url, FIELD_MIN_CHARS);

        if !has_content && !has_url {
            return Err(ValidationError::MissingContentOrUrl);
        }

        let url = match url.filter(|_| has_url) {
            Some(raw) if !is_valid_url(raw) => return Err(ValidationError::InvalidUrl),
            Some(raw) => Some(normalize_url(raw).map_err(|_| ValidationError::InvalidUrl)?),
            None => None,
        };

        Ok(ValidSubmission {
            title: title.unwrap_or_default().trim().to_string(),
            url,
            body: content.filter(|_| has_content).map(str::to_string),
        })
    }
}
