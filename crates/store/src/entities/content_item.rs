//! Content item entity.
//!
//! A content item is one entry in the community feed. Every kind shares a
//! common envelope (author, reactions, view counter); the kind-specific
//! payload is a tagged union so consumers must handle all kinds
//! exhaustively.

use std::collections::BTreeSet;
use std::fmt;

use agora_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content kinds supported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    Poll,
    Audio,
    Survey,
}

impl ContentKind {
    /// Stable name used in documents and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Poll => "poll",
            Self::Audio => "audio",
            Self::Survey => "survey",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single per-user reaction on a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    /// Reacting user ID.
    pub user_id: String,
    /// Reaction emoji.
    pub reaction: String,
}

/// Text post payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBody {
    /// Post text content.
    pub text: String,
}

/// Image gallery payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    /// Optional caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Attached file IDs.
    pub file_ids: Vec<String>,
}

/// Audio clip payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBody {
    /// Optional caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Attached file ID.
    pub file_id: String,
}

/// One selectable option on a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    /// Option ID.
    pub id: String,
    /// Option text.
    pub text: String,
    /// User IDs currently selecting this option.
    #[serde(default)]
    pub voters: BTreeSet<String>,
}

/// Poll payload (single-choice ballots).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollBody {
    /// Poll question.
    pub question: String,
    /// Selectable options, in display order.
    pub options: Vec<PollOption>,
    /// Recorded at creation time. Poll ballots are single-choice regardless
    /// of this flag; only surveys enforce it.
    #[serde(default)]
    pub allow_multiple_answers: bool,
    /// When voting closes (none for no expiration).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Cached total across all options' voter sets.
    #[serde(default)]
    pub votes: u64,
}

impl PollBody {
    /// Whether voting has closed as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Recompute the vote total from the voter sets.
    #[must_use]
    pub fn tally(&self) -> u64 {
        self.options.iter().map(|o| o.voters.len() as u64).sum()
    }

    /// Find an option by ID.
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Find an option by ID, mutably.
    pub fn option_mut(&mut self, option_id: &str) -> Option<&mut PollOption> {
        self.options.iter_mut().find(|o| o.id == option_id)
    }

    /// Option IDs currently selected by `user_id`.
    #[must_use]
    pub fn selections(&self, user_id: &str) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.voters.contains(user_id))
            .map(|o| o.id.clone())
            .collect()
    }
}

/// One selectable option on a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyOption {
    /// Option ID.
    pub id: String,
    /// Option text.
    pub text: String,
    /// Cached size of `voters`, maintained differentially.
    #[serde(default)]
    pub votes: u64,
    /// User IDs currently selecting this option.
    #[serde(default)]
    pub voters: BTreeSet<String>,
}

/// Survey payload (multi-choice ballots when allowed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyBody {
    /// Survey question.
    pub question: String,
    /// Selectable options, in display order.
    pub options: Vec<SurveyOption>,
    /// Whether a ballot may select more than one option.
    #[serde(default)]
    pub allow_multiple_answers: bool,
    /// When voting closes (none for no expiration).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SurveyBody {
    /// Whether voting has closed as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Find an option by ID.
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&SurveyOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Find an option by ID, mutably.
    pub fn option_mut(&mut self, option_id: &str) -> Option<&mut SurveyOption> {
        self.options.iter_mut().find(|o| o.id == option_id)
    }

    /// Option IDs currently selected by `user_id`.
    #[must_use]
    pub fn selections(&self, user_id: &str) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.voters.contains(user_id))
            .map(|o| o.id.clone())
            .collect()
    }
}

/// Kind-specific payload of a content item.
///
/// Serialized internally tagged: the document carries a top-level `kind`
/// field next to the payload fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentBody {
    Text(TextBody),
    Image(ImageBody),
    Poll(PollBody),
    Audio(AudioBody),
    Survey(SurveyBody),
}

impl ContentBody {
    /// The kind tag of this payload.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Image(_) => ContentKind::Image,
            Self::Poll(_) => ContentKind::Poll,
            Self::Audio(_) => ContentKind::Audio,
            Self::Survey(_) => ContentKind::Survey,
        }
    }
}

/// A content item document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Item ID.
    pub id: String,

    /// Author user ID.
    pub created_by: String,

    /// Per-user reactions. A user appears at most once.
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    /// View counter. Never decreases.
    #[serde(default)]
    pub views: u64,

    /// Kind-specific payload, flattened so `kind` sits at the top level.
    #[serde(flatten)]
    pub body: ContentBody,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// The kind of this item.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.body.kind()
    }

    /// Narrow to the poll payload.
    pub fn as_poll(&self) -> AppResult<&PollBody> {
        match &self.body {
            ContentBody::Poll(poll) => Ok(poll),
            other => Err(AppError::InvalidVariant(format!(
                "expected poll, found {}",
                other.kind()
            ))),
        }
    }

    /// Narrow to the poll payload, mutably.
    pub fn as_poll_mut(&mut self) -> AppResult<&mut PollBody> {
        match &mut self.body {
            ContentBody::Poll(poll) => Ok(poll),
            other => Err(AppError::InvalidVariant(format!(
                "expected poll, found {}",
                other.kind()
            ))),
        }
    }

    /// Narrow to the survey payload.
    pub fn as_survey(&self) -> AppResult<&SurveyBody> {
        match &self.body {
            ContentBody::Survey(survey) => Ok(survey),
            other => Err(AppError::InvalidVariant(format!(
                "expected survey, found {}",
                other.kind()
            ))),
        }
    }

    /// Narrow to the survey payload, mutably.
    pub fn as_survey_mut(&mut self) -> AppResult<&mut SurveyBody> {
        match &mut self.body {
            ContentBody::Survey(survey) => Ok(survey),
            other => Err(AppError::InvalidVariant(format!(
                "expected survey, found {}",
                other.kind()
            ))),
        }
    }

    /// Find this user's reaction, if any.
    #[must_use]
    pub fn reaction_of(&self, user_id: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.user_id == user_id)
    }
}
