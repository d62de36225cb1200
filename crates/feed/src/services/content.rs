//! Content item service.
//!
//! Creation, lookup, and teardown of feed items. Reactions and ballots are
//! handled by the dedicated services; this one owns validation of new
//! items.

use agora_common::{AppError, AppResult, FeedConfig, IdGenerator};
use agora_store::entities::{
    AudioBody, ContentBody, ContentItem, ImageBody, PollBody, PollOption, SurveyBody,
    SurveyOption, TextBody,
};
use agora_store::ContentItemRepository;
use chrono::{DateTime, Duration, Utc};

/// Content service for the feed item lifecycle.
#[derive(Clone)]
pub struct ContentService {
    repo: ContentItemRepository,
    config: FeedConfig,
    id_gen: IdGenerator,
}

/// Input for creating a text post.
pub struct CreateTextInput {
    pub text: String,
}

/// Input for creating an image post.
pub struct CreateImageInput {
    pub caption: Option<String>,
    pub file_ids: Vec<String>,
}

/// Input for creating an audio post.
pub struct CreateAudioInput {
    pub caption: Option<String>,
    pub file_id: String,
}

/// Input for creating a poll.
pub struct CreatePollInput {
    pub question: String,
    pub options: Vec<String>,
    pub allow_multiple_answers: bool,
    /// Duration in seconds until voting closes.
    pub expires_in: Option<i64>,
}

/// Input for creating a survey.
pub struct CreateSurveyInput {
    pub question: String,
    pub options: Vec<String>,
    pub allow_multiple_answers: bool,
    /// Duration in seconds until voting closes.
    pub expires_in: Option<i64>,
}

impl ContentService {
    /// Maximum length of a text post.
    const MAX_TEXT_LENGTH: usize = 3000;
    /// Maximum length of a poll/survey question.
    const MAX_QUESTION_LENGTH: usize = 300;
    /// Maximum length of an image/audio caption.
    const MAX_CAPTION_LENGTH: usize = 512;

    /// Create a new content service with default limits.
    #[must_use]
    pub fn new(repo: ContentItemRepository) -> Self {
        Self::with_config(repo, FeedConfig::default())
    }

    /// Create a content service with custom limits.
    #[must_use]
    pub fn with_config(repo: ContentItemRepository, config: FeedConfig) -> Self {
        Self {
            repo,
            config,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a text post.
    pub async fn create_text(&self, user_id: &str, input: CreateTextInput) -> AppResult<ContentItem> {
        if input.text.trim().is_empty() {
            return Err(AppError::BadRequest("Text cannot be empty".to_string()));
        }
        if input.text.len() > Self::MAX_TEXT_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Text is too long (max {} chars)",
                Self::MAX_TEXT_LENGTH
            )));
        }

        self.create(user_id, ContentBody::Text(TextBody { text: input.text }))
            .await
    }

    /// Create an image post.
    pub async fn create_image(
        &self,
        user_id: &str,
        input: CreateImageInput,
    ) -> AppResult<ContentItem> {
        if input.file_ids.is_empty() {
            return Err(AppError::BadRequest(
                "Image post must have at least 1 file".to_string(),
            ));
        }
        Self::validate_caption(input.caption.as_deref())?;

        self.create(
            user_id,
            ContentBody::Image(ImageBody {
                caption: input.caption,
                file_ids: input.file_ids,
            }),
        )
        .await
    }

    /// Create an audio post.
    pub async fn create_audio(
        &self,
        user_id: &str,
        input: CreateAudioInput,
    ) -> AppResult<ContentItem> {
        if input.file_id.is_empty() {
            return Err(AppError::BadRequest(
                "Audio post must reference a file".to_string(),
            ));
        }
        Self::validate_caption(input.caption.as_deref())?;

        self.create(
            user_id,
            ContentBody::Audio(AudioBody {
                caption: input.caption,
                file_id: input.file_id,
            }),
        )
        .await
    }

    /// Create a poll.
    pub async fn create_poll(&self, user_id: &str, input: CreatePollInput) -> AppResult<ContentItem> {
        self.validate_question(&input.question)?;
        self.validate_choices(&input.options)?;
        let expires_at = self.expiry_from(input.expires_in);

        let options = input
            .options
            .into_iter()
            .map(|text| PollOption {
                id: self.id_gen.generate(),
                text,
                voters: std::collections::BTreeSet::new(),
            })
            .collect();

        self.create(
            user_id,
            ContentBody::Poll(PollBody {
                question: input.question,
                options,
                allow_multiple_answers: input.allow_multiple_answers,
                expires_at,
                votes: 0,
            }),
        )
        .await
    }

    /// Create a survey.
    pub async fn create_survey(
        &self,
        user_id: &str,
        input: CreateSurveyInput,
    ) -> AppResult<ContentItem> {
        self.validate_question(&input.question)?;
        self.validate_choices(&input.options)?;
        let expires_at = self.expiry_from(input.expires_in);

        let options = input
            .options
            .into_iter()
            .map(|text| SurveyOption {
                id: self.id_gen.generate(),
                text,
                votes: 0,
                voters: std::collections::BTreeSet::new(),
            })
            .collect();

        self.create(
            user_id,
            ContentBody::Survey(SurveyBody {
                question: input.question,
                options,
                allow_multiple_answers: input.allow_multiple_answers,
                expires_at,
            }),
        )
        .await
    }

    /// Get an item by ID.
    pub async fn get(&self, item_id: &str) -> AppResult<ContentItem> {
        self.repo.get(item_id).await
    }

    /// Delete an item by ID.
    pub async fn delete(&self, item_id: &str) -> AppResult<()> {
        self.repo.delete(item_id).await?;
        tracing::debug!(item_id = %item_id, "Deleted content item");
        Ok(())
    }

    async fn create(&self, user_id: &str, body: ContentBody) -> AppResult<ContentItem> {
        let item = ContentItem {
            id: self.id_gen.generate(),
            created_by: user_id.to_string(),
            reactions: vec![],
            views: 0,
            body,
            created_at: Utc::now(),
            updated_at: None,
        };

        self.repo.create(&item).await?;
        tracing::debug!(item_id = %item.id, kind = %item.kind(), user_id = %user_id, "Created content item");
        Ok(item)
    }

    fn validate_question(&self, question: &str) -> AppResult<()> {
        if question.trim().is_empty() {
            return Err(AppError::BadRequest("Question cannot be empty".to_string()));
        }
        if question.len() > Self::MAX_QUESTION_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Question is too long (max {} chars)",
                Self::MAX_QUESTION_LENGTH
            )));
        }
        Ok(())
    }

    fn validate_choices(&self, options: &[String]) -> AppResult<()> {
        if options.len() < 2 {
            return Err(AppError::BadRequest(
                "Must have at least 2 options".to_string(),
            ));
        }
        if options.len() > self.config.max_options {
            return Err(AppError::BadRequest(format!(
                "Cannot have more than {} options",
                self.config.max_options
            )));
        }
        for option in options {
            if option.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "Options cannot be empty".to_string(),
                ));
            }
            if option.len() > self.config.max_option_length {
                return Err(AppError::BadRequest(format!(
                    "Option is too long (max {} chars)",
                    self.config.max_option_length
                )));
            }
        }
        Ok(())
    }

    fn validate_caption(caption: Option<&str>) -> AppResult<()> {
        if caption.is_some_and(|c| c.len() > Self::MAX_CAPTION_LENGTH) {
            return Err(AppError::BadRequest(format!(
                "Caption is too long (max {} chars)",
                Self::MAX_CAPTION_LENGTH
            )));
        }
        Ok(())
    }

    fn expiry_from(&self, expires_in: Option<i64>) -> Option<DateTime<Utc>> {
        expires_in.map(|seconds| {
            let duration = Duration::seconds(seconds.min(self.config.max_vote_duration_secs));
            Utc::now() + duration
        })
    }
}
