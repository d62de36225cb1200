//! Survey voting service.

use agora_common::{AppError, AppResult};
use agora_store::entities::ContentItem;
use agora_store::ContentItemRepository;
use chrono::Utc;

/// Survey service for whole-ballot voting.
#[derive(Clone)]
pub struct SurveyService {
    repo: ContentItemRepository,
}

/// Survey with the caller's vote status.
pub struct SurveyStatus {
    /// The survey item.
    pub item: ContentItem,
    /// Option IDs the caller currently selects.
    pub user_votes: Vec<String>,
    /// Whether voting has closed.
    pub is_expired: bool,
}

impl SurveyService {
    /// Create a new survey service.
    #[must_use]
    pub const fn new(repo: ContentItemRepository) -> Self {
        Self { repo }
    }

    /// Cast a ballot on a survey.
    ///
    /// The user's previous ballot is fully retracted (decrementing each
    /// affected option's cached count) before the new selection is applied,
    /// all in one write. Re-submitting the same selection is a no-op in end
    /// state; an empty selection retracts the ballot entirely. Surveys with
    /// `allow_multiple_answers` unset reject ballots of more than one
    /// option.
    pub async fn vote(
        &self,
        item_id: &str,
        user_id: &str,
        option_ids: &[String],
    ) -> AppResult<ContentItem> {
        let now = Utc::now();

        let item = self
            .repo
            .mutate(item_id, |item| {
                let survey = item.as_survey_mut()?;

                if survey.is_expired(now) {
                    return Err(AppError::Expired(item_id.to_string()));
                }
                if !survey.allow_multiple_answers && option_ids.len() > 1 {
                    return Err(AppError::MultipleAnswersNotAllowed);
                }
                if let Some(missing) = option_ids
                    .iter()
                    .find(|id| survey.option(id.as_str()).is_none())
                {
                    return Err(AppError::OptionNotFound(missing.clone()));
                }

                // Retract the prior ballot, keeping each cache in step with
                // its voter set.
                for option in &mut survey.options {
                    if option.voters.remove(user_id) {
                        option.votes = option.votes.saturating_sub(1);
                    }
                }

                // Apply the new selection. The insert guard makes duplicate
                // IDs in one ballot count once.
                for option_id in option_ids {
                    if let Some(option) = survey.option_mut(option_id) {
                        if option.voters.insert(user_id.to_string()) {
                            option.votes += 1;
                        }
                    }
                }
                Ok(())
            })
            .await?;

        tracing::debug!(
            item_id = %item_id,
            user_id = %user_id,
            selected = option_ids.len(),
            "Cast survey ballot"
        );
        Ok(item)
    }

    /// Get a survey with the caller's vote status.
    pub async fn status(&self, item_id: &str, user_id: Option<&str>) -> AppResult<SurveyStatus> {
        let item = self.repo.get(item_id).await?;

        let (user_votes, is_expired) = {
            let survey = item.as_survey()?;
            let user_votes = user_id.map(|uid| survey.selections(uid)).unwrap_or_default();
            (user_votes, survey.is_expired(Utc::now()))
        };

        Ok(SurveyStatus {
            item,
            user_votes,
            is_expired,
        })
    }
}
