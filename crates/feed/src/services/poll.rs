//! Poll voting service.

use agora_common::{AppError, AppResult};
use agora_store::entities::ContentItem;
use agora_store::ContentItemRepository;
use chrono::Utc;

/// Poll service for single-choice ballots.
#[derive(Clone)]
pub struct PollService {
    repo: ContentItemRepository,
}

/// Poll with the caller's vote status.
pub struct PollStatus {
    /// The poll item.
    pub item: ContentItem,
    /// Option IDs the caller currently selects.
    pub user_votes: Vec<String>,
    /// Whether voting has closed.
    pub is_expired: bool,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(repo: ContentItemRepository) -> Self {
        Self { repo }
    }

    /// Cast a vote on a poll.
    ///
    /// A voter holds at most one option at a time: the ballot is retracted
    /// from every option before the target option is selected, so repeating
    /// a vote is a no-op in effect and voting for a different option moves
    /// the ballot atomically. The cached total is recomputed from the voter
    /// sets in the same write.
    pub async fn vote(
        &self,
        item_id: &str,
        user_id: &str,
        option_id: &str,
    ) -> AppResult<ContentItem> {
        let now = Utc::now();

        let item = self
            .repo
            .mutate(item_id, |item| {
                let poll = item.as_poll_mut()?;

                if poll.is_expired(now) {
                    return Err(AppError::Expired(item_id.to_string()));
                }
                if poll.option(option_id).is_none() {
                    return Err(AppError::OptionNotFound(option_id.to_string()));
                }

                // Retract first: at most one removal actually occurs.
                for option in &mut poll.options {
                    option.voters.remove(user_id);
                }
                if let Some(option) = poll.option_mut(option_id) {
                    option.voters.insert(user_id.to_string());
                }
                poll.votes = poll.tally();
                Ok(())
            })
            .await?;

        tracing::debug!(item_id = %item_id, user_id = %user_id, option_id = %option_id, "Cast poll vote");
        Ok(item)
    }

    /// Get a poll with the caller's vote status.
    pub async fn status(&self, item_id: &str, user_id: Option<&str>) -> AppResult<PollStatus> {
        let item = self.repo.get(item_id).await?;

        let (user_votes, is_expired) = {
            let poll = item.as_poll()?;
            let user_votes = user_id.map(|uid| poll.selections(uid)).unwrap_or_default();
            (user_votes, poll.is_expired(Utc::now()))
        };

        Ok(PollStatus {
            item,
            user_votes,
            is_expired,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_store::entities::{ContentBody, PollBody, PollOption, TextBody};
    use agora_store::{ContentStore, MemoryContentStore};
    use chrono::{DateTime, Duration};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn create_test_poll(id: &str, expires_at: Option<DateTime<Utc>>) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            created_by: "author1".to_string(),
            reactions: vec![],
            views: 0,
            body: ContentBody::Poll(PollBody {
                question: "Where should the new bike racks go?".to_string(),
                options: vec![
                    PollOption {
                        id: "a".to_string(),
                        text: "Market square".to_string(),
                        voters: BTreeSet::new(),
                    },
                    PollOption {
                        id: "b".to_string(),
                        text: "Train station".to_string(),
                        voters: BTreeSet::new(),
                    },
                ],
                allow_multiple_answers: false,
                expires_at,
                votes: 0,
            }),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn create_test_text(id: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            created_by: "author1".to_string(),
            reactions: vec![],
            views: 0,
            body: ContentBody::Text(TextBody {
                text: "Test post".to_string(),
            }),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    async fn setup(items: &[ContentItem]) -> (Arc<MemoryContentStore>, PollService) {
        let store = Arc::new(MemoryContentStore::new());
        for item in items {
            store.insert(item).await.unwrap();
        }
        let service = PollService::new(ContentItemRepository::new(store.clone()));
        (store, service)
    }

    #[tokio::test]
    async fn test_vote_item_not_found() {
        let (_, service) = setup(&[]).await;

        let result = service.vote("nonexistent", "u1", "a").await;
        assert!(matches!(result, Err(AppError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_vote_on_text_item_fails() {
        let (_, service) = setup(&[create_test_text("item1")]).await;

        let result = service.vote("item1", "u1", "a").await;
        assert!(matches!(result, Err(AppError::InvalidVariant(_))));
    }

    #[tokio::test]
    async fn test_vote_option_not_found() {
        let (_, service) = setup(&[create_test_poll("poll1", None)]).await;

        let result = service.vote("poll1", "u1", "z").await;
        match result {
            Err(AppError::OptionNotFound(id)) => assert_eq!(id, "z"),
            _ => panic!("Expected OptionNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_vote_and_switch() {
        let (_, service) = setup(&[create_test_poll("poll1", None)]).await;

        // First vote lands on option a.
        let item = service.vote("poll1", "u1", "a").await.unwrap();
        let poll = item.as_poll().unwrap();
        assert!(poll.option("a").unwrap().voters.contains("u1"));
        assert!(poll.option("b").unwrap().voters.is_empty());
        assert_eq!(poll.votes, 1);

        // Switching moves the ballot without inflating the total.
        let item = service.vote("poll1", "u1", "b").await.unwrap();
        let poll = item.as_poll().unwrap();
        assert!(poll.option("a").unwrap().voters.is_empty());
        assert!(poll.option("b").unwrap().voters.contains("u1"));
        assert_eq!(poll.votes, 1);
    }

    #[tokio::test]
    async fn test_vote_repeated_is_noop_in_effect() {
        let (_, service) = setup(&[create_test_poll("poll1", None)]).await;

        let first = service.vote("poll1", "u1", "a").await.unwrap();
        let second = service.vote("poll1", "u1", "a").await.unwrap();

        let first_poll = first.as_poll().unwrap();
        let second_poll = second.as_poll().unwrap();
        assert_eq!(first_poll.options, second_poll.options);
        assert_eq!(second_poll.votes, 1);
    }

    #[tokio::test]
    async fn test_voter_appears_at_most_once() {
        let (_, service) = setup(&[create_test_poll("poll1", None)]).await;

        service.vote("poll1", "u1", "a").await.unwrap();
        service.vote("poll1", "u2", "a").await.unwrap();
        let item = service.vote("poll1", "u1", "b").await.unwrap();

        let poll = item.as_poll().unwrap();
        let u1_total: usize = poll
            .options
            .iter()
            .filter(|o| o.voters.contains("u1"))
            .count();
        assert_eq!(u1_total, 1);
        assert_eq!(poll.votes, poll.tally());
        assert_eq!(poll.votes, 2);
    }

    #[tokio::test]
    async fn test_vote_on_expired_poll_leaves_item_unchanged() {
        let expired = Utc::now() - Duration::hours(1);
        let (store, service) = setup(&[create_test_poll("poll1", Some(expired))]).await;

        let before = store.get("poll1").await.unwrap().unwrap();

        let result = service.vote("poll1", "u1", "a").await;
        match result {
            Err(AppError::Expired(id)) => assert_eq!(id, "poll1"),
            _ => panic!("Expected Expired error"),
        }

        let after = store.get("poll1").await.unwrap().unwrap();
        assert_eq!(after.value, before.value);
        assert_eq!(after.version, before.version);
    }

    #[tokio::test]
    async fn test_status_reports_selections_and_expiry() {
        let (_, service) = setup(&[create_test_poll("poll1", None)]).await;

        service.vote("poll1", "u1", "b").await.unwrap();

        let status = service.status("poll1", Some("u1")).await.unwrap();
        assert_eq!(status.user_votes, vec!["b".to_string()]);
        assert!(!status.is_expired);

        let anonymous = service.status("poll1", None).await.unwrap();
        assert!(anonymous.user_votes.is_empty());
    }

    #[tokio::test]
    async fn test_status_on_text_item_fails() {
        let (_, service) = setup(&[create_test_text("item1")]).await;

        let result = service.status("item1", None).await;
        assert!(matches!(result, Err(AppError::InvalidVariant(_))));
    }
}
