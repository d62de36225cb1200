//! Reaction service.

use agora_common::AppResult;
use agora_store::entities::{ContentItem, Reaction};
use agora_store::ContentItemRepository;

/// Reaction service for per-item reaction toggling.
#[derive(Clone)]
pub struct ReactionService {
    repo: ContentItemRepository,
}

impl ReactionService {
    /// System default reaction emoji (fallback when user has no default set).
    const DEFAULT_LIKE_EMOJI: &'static str = "👍";

    /// Create a new reaction service.
    #[must_use]
    pub const fn new(repo: ContentItemRepository) -> Self {
        Self { repo }
    }

    /// Like an item using the user's default reaction or system default.
    ///
    /// This is the "one-button like" feature: it uses the user's configured
    /// default reaction if set, otherwise falls back to 👍.
    pub async fn like(
        &self,
        item_id: &str,
        user_id: &str,
        default_reaction: Option<&str>,
    ) -> AppResult<ContentItem> {
        let reaction = default_reaction.unwrap_or(Self::DEFAULT_LIKE_EMOJI);
        self.toggle(item_id, user_id, reaction).await
    }

    /// Toggle a user's reaction on an item.
    ///
    /// A first reaction is appended, repeating the same reaction removes it,
    /// and a different reaction replaces the existing one, so a user holds
    /// at most one reaction per item. The whole transition runs in one
    /// conditional write; concurrent togglers on the same item serialize
    /// through the store.
    pub async fn toggle(
        &self,
        item_id: &str,
        user_id: &str,
        reaction: &str,
    ) -> AppResult<ContentItem> {
        let reaction = Self::normalize_reaction(reaction);

        let item = self
            .repo
            .mutate(item_id, |item| {
                match item
                    .reactions
                    .iter()
                    .position(|r| r.user_id == user_id)
                {
                    // Same reaction again: toggle off.
                    Some(i) if item.reactions[i].reaction == reaction => {
                        item.reactions.remove(i);
                    }
                    // Different reaction: switch.
                    Some(i) => {
                        item.reactions[i].reaction = reaction.clone();
                    }
                    None => {
                        item.reactions.push(Reaction {
                            user_id: user_id.to_string(),
                            reaction: reaction.clone(),
                        });
                    }
                }
                Ok(())
            })
            .await?;

        tracing::debug!(item_id = %item_id, user_id = %user_id, reaction = %reaction, "Toggled reaction");
        Ok(item)
    }

    /// Get reactions on an item.
    pub async fn get_reactions(&self, item_id: &str) -> AppResult<Vec<Reaction>> {
        Ok(self.repo.get(item_id).await?.reactions)
    }

    /// Normalize a reaction string.
    fn normalize_reaction(reaction: &str) -> String {
        // If it's a custom emoji format like :emoji:, keep as-is
        if reaction.starts_with(':') && reaction.ends_with(':') && reaction.len() > 2 {
            return reaction.to_string();
        }

        // If it looks like a Unicode emoji, keep as-is
        if !reaction.is_ascii() {
            return reaction.to_string();
        }

        // Default to a star for invalid reactions
        "\u{2B50}".to_string() // Star emoji
    }
}
