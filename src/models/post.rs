//! Community board posts.
//!
//! Replies are full posts with an empty title nested under their parent;
//! adding a reply re-saves the whole parent under the parent's id. The
//! service keeps no independent reply identity.

use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::auth::Principal;
use crate::utils::time::Nanos;

/// Board categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostCategory {
    Pregnancy,
    Newborn,
    Toddler,
    Vaccination,
    Feeding,
    MentalHealth,
}

impl PostCategory {
    /// All categories, in board display order.
    pub const ALL: [PostCategory; 6] = [
        PostCategory::Pregnancy,
        PostCategory::Newborn,
        PostCategory::Toddler,
        PostCategory::Vaccination,
        PostCategory::Feeding,
        PostCategory::MentalHealth,
    ];
}

/// A community post, or a reply when nested under another post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// Empty for replies.
    pub title: String,
    pub content: String,
    /// Display name of the author at posting time.
    pub author: String,
    #[serde(rename = "authorPrincipal")]
    pub author_principal: Principal,
    pub category: PostCategory,
    pub timestamp: Nanos,
    #[serde(default)]
    pub replies: Vec<Post>,
}

impl Post {
    /// A copy of this post with `reply` appended, ready to be re-saved
    /// under this post's id.
    pub fn with_reply(&self, reply: Post) -> Post {
        let mut updated = self.clone();
        updated.replies.push(reply);
        updated
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Validate a top-level post and its replies.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content"));
        }
        for reply in &self.replies {
            reply.validate_reply()?;
        }
        Ok(())
    }

    fn validate_reply(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, title: &str, content: &str) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author: "Asha".to_string(),
            author_principal: Principal::new("principal-asha"),
            category: PostCategory::Pregnancy,
            timestamp: Nanos(1),
            replies: Vec::new(),
        }
    }

    #[test]
    fn test_with_reply_appends() {
        let parent = post("post_1", "Sleep tips?", "Any advice for night feeds?");
        let reply = post("reply_1", "", "Short naps in the day helped us.");
        let updated = parent.with_reply(reply);

        assert_eq!(parent.reply_count(), 0);
        assert_eq!(updated.reply_count(), 1);
        assert_eq!(updated.id, parent.id);
    }

    #[test]
    fn test_validate_top_level() {
        assert!(post("post_1", "Title", "Body").validate().is_ok());
        assert!(post("post_1", "", "Body").validate().is_err());
        assert!(post("post_1", "Title", " ").validate().is_err());
    }

    #[test]
    fn test_reply_title_may_be_empty() {
        let parent =
            post("post_1", "Title", "Body").with_reply(post("reply_1", "", "A reply body"));
        assert!(parent.validate().is_ok());

        let bad = post("post_1", "Title", "Body").with_reply(post("reply_2", "", ""));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&PostCategory::MentalHealth).unwrap();
        assert_eq!(json, "\"mentalHealth\"");
        let json = serde_json::to_string(&PostCategory::Pregnancy).unwrap();
        assert_eq!(json, "\"pregnancy\"");
    }
}
