//! Draft article payload.

use mpkit_core::MediaId;
use serde::{Deserialize, Serialize};

/// Article layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    /// Standard rich-text article.
    News,
    /// Image-first post.
    Newspic,
}

/// One article inside a draft.
///
/// Optional fields are omitted from the wire payload when unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Title.
    pub title: String,
    /// Body HTML.
    pub content: String,
    /// Cover image, a permanent material ID.
    pub thumb_media_id: MediaId,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Summary shown in share cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// "Read original" link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_source_url: Option<String>,
    /// 1 to open comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_open_comment: Option<u8>,
    /// 1 to restrict comments to followers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_fans_can_comment: Option<u8>,
    /// Layout, `news` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_type: Option<ArticleType>,
    /// Cover crop for the 2.35:1 slot, as `x1_y1_x2_y2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic_crop_235_1: Option<String>,
    /// Cover crop for the 1:1 slot, as `x1_y1_x2_y2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic_crop_1_1: Option<String>,
}

impl Article {
    /// Article with only the required fields set.
    pub fn simple(
        title: impl Into<String>,
        content: impl Into<String>,
        thumb_media_id: impl Into<MediaId>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            thumb_media_id: thumb_media_id.into(),
            author: None,
            digest: None,
            content_source_url: None,
            need_open_comment: None,
            only_fans_can_comment: None,
            article_type: None,
            pic_crop_235_1: None,
            pic_crop_1_1: None,
        }
    }

    /// Set the author. Empty strings leave it unset.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into()).filter(|a| !a.is_empty());
        self
    }

    /// Set the digest. Empty strings leave it unset.
    #[must_use]
    pub fn digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into()).filter(|d| !d.is_empty());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
