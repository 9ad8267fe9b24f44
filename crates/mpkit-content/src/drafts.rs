//! Draft box and publishing.
//!
//! Drafts are created from one or more [`Article`]s and identified by a
//! `media_id`. Publishing a draft is asynchronous on the remote side: submit
//! returns a `publish_id` that is polled with [`DraftManager::publish_status`].

use std::sync::Arc;

use mpkit_client::{ApiError, ApiGateway};
use mpkit_core::{ArticleId, MediaId, PublishId};
use serde_json::{Value, json};
use tracing::info;

use crate::article::Article;
use crate::response::{clamp_page_size, id_field, u64_field};

/// Draft and publishing operations.
#[derive(Clone)]
pub struct DraftManager {
    gateway: Arc<ApiGateway>,
}

impl DraftManager {
    /// Manager issuing calls through `gateway`.
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Create a draft and return its `media_id`.
    pub async fn create_draft(&self, articles: &[Article]) -> Result<MediaId, ApiError> {
        if articles.is_empty() {
            return Err(ApiError::InvalidRequest(
                "a draft needs at least one article".into(),
            ));
        }
        let result = self
            .gateway
            .post_json("/cgi-bin/draft/add", json!({ "articles": articles }))
            .await?;
        let media_id = MediaId::from(id_field(&result, "media_id")?);
        info!(%media_id, articles = articles.len(), "draft created");
        Ok(media_id)
    }

    /// Fetch a draft, including its `news_item` list.
    pub async fn get_draft(&self, media_id: &MediaId) -> Result<Value, ApiError> {
        self.gateway
            .post_json("/cgi-bin/draft/get", json!({ "media_id": media_id }))
            .await
    }

    /// Replace the article at `index` (0-based) inside a draft.
    pub async fn update_draft(
        &self,
        media_id: &MediaId,
        index: u32,
        article: &Article,
    ) -> Result<(), ApiError> {
        let _ = self
            .gateway
            .post_json(
                "/cgi-bin/draft/update",
                json!({ "media_id": media_id, "index": index, "articles": article }),
            )
            .await?;
        Ok(())
    }

    /// Delete a draft.
    pub async fn delete_draft(&self, media_id: &MediaId) -> Result<(), ApiError> {
        let _ = self
            .gateway
            .post_json("/cgi-bin/draft/delete", json!({ "media_id": media_id }))
            .await?;
        Ok(())
    }

    /// List drafts. `count` outside 1..=20 is treated as 20.
    pub async fn list_drafts(
        &self,
        offset: u32,
        count: u32,
        no_content: bool,
    ) -> Result<Value, ApiError> {
        self.gateway
            .post_json("/cgi-bin/draft/batchget", page_body(offset, count, no_content))
            .await
    }

    /// Number of drafts.
    pub async fn draft_count(&self) -> Result<u64, ApiError> {
        let result = self.gateway.get("/cgi-bin/draft/count", &[]).await?;
        u64_field(&result, "total_count")
    }

    /// Whether the draft box has been enabled for this account.
    pub async fn draft_switch_status(&self) -> Result<bool, ApiError> {
        let result = self
            .gateway
            .post_json("/cgi-bin/draft/switch", json!({ "checkonly": 1 }))
            .await?;
        Ok(result.get("is_open").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Enable the draft box. The remote switch cannot be turned back off.
    pub async fn open_draft_switch(&self) -> Result<(), ApiError> {
        let _ = self
            .gateway
            .post_json("/cgi-bin/draft/switch", json!({ "checkonly": 0 }))
            .await?;
        info!("draft box switch opened");
        Ok(())
    }

    /// Submit a draft for publishing and return the `publish_id`.
    pub async fn publish_draft(&self, media_id: &MediaId) -> Result<PublishId, ApiError> {
        let result = self
            .gateway
            .post_json("/cgi-bin/freepublish/submit", json!({ "media_id": media_id }))
            .await?;
        let publish_id = PublishId::from(id_field(&result, "publish_id")?);
        info!(%media_id, %publish_id, "draft submitted for publishing");
        Ok(publish_id)
    }

    /// Poll a publish job.
    ///
    /// `publish_status`: 0 published, 1 publishing, 2 originality check
    /// failed, 3 failed, 4 rejected by review, 5 deleted after publishing.
    pub async fn publish_status(&self, publish_id: &PublishId) -> Result<Value, ApiError> {
        self.gateway
            .post_json("/cgi-bin/freepublish/get", json!({ "publish_id": publish_id }))
            .await
    }

    /// Fetch a published article.
    pub async fn published_article(&self, article_id: &ArticleId) -> Result<Value, ApiError> {
        self.gateway
            .post_json(
                "/cgi-bin/freepublish/getarticle",
                json!({ "article_id": article_id }),
            )
            .await
    }

    /// List published articles. `count` outside 1..=20 is treated as 20.
    pub async fn list_published(
        &self,
        offset: u32,
        count: u32,
        no_content: bool,
    ) -> Result<Value, ApiError> {
        self.gateway
            .post_json(
                "/cgi-bin/freepublish/batchget",
                page_body(offset, count, no_content),
            )
            .await
    }

    /// Delete a published article. `index` selects one item of a multi-article
    /// post; 0 deletes the whole post.
    pub async fn delete_published(&self, article_id: &ArticleId, index: u32) -> Result<(), ApiError> {
        let _ = self
            .gateway
            .post_json(
                "/cgi-bin/freepublish/delete",
                json!({ "article_id": article_id, "index": index }),
            )
            .await?;
        Ok(())
    }
}

fn page_body(offset: u32, count: u32, no_content: bool) -> Value {
    json!({
        "offset": offset,
        "count": clamp_page_size(count),
        "no_content": u8::from(no_content),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_body_shape() {
        assert_eq!(
            page_body(5, 50, true),
            json!({"offset": 5, "count": 20, "no_content": 1})
        );
        assert_eq!(
            page_body(0, 3, false),
            json!({"offset": 0, "count": 3, "no_content": 0})
        );
    }
}
