//! Permanent and temporary media.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use mpkit_client::{ApiError, ApiGateway};
use mpkit_core::MediaId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::response::{clamp_page_size, id_field};

/// Multipart field every media upload uses.
const MEDIA_FIELD: &str = "media";

/// Uploadable media kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Image.
    Image,
    /// Voice clip.
    Voice,
    /// Video.
    Video,
    /// Thumbnail.
    Thumb,
}

impl MediaType {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Voice => "voice",
            Self::Video => "video",
            Self::Thumb => "thumb",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "voice" => Ok(Self::Voice),
            "video" => Ok(Self::Video),
            "thumb" => Ok(Self::Thumb),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// Permanent material kinds accepted by listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Images.
    Image,
    /// Voice clips.
    Voice,
    /// Videos.
    Video,
    /// Legacy news articles.
    News,
}

impl MaterialKind {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Voice => "voice",
            Self::Video => "video",
            Self::News => "news",
        }
    }
}

impl FromStr for MaterialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "voice" => Ok(Self::Voice),
            "video" => Ok(Self::Video),
            "news" => Ok(Self::News),
            other => Err(format!("unknown material kind: {other}")),
        }
    }
}

/// Title and introduction sent with a permanent video upload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoDescription {
    /// Title. Defaults to the file stem.
    pub title: Option<String>,
    /// Introduction. Defaults to empty.
    pub introduction: Option<String>,
}

/// Permanent material totals per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialCount {
    /// Voice clips.
    pub voice_count: u64,
    /// Videos.
    pub video_count: u64,
    /// Images.
    pub image_count: u64,
    /// News articles.
    pub news_count: u64,
}

/// Result of a temporary upload. Temporary media expire after three days.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryMedia {
    /// Media ID.
    pub media_id: MediaId,
    /// Media type reported by the server, or the requested one.
    #[serde(rename = "type")]
    pub media_type: String,
    /// Upload time in seconds since the Unix epoch.
    pub created_at: Option<i64>,
}

/// Permanent and temporary media operations.
#[derive(Clone)]
pub struct MaterialManager {
    gateway: Arc<ApiGateway>,
}

impl MaterialManager {
    /// Manager issuing calls through `gateway`.
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Upload a permanent material and return its `media_id`.
    ///
    /// Video uploads carry a JSON `description`; `video` is ignored for other types.
    pub async fn upload_permanent(
        &self,
        media_type: MediaType,
        file: &Path,
        video: Option<&VideoDescription>,
    ) -> Result<MediaId, ApiError> {
        let mut fields = vec![("type".to_string(), media_type.as_str().to_string())];
        if media_type == MediaType::Video {
            fields.push(("description".to_string(), video_description(file, video)?));
        }

        let result = self
            .gateway
            .upload_file("/cgi-bin/material/add_material", file, MEDIA_FIELD, fields)
            .await?;
        let media_id = MediaId::from(id_field(&result, "media_id")?);
        info!(%media_id, %media_type, "permanent material uploaded");
        Ok(media_id)
    }

    /// Upload an image for use inside article HTML and return its URL.
    pub async fn upload_article_image(&self, file: &Path) -> Result<String, ApiError> {
        let result = self
            .gateway
            .upload_file("/cgi-bin/media/uploadimg", file, MEDIA_FIELD, Vec::new())
            .await?;
        id_field(&result, "url")
    }

    /// Fetch a permanent material's metadata as JSON.
    ///
    /// News and video materials answer with JSON. Use
    /// [`download_material`](Self::download_material) for binary kinds.
    pub async fn get_material(&self, media_id: &MediaId) -> Result<Value, ApiError> {
        self.gateway
            .post_json(
                "/cgi-bin/material/get_material",
                json!({ "media_id": media_id }),
            )
            .await
    }

    /// Download a permanent material, optionally writing it to `save_to`.
    pub async fn download_material(
        &self,
        media_id: &MediaId,
        save_to: Option<&Path>,
    ) -> Result<Bytes, ApiError> {
        let body = json!({ "media_id": media_id });
        let content = self
            .gateway
            .download_binary("/cgi-bin/material/get_material", &[], Some(&body))
            .await?;
        save(&content, save_to).await?;
        Ok(content)
    }

    /// Delete a permanent material.
    pub async fn delete_material(&self, media_id: &MediaId) -> Result<(), ApiError> {
        let _ = self
            .gateway
            .post_json(
                "/cgi-bin/material/del_material",
                json!({ "media_id": media_id }),
            )
            .await?;
        info!(%media_id, "permanent material deleted");
        Ok(())
    }

    /// Totals per material kind.
    pub async fn material_count(&self) -> Result<MaterialCount, ApiError> {
        let result = self
            .gateway
            .get("/cgi-bin/material/get_materialcount", &[])
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// List permanent materials of one kind. `count` outside 1..=20 is treated as 20.
    pub async fn list_materials(
        &self,
        kind: MaterialKind,
        offset: u32,
        count: u32,
    ) -> Result<Value, ApiError> {
        self.gateway
            .post_json(
                "/cgi-bin/material/batchget_material",
                json!({
                    "type": kind.as_str(),
                    "offset": offset,
                    "count": clamp_page_size(count),
                }),
            )
            .await
    }

    /// Upload a temporary media file.
    pub async fn upload_temporary(
        &self,
        media_type: MediaType,
        file: &Path,
    ) -> Result<TemporaryMedia, ApiError> {
        let result = self
            .gateway
            .upload_file(
                "/cgi-bin/media/upload",
                file,
                MEDIA_FIELD,
                vec![("type".to_string(), media_type.as_str().to_string())],
            )
            .await?;

        Ok(TemporaryMedia {
            media_id: MediaId::from(id_field(&result, "media_id")?),
            media_type: result
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or(media_type.as_str())
                .to_string(),
            created_at: result.get("created_at").and_then(Value::as_i64),
        })
    }

    /// Download a temporary media file, optionally writing it to `save_to`.
    pub async fn get_temporary(
        &self,
        media_id: &MediaId,
        save_to: Option<&Path>,
    ) -> Result<Bytes, ApiError> {
        let content = self
            .gateway
            .download_binary("/cgi-bin/media/get", &[("media_id", media_id.as_str())], None)
            .await?;
        save(&content, save_to).await?;
        Ok(content)
    }

    /// Download a high-definition voice clip recorded through the JS SDK.
    pub async fn get_hd_voice(
        &self,
        media_id: &MediaId,
        save_to: Option<&Path>,
    ) -> Result<Bytes, ApiError> {
        let content = self
            .gateway
            .download_binary(
                "/cgi-bin/media/get/jssdk",
                &[("media_id", media_id.as_str())],
                None,
            )
            .await?;
        save(&content, save_to).await?;
        Ok(content)
    }
}

fn video_description(file: &Path, video: Option<&VideoDescription>) -> Result<String, ApiError> {
    let title = video
        .and_then(|v| v.title.clone())
        .filter(|t| !t.is_empty())
        .or_else(|| file.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let introduction = video
        .and_then(|v| v.introduction.clone())
        .unwrap_or_default();
    Ok(serde_json::to_string(
        &json!({ "title": title, "introduction": introduction }),
    )?)
}

async fn save(content: &Bytes, save_to: Option<&Path>) -> Result<(), ApiError> {
    if let Some(path) = save_to {
        tokio::fs::write(path, content).await?;
        debug!(path = %path.display(), size = content.len(), "saved media");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
