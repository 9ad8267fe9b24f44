//! Subcommand dispatch.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use mpkit_auth::CredentialManager;
use mpkit_client::ApiGateway;
use mpkit_content::{DraftManager, MaterialManager, VideoDescription};
use mpkit_core::{Clock, MediaId, PublishId, SystemClock};
use serde_json::{Value, json};

use crate::{Command, DraftCommand, MaterialCommand, MediaCommand};

/// Characters of the token shown by `mpkit token`.
const TOKEN_PREVIEW_CHARS: usize = 8;

pub(crate) async fn run(
    command: Command,
    credentials: &CredentialManager,
    gateway: Arc<ApiGateway>,
) -> Result<Value> {
    match command {
        Command::Token { force } => token(credentials, force).await,
        Command::Draft(cmd) => draft(DraftManager::new(gateway), cmd).await,
        Command::Material(cmd) => material(MaterialManager::new(gateway), cmd).await,
        Command::Media(cmd) => media(MaterialManager::new(gateway), cmd).await,
    }
}

async fn token(credentials: &CredentialManager, force: bool) -> Result<Value> {
    let token = credentials
        .get_token(force)
        .await
        .context("failed to obtain access token")?;
    let expires_at = credentials.expires_at().await;
    Ok(json!({
        "appid": credentials.app_id(),
        "token": token_preview(&token),
        "expires_at": expires_at,
        "expires_in": expires_at - SystemClock.now_secs(),
    }))
}

async fn draft(drafts: DraftManager, cmd: DraftCommand) -> Result<Value> {
    let value = match cmd {
        DraftCommand::Count => json!({ "total_count": drafts.draft_count().await? }),
        DraftCommand::List {
            offset,
            count,
            no_content,
        } => drafts.list_drafts(offset, count, no_content).await?,
        DraftCommand::Get { media_id } => drafts.get_draft(&MediaId::from(media_id)).await?,
        DraftCommand::Delete { media_id } => {
            drafts.delete_draft(&MediaId::from(media_id.clone())).await?;
            json!({ "deleted": media_id })
        }
        DraftCommand::Publish { media_id } => {
            let publish_id = drafts.publish_draft(&MediaId::from(media_id)).await?;
            json!({ "publish_id": publish_id })
        }
        DraftCommand::Status { publish_id } => {
            drafts.publish_status(&PublishId::from(publish_id)).await?
        }
        DraftCommand::Switch { open } => {
            if open {
                drafts.open_draft_switch().await?;
            }
            json!({ "is_open": drafts.draft_switch_status().await? })
        }
    };
    Ok(value)
}

async fn material(materials: MaterialManager, cmd: MaterialCommand) -> Result<Value> {
    let value = match cmd {
        MaterialCommand::Count => serde_json::to_value(materials.material_count().await?)?,
        MaterialCommand::List {
            kind,
            offset,
            count,
        } => materials.list_materials(kind, offset, count).await?,
        MaterialCommand::Upload {
            media_type,
            file,
            title,
            introduction,
        } => {
            let video = VideoDescription {
                title,
                introduction,
            };
            let media_id = materials
                .upload_permanent(media_type, &file, Some(&video))
                .await?;
            json!({ "media_id": media_id })
        }
        MaterialCommand::Image { file } => {
            json!({ "url": materials.upload_article_image(&file).await? })
        }
        MaterialCommand::Download { media_id, output } => {
            let content = materials
                .download_material(&MediaId::from(media_id), Some(&output))
                .await?;
            saved(&output, content.len())
        }
        MaterialCommand::Delete { media_id } => {
            materials
                .delete_material(&MediaId::from(media_id.clone()))
                .await?;
            json!({ "deleted": media_id })
        }
    };
    Ok(value)
}

async fn media(materials: MaterialManager, cmd: MediaCommand) -> Result<Value> {
    let value = match cmd {
        MediaCommand::Upload { media_type, file } => {
            serde_json::to_value(materials.upload_temporary(media_type, &file).await?)?
        }
        MediaCommand::Get {
            media_id,
            output,
            hd_voice,
        } => {
            let media_id = MediaId::from(media_id);
            let content = if hd_voice {
                materials.get_hd_voice(&media_id, Some(&output)).await?
            } else {
                materials.get_temporary(&media_id, Some(&output)).await?
            };
            saved(&output, content.len())
        }
    };
    Ok(value)
}

fn saved(path: &Path, bytes: usize) -> Value {
    json!({ "saved_to": path.display().to_string(), "bytes": bytes })
}

/// First few characters of a token followed by an ellipsis.
fn token_preview(token: &str) -> String {
    let head: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    if head.len() < token.len() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_preview_truncates() {
        assert_eq!(token_preview("ABCDEFGHIJKL"), "ABCDEFGH...");
    }

    #[test]
    fn short_token_is_shown_whole() {
        assert_eq!(token_preview("ABC"), "ABC");
    }

    #[test]
    fn saved_summary() {
        assert_eq!(
            saved(Path::new("/tmp/a.jpg"), 3),
            json!({"saved_to": "/tmp/a.jpg", "bytes": 3})
        );
    }
}
