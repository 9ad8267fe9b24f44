//! # mpkit
//!
//! Command-line front end for a WeChat official account: token status,
//! drafts and publishing, permanent materials, temporary media.
//!
//! Results print as pretty JSON on stdout; logs go to stderr.

#![deny(unsafe_code)]

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mpkit_auth::{AppIdentity, CredentialManager, TokenConfig};
use mpkit_client::{ApiGateway, build_http_client};
use mpkit_content::{MaterialKind, MediaType};

/// WeChat official-account client.
#[derive(Parser, Debug)]
#[command(name = "mpkit", version, about = "WeChat official-account client")]
struct Cli {
    /// Application ID (falls back to `WECHAT_APPID`).
    #[arg(long, global = true)]
    app_id: Option<String>,

    /// Application secret (falls back to `WECHAT_APPSECRET`).
    #[arg(long, global = true)]
    app_secret: Option<String>,

    /// `.env` file to load. Without it, `.env` is searched upward from the
    /// current directory.
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Directory holding the token cache file.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `mpkit_client=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show access token status, refreshing if needed.
    Token {
        /// Fetch a new token even if the cached one is still usable.
        #[arg(long)]
        force: bool,
    },
    /// Draft box and publishing.
    #[command(subcommand)]
    Draft(DraftCommand),
    /// Permanent materials.
    #[command(subcommand)]
    Material(MaterialCommand),
    /// Temporary media.
    #[command(subcommand)]
    Media(MediaCommand),
}

#[derive(Subcommand, Debug)]
enum DraftCommand {
    /// Number of drafts.
    Count,
    /// List drafts.
    List {
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Page size, 1 to 20.
        #[arg(long, default_value_t = 20)]
        count: u32,
        /// Omit article bodies.
        #[arg(long)]
        no_content: bool,
    },
    /// Show one draft.
    Get { media_id: String },
    /// Delete a draft.
    Delete { media_id: String },
    /// Submit a draft for publishing.
    Publish { media_id: String },
    /// Poll a publish job.
    Status { publish_id: String },
    /// Show the draft box switch, or open it with `--open`.
    Switch {
        /// Enable the draft box. This cannot be undone.
        #[arg(long)]
        open: bool,
    },
}

#[derive(Subcommand, Debug)]
enum MaterialCommand {
    /// Totals per material kind.
    Count,
    /// List materials of one kind (image, voice, video, news).
    List {
        kind: MaterialKind,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Page size, 1 to 20.
        #[arg(long, default_value_t = 20)]
        count: u32,
    },
    /// Upload a permanent material (image, voice, video, thumb).
    Upload {
        media_type: MediaType,
        file: PathBuf,
        /// Video title. Defaults to the file name.
        #[arg(long)]
        title: Option<String>,
        /// Video introduction.
        #[arg(long)]
        introduction: Option<String>,
    },
    /// Upload an image for use inside article HTML and print its URL.
    Image { file: PathBuf },
    /// Download a permanent material.
    Download {
        media_id: String,
        /// Where to write the file.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Delete a permanent material.
    Delete { media_id: String },
}

#[derive(Subcommand, Debug)]
enum MediaCommand {
    /// Upload temporary media (image, voice, video, thumb). Expires after 3 days.
    Upload { media_type: MediaType, file: PathBuf },
    /// Download temporary media.
    Get {
        media_id: String,
        /// Where to write the file.
        #[arg(long, short)]
        output: PathBuf,
        /// Fetch the high-definition voice recorded through the JS SDK.
        #[arg(long)]
        hd_voice: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = mpkit_settings::load_env_file(cli.env_file.as_deref())
        .context("failed to load .env file")?;
    let mut settings = mpkit_settings::load_settings().context("failed to load settings")?;
    if let Some(dir) = &cli.cache_dir {
        settings.token.cache_dir = Some(dir.display().to_string());
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level.clone_from(level);
    }
    mpkit_core::logging::init_subscriber(&settings.logging.level);

    let identity = AppIdentity::resolve(cli.app_id, cli.app_secret)?;
    let http = build_http_client(&settings.api).context("failed to build HTTP client")?;
    let credentials = Arc::new(
        CredentialManager::new(identity, TokenConfig::from_settings(&settings))
            .with_http_client(http.clone()),
    );
    let gateway = Arc::new(
        ApiGateway::new(credentials.clone(), settings.api.base_url.clone()).with_http_client(http),
    );

    let output = commands::run(cli.command, &credentials, gateway).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mpkit", "token", "--force", "--app-id", "wx1"]).unwrap();
        assert_eq!(cli.app_id.as_deref(), Some("wx1"));
        assert!(matches!(cli.command, Command::Token { force: true }));
    }

    #[test]
    fn parses_material_upload() {
        let cli = Cli::try_parse_from([
            "mpkit", "material", "upload", "video", "clip.mp4", "--title", "Launch",
        ])
        .unwrap();
        match cli.command {
            Command::Material(MaterialCommand::Upload {
                media_type, title, ..
            }) => {
                assert_eq!(media_type, MediaType::Video);
                assert_eq!(title.as_deref(), Some("Launch"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_media_type() {
        assert!(Cli::try_parse_from(["mpkit", "media", "upload", "gif", "a.gif"]).is_err());
    }

    #[test]
    fn draft_list_defaults() {
        let cli = Cli::try_parse_from(["mpkit", "draft", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Draft(DraftCommand::List {
                offset: 0,
                count: 20,
                no_content: false
            })
        ));
    }
}
