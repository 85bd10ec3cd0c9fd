//! The `media` command: per-account and per-tag post collection.

use trendwatch_core::{write_records, AppConfig};
use trendwatch_social::{MediaClient, MediaCredentials};

pub async fn run(
    config: &AppConfig,
    username: Option<&str>,
    hashtag: Option<&str>,
    count: usize,
) -> anyhow::Result<()> {
    if username.is_none() && hashtag.is_none() {
        anyhow::bail!("provide --username and/or --hashtag");
    }

    // Fatal precondition: checked once, before any network activity.
    let (media_user, media_pass) = config.require_media_credentials()?;
    let client = MediaClient::with_base_url(
        MediaCredentials {
            username: media_user.to_owned(),
            password: media_pass.to_owned(),
        },
        config.request_timeout_secs,
        &config.user_agent,
        &config.media_api_url,
    )?;

    if let Some(username) = username {
        match client.user_posts(username, count).await {
            Ok(posts) => {
                let path = config.output_dir.join(format!("{username}_posts.tsv"));
                write_records(&path, &posts)?;
                println!("{} posts written to {}", posts.len(), path.display());
            }
            Err(e) => {
                tracing::error!(username, error = %e, "account collection failed — skipping target");
            }
        }
    }

    if let Some(hashtag) = hashtag {
        let tag = hashtag.trim_start_matches('#');
        match client.tag_posts(tag, count).await {
            Ok(posts) => {
                let path = config.output_dir.join(format!("{tag}_tag_posts.tsv"));
                write_records(&path, &posts)?;
                println!("{} tag posts written to {}", posts.len(), path.display());
            }
            Err(e) => {
                tracing::error!(tag, error = %e, "tag collection failed — skipping target");
            }
        }
    }

    Ok(())
}
