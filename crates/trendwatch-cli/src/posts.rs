//! The `posts` command: recent-search queries against the search API.
//!
//! The bearer token is a fatal precondition checked before any request; a
//! failed search request afterwards is logged and yields an empty artifact
//! for that query only.

use trendwatch_core::{write_records, AppConfig};
use trendwatch_social::{SearchClient, SearchItem, SearchQuery};

pub async fn run(
    config: &AppConfig,
    username: Option<&str>,
    hashtags: &[String],
    max_results: u32,
) -> anyhow::Result<()> {
    if username.is_none() && hashtags.is_empty() {
        anyhow::bail!("provide --username and/or --hashtags");
    }

    let token = config.require_bearer_token()?;
    let client = SearchClient::with_base_url(
        token,
        config.request_timeout_secs,
        &config.user_agent,
        &config.search_api_url,
    )?;

    if let Some(username) = username {
        let query = SearchQuery::mentions(username)?;
        let items = search_or_empty(&client, &query, max_results).await;
        let stem = username.trim_start_matches('@');
        let path = config.output_dir.join(format!("{stem}_mentions.tsv"));
        write_records(&path, &items)?;
        println!("{} mentions written to {}", items.len(), path.display());
    }

    if !hashtags.is_empty() {
        let query = SearchQuery::hashtags(hashtags)?;
        let items = search_or_empty(&client, &query, max_results).await;
        let path = config.output_dir.join("hashtag_posts.tsv");
        write_records(&path, &items)?;
        println!(
            "{} hashtag posts written to {}",
            items.len(),
            path.display()
        );
    }

    Ok(())
}

async fn search_or_empty(
    client: &SearchClient,
    query: &SearchQuery,
    max_results: u32,
) -> Vec<SearchItem> {
    match client.search(query, max_results).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(query = query.as_str(), error = %e, "search request failed — continuing with no results");
            Vec::new()
        }
    }
}
