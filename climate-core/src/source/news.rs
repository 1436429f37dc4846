use async_trait::async_trait;
use reqwest::Client;
use roxmltree::{Document, Node, ParsingOptions};

use crate::{error::SourceError, model::NewsItem};

use super::{DataSource, SourceId, SourceQuery, get_text, prefix_chars};

pub const MAX_ITEMS: usize = 6;

/// Characters of `pubDate` kept for display, e.g. `Wed, 10 Jan 2024`.
pub const PUBLISHED_PREFIX: usize = 16;

/// Headlines from a climate RSS feed.
#[derive(Debug, Clone)]
pub struct NewsSource {
    http: Client,
    url: String,
    label: String,
}

impl NewsSource {
    pub fn new(http: Client, url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            label: label.into(),
        }
    }
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(str::trim)
}

/// Up to [`MAX_ITEMS`] items in document order. Items without a title are
/// skipped.
pub fn parse_items(xml: &str, source_label: &str) -> Result<Vec<NewsItem>, SourceError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;

    let items: Vec<NewsItem> = doc
        .descendants()
        .filter(|n| n.has_tag_name("item"))
        .filter_map(|item| {
            let title = child_text(item, "title").filter(|t| !t.is_empty())?;
            let published = child_text(item, "pubDate").unwrap_or_default();

            Some(NewsItem {
                title: title.to_string(),
                source_label: source_label.to_string(),
                published_at: prefix_chars(published, PUBLISHED_PREFIX).to_string(),
            })
        })
        .take(MAX_ITEMS)
        .collect();

    if items.is_empty() {
        return Err(SourceError::Empty);
    }

    Ok(items)
}

#[async_trait]
impl DataSource for NewsSource {
    type Output = Vec<NewsItem>;

    fn id(&self) -> SourceId {
        SourceId::News
    }

    async fn try_fetch(&self, _query: &SourceQuery) -> Result<Self::Output, SourceError> {
        let body = get_text(&self.http, &self.url, &[]).await?;
        parse_items(&body, &self.label)
    }
}
