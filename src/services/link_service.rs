//! Link management service
//!
//! Validation and listing logic shared by the admin and redirect handlers.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::analytics::HitLog;
use crate::errors::{LinktrackError, Result};
use crate::storage::{HitType, Link, LinkStore};
use crate::utils::validation::{is_valid_slug, validate_destination};

/// Link listing entry with its redirect hit count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkWithHits {
    pub slug: String,
    pub destination: String,
    pub hits: usize,
}

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    hits: HitLog,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, hits: HitLog) -> Self {
        Self { store, hits }
    }

    /// Destination for a slug
    pub async fn resolve(&self, slug: &str) -> Option<String> {
        self.store.get(slug).await
    }

    /// Create or overwrite a link
    ///
    /// Missing fields, an unusable slug or a non-http(s) destination are
    /// validation errors.
    pub async fn create_link(
        &self,
        slug: Option<&str>,
        destination: Option<&str>,
    ) -> Result<Link> {
        let (Some(slug), Some(destination)) = (
            slug.map(str::trim).filter(|s| !s.is_empty()),
            destination.map(str::trim).filter(|s| !s.is_empty()),
        ) else {
            return Err(LinktrackError::validation(
                "slug and destination are required",
            ));
        };

        if !is_valid_slug(slug) {
            return Err(LinktrackError::validation(
                "slug may only contain letters, digits, '-', '_' and '.'",
            ));
        }
        validate_destination(destination).map_err(LinktrackError::validation)?;

        match self.store.set(slug, destination).await? {
            Some(previous) => info!(
                "Link updated: {} -> {} (was {})",
                slug, destination, previous
            ),
            None => info!("Link created: {} -> {}", slug, destination),
        }

        Ok(Link {
            slug: slug.to_string(),
            destination: destination.to_string(),
        })
    }

    pub async fn delete_link(&self, slug: &str) -> Result<()> {
        self.store.remove(slug).await
    }

    /// All links with their redirect hit counts (one scan of the hit log per link)
    pub async fn list_links(&self) -> Vec<LinkWithHits> {
        self.store
            .list()
            .await
            .into_iter()
            .map(|link| LinkWithHits {
                hits: self.hits.count_for(&link.slug, HitType::Redirect),
                slug: link.slug,
                destination: link.destination,
            })
            .collect()
    }

    pub async fn link_count(&self) -> usize {
        self.store.count().await
    }
}
