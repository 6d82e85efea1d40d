use std::fmt;
use std::sync::Arc;

use tracing::debug;
use validator::Validate;

use crate::cache::ListingCache;
use crate::disk::{DiskApi, DiskError, DiskResult, FileEntry};

pub const MAX_PUBLIC_LINK_LEN: u64 = 255;

#[derive(Debug, Validate)]
struct PublicLinkForm {
    #[validate(length(min = 1, max = 255))]
    public_key: String,
}

/// Trims the submitted link and checks it is non-blank and at most
/// `MAX_PUBLIC_LINK_LEN` characters long.
pub fn validate_public_key(raw: &str) -> DiskResult<String> {
    let form = PublicLinkForm {
        public_key: raw.trim().to_string(),
    };

    form.validate().map_err(|_| {
        DiskError::InvalidLink(format!(
            "Enter a public link of 1 to {} characters",
            MAX_PUBLIC_LINK_LEN
        ))
    })?;

    Ok(form.public_key)
}

/// Exact-match filter on the provider's resource type. `folder` is accepted
/// as an alias of `dir`; an unknown value matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") | Some("all") => TypeFilter::All,
            Some("folder") => TypeFilter::Only("dir".to_string()),
            Some(other) => TypeFilter::Only(other.to_string()),
        }
    }

    pub fn matches(&self, entry: &FileEntry) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => entry.resource_type.as_str() == kind,
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(kind) => kind,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

pub struct ListingService {
    api: Arc<dyn DiskApi>,
    cache: Arc<ListingCache>,
}

impl ListingService {
    pub fn new(api: Arc<dyn DiskApi>, cache: Arc<ListingCache>) -> Self {
        Self { api, cache }
    }

    /// Listing behind `public_key`. The cache always holds the unfiltered
    /// listing; `filter` is applied afterwards.
    pub async fn list(
        &self,
        public_key: &str,
        filter: &TypeFilter,
        token: Option<&str>,
    ) -> DiskResult<Vec<FileEntry>> {
        let public_key = validate_public_key(public_key)?;

        let entries = match self.cache.get(&public_key) {
            Some(entries) => {
                debug!(%public_key, "Listing cache hit");
                entries
            }
            None => {
                debug!(%public_key, "Listing cache miss");
                let entries = self.api.list_resources(&public_key, token).await?;
                self.cache.put(&public_key, entries.clone());
                entries
            }
        };

        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }
}
