use std::sync::Arc;
use std::time::Duration;

use diskview_config::Settings;
use diskview_services::{
    DiskApi, DownloadService, ListingCache, ListingService, OAuthError, OAuthService,
    YandexDiskClient,
};
use tracing::info;

use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub listing: Arc<ListingService>,
    pub downloads: Arc<DownloadService>,
    pub oauth: Option<Arc<OAuthService>>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let disk: Arc<dyn DiskApi> = Arc::new(YandexDiskClient::new(&settings.disk)?);
        Self::with_disk_api(settings, disk)
    }

    /// Builds the state around an arbitrary [`DiskApi`] implementation.
    pub fn with_disk_api(settings: Settings, disk: Arc<dyn DiskApi>) -> anyhow::Result<Self> {
        let cache = Arc::new(ListingCache::new(
            settings.cache.capacity,
            Duration::from_secs(settings.cache.ttl_secs),
        ));
        let listing = Arc::new(ListingService::new(disk.clone(), cache));
        let downloads = Arc::new(DownloadService::new(disk));

        let timeout = Duration::from_secs(settings.disk.request_timeout_secs);
        let oauth = match OAuthService::new(&settings.oauth, timeout) {
            Ok(service) => Some(Arc::new(service)),
            Err(OAuthError::NotConfigured) => {
                info!("OAuth client credentials not set, OAuth routes disabled");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let sessions = Arc::new(SessionStore::new(
            settings.session.capacity,
            Duration::from_secs(settings.session.idle_ttl_secs),
        ));

        Ok(Self {
            settings,
            listing,
            downloads,
            oauth,
            sessions,
        })
    }
}
