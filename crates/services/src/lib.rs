pub mod archive;
pub mod cache;
pub mod disk;
pub mod download;
pub mod listing;
pub mod oauth;

pub use cache::ListingCache;
pub use disk::{DiskApi, DiskError, FileEntry, YandexDiskClient};
pub use download::DownloadService;
pub use listing::{ListingService, TypeFilter};
pub use oauth::{OAuthError, OAuthService};
