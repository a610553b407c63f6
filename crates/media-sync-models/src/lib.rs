pub mod collection;
pub mod media;
pub mod record;
pub mod remote;

pub use collection::CollectionType;
pub use media::{MediaCategory, SERIES_TITLE_TYPE};
pub use record::{ExportRow, SourceRecord};
pub use remote::{AccountPage, FindResults, RemoteMedia, RemoteMediaRef};
