use serde::{Deserialize, Serialize};
use std::fmt;

/// A named list on the remote account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Favorite,
    Watchlist,
    Rated,
}

impl CollectionType {
    pub const ALL: [CollectionType; 3] = [
        CollectionType::Favorite,
        CollectionType::Watchlist,
        CollectionType::Rated,
    ];

    /// Order in which buckets are reconciled. Favorite and Rated come before
    /// Watchlist.
    pub const RECONCILE_ORDER: [CollectionType; 3] = [
        CollectionType::Favorite,
        CollectionType::Rated,
        CollectionType::Watchlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::Favorite => "favorite",
            CollectionType::Watchlist => "watchlist",
            CollectionType::Rated => "rated",
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
