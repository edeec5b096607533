use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum WatchlistError {
    #[error("invalid index {index}: no such item")]
    InvalidIndex { index: String },

    #[error("\"{series}\" already exists in the watchlist")]
    DuplicateEntry { series: String },

    #[error("cannot identify series and episode in \"{title}\"")]
    UnparseableTitle { title: String },

    #[error("series name \"{series}\" contains the reserved delimiter ';'")]
    ReservedDelimiter { series: String },

    #[error("corrupt watchlist file at line {line}: {reason}")]
    CorruptPersistedState { line: usize, reason: String },

    #[error("failed to access watchlist file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WatchlistError {
    pub(crate) fn invalid_index(index: impl ToString) -> Self {
        Self::InvalidIndex {
            index: index.to_string(),
        }
    }
}
