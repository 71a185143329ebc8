use nc_core::{Error, Result};

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

/// Ratings outside 1..=5 never reach a backend's write path.
pub(crate) fn ensure_valid_rating(rating: i32) -> Result<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(Error::InvalidRating(rating))
    }
}
