//! Favorite storage
//!
//! Keeps favorite payment templates in insertion order. Favorites are never
//! changed by ledger operations; only an import may overwrite one.

use crate::types::{Favorite, LedgerError};

/// Favorite store with linear-scan lookups
#[derive(Debug, Default)]
pub struct FavoriteStore {
    favorites: Vec<Favorite>,
}

impl FavoriteStore {
    pub fn new() -> Self {
        FavoriteStore {
            favorites: Vec::new(),
        }
    }

    /// Append a favorite and return a reference to the stored copy
    pub fn store(&mut self, favorite: Favorite) -> &Favorite {
        self.favorites.push(favorite);
        &self.favorites[self.favorites.len() - 1]
    }

    /// Get a favorite by ID
    ///
    /// # Errors
    ///
    /// Returns `FavoriteNotFound` if no favorite has this ID.
    pub fn get(&self, favorite_id: &str) -> Result<&Favorite, LedgerError> {
        self.favorites
            .iter()
            .find(|favorite| favorite.id == favorite_id)
            .ok_or_else(|| LedgerError::favorite_not_found(favorite_id))
    }

    /// Restore a favorite from a dump, replacing any favorite with the same ID
    pub fn upsert(&mut self, favorite: Favorite) {
        match self.favorites.iter_mut().find(|f| f.id == favorite.id) {
            Some(existing) => *existing = favorite,
            None => self.favorites.push(favorite),
        }
    }

    pub fn all(&self) -> &[Favorite] {
        &self.favorites
    }
}
