//! In-process persistence for users and listings.
//!
//! Tables are keyed by store-assigned numeric ids. Nick uniqueness and the
//! bid compare-and-swap are enforced inside the write lock, so callers get
//! atomic outcomes without holding any lock themselves.

use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::models::{listing::Listing, user::User};

/// The store failed as a whole, not a per-row condition. Surfaced to
/// callers as a 503.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("store unavailable: {reason}")]
pub struct StoreError {
    reason: &'static str,
}

impl StoreError {
    fn poisoned() -> Self {
        Self {
            reason: "table lock poisoned",
        }
    }
}

#[derive(Debug)]
struct Table<T> {
    rows: HashMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn assign_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Outcome of the conditional price update backing `PlaceBid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidOutcome {
    /// The expected price matched; the listing now carries the new price
    /// and winner.
    Updated(Listing),
    /// Another bid landed first; carries the price actually observed.
    PriceChanged(u64),
    /// The listing was deleted concurrently.
    Missing,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Table<User>>,
    listings: RwLock<Table<Listing>>,
}

impl MemoryStore {
    fn read_users(&self) -> Result<RwLockReadGuard<'_, Table<User>>, StoreError> {
        self.users.read().map_err(|_| StoreError::poisoned())
    }

    fn write_users(&self) -> Result<RwLockWriteGuard<'_, Table<User>>, StoreError> {
        self.users.write().map_err(|_| StoreError::poisoned())
    }

    fn read_listings(&self) -> Result<RwLockReadGuard<'_, Table<Listing>>, StoreError> {
        self.listings.read().map_err(|_| StoreError::poisoned())
    }

    fn write_listings(&self) -> Result<RwLockWriteGuard<'_, Table<Listing>>, StoreError> {
        self.listings.write().map_err(|_| StoreError::poisoned())
    }

    /// Insert a new user, assigning its id. Returns `None` when the nick is
    /// already taken.
    pub fn create_user(&self, mut user: User) -> Result<Option<User>, StoreError> {
        let mut table = self.write_users()?;
        if table.rows.values().any(|u| u.nick == user.nick) {
            return Ok(None);
        }
        user.id = table.assign_id();
        table.rows.insert(user.id, user.clone());
        Ok(Some(user))
    }

    pub fn get_user(&self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(self.read_users()?.rows.get(&id).cloned())
    }

    pub fn find_user_by_nick(&self, nick: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read_users()?
            .rows
            .values()
            .find(|u| u.nick == nick)
            .cloned())
    }

    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.read_users()?.rows.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    /// Replace a user row, re-checking nick uniqueness against every other
    /// row. Returns `None` when another user already holds the nick.
    pub fn update_user(&self, user: User) -> Result<Option<User>, StoreError> {
        let mut table = self.write_users()?;
        if table
            .rows
            .values()
            .any(|u| u.id != user.id && u.nick == user.nick)
        {
            return Ok(None);
        }
        table.rows.insert(user.id, user.clone());
        Ok(Some(user))
    }

    /// Replace a user row without the nick check, for mutations that cannot
    /// change the nick (session flags, admin grants).
    pub fn put_user(&self, user: User) -> Result<(), StoreError> {
        self.write_users()?.rows.insert(user.id, user);
        Ok(())
    }

    pub fn delete_user(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.write_users()?.rows.remove(&id).is_some())
    }

    /// Insert a new listing, assigning its id.
    pub fn create_listing(&self, mut listing: Listing) -> Result<Listing, StoreError> {
        let mut table = self.write_listings()?;
        listing.id = table.assign_id();
        table.rows.insert(listing.id, listing.clone());
        Ok(listing)
    }

    pub fn get_listing(&self, id: u64) -> Result<Option<Listing>, StoreError> {
        Ok(self.read_listings()?.rows.get(&id).cloned())
    }

    pub fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let mut listings: Vec<Listing> = self.read_listings()?.rows.values().cloned().collect();
        listings.sort_by_key(|l| l.id);
        Ok(listings)
    }

    /// Replace an existing listing row. Returns `false` when the row is
    /// gone.
    pub fn update_listing(&self, listing: Listing) -> Result<bool, StoreError> {
        let mut table = self.write_listings()?;
        if !table.rows.contains_key(&listing.id) {
            return Ok(false);
        }
        table.rows.insert(listing.id, listing);
        Ok(true)
    }

    pub fn delete_listing(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.write_listings()?.rows.remove(&id).is_some())
    }

    /// Remove every listing owned by `owner_id`, returning how many rows
    /// went away. Backs the explicit user-deletion cascade.
    pub fn delete_listings_owned_by(&self, owner_id: u64) -> Result<usize, StoreError> {
        let mut table = self.write_listings()?;
        let before = table.rows.len();
        table.rows.retain(|_, l| l.owner_id != owner_id);
        Ok(before - table.rows.len())
    }

    pub fn clear_listings(&self) -> Result<usize, StoreError> {
        let mut table = self.write_listings()?;
        let removed = table.rows.len();
        table.rows.clear();
        Ok(removed)
    }

    /// Compare-and-swap on `current_price`: the update applies only if the
    /// price still equals `expected`, so two overlapping bids can never
    /// both validate against the same stale value.
    pub fn bid_if_price(
        &self,
        id: u64,
        expected: u64,
        new_price: u64,
        bidder_id: u64,
    ) -> Result<BidOutcome, StoreError> {
        let mut table = self.write_listings()?;
        match table.rows.get_mut(&id) {
            None => Ok(BidOutcome::Missing),
            Some(listing) if listing.current_price != expected => {
                Ok(BidOutcome::PriceChanged(listing.current_price))
            }
            Some(listing) => {
                listing.current_price = new_price;
                listing.winner_id = Some(bidder_id);
                Ok(BidOutcome::Updated(listing.clone()))
            }
        }
    }
}
