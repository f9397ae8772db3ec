//! The bid state transition: strict-ascending prices inside the active
//! window, applied through the store's compare-and-swap so concurrent bids
//! never validate against a stale price.

use chrono::NaiveDate;

use crate::{
    constants::BID_CAS_RETRIES,
    errors::ApiError,
    models::{listing::Listing, user::User, ApiResult},
    store::{BidOutcome, MemoryStore},
};

/// Place a bid on a listing. On success the listing's current price is the
/// new price and the actor is the winner. Retries a bounded number of times
/// when another bid lands between the read and the swap.
pub fn place_bid(
    store: &MemoryStore,
    actor: &User,
    listing_id: u64,
    new_price: u64,
    today: NaiveDate,
) -> ApiResult<Listing> {
    for _ in 0..BID_CAS_RETRIES {
        let listing = store.get_listing(listing_id)?.ok_or(ApiError::NotFound)?;

        if !listing.is_active(today) {
            return Err(ApiError::ListingNotActive);
        }
        // Equal bids are rejected too; the auction is strictly ascending.
        if new_price <= listing.current_price {
            return Err(ApiError::PriceTooLow {
                current: listing.current_price,
            });
        }

        match store.bid_if_price(listing_id, listing.current_price, new_price, actor.id)? {
            BidOutcome::Updated(updated) => return Ok(updated),
            BidOutcome::PriceChanged(_) => continue,
            BidOutcome::Missing => return Err(ApiError::NotFound),
        }
    }

    Err(ApiError::Conflict)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Days;

    use super::*;
    use crate::auction::fixtures::{seed_listing, seed_user, today};

    #[test]
    fn bids_must_strictly_increase() {
        let store = MemoryStore::default();
        let owner = seed_user(&store, "owner", false);
        let second = seed_user(&store, "second", false);
        let third = seed_user(&store, "third", false);
        let listing = seed_listing(&store, &owner, 10, today(), today() + Days::new(3));

        // Equal to the asking price: rejected.
        let err = place_bid(&store, &second, listing.id, 10, today()).unwrap_err();
        assert!(matches!(err, ApiError::PriceTooLow { current: 10 }));

        let updated = place_bid(&store, &second, listing.id, 15, today()).unwrap();
        assert_eq!(updated.current_price, 15);
        assert_eq!(updated.winner_id, Some(second.id));

        // Must exceed 15 now, not the original 10.
        let err = place_bid(&store, &third, listing.id, 12, today()).unwrap_err();
        assert!(matches!(err, ApiError::PriceTooLow { current: 15 }));

        let final_state = store.get_listing(listing.id).unwrap().unwrap();
        assert_eq!(final_state.current_price, 15);
        assert_eq!(final_state.winner_id, Some(second.id));
    }

    #[test]
    fn bidding_outside_the_window_fails() {
        let store = MemoryStore::default();
        let owner = seed_user(&store, "owner", false);
        let bidder = seed_user(&store, "bidder", false);
        let closed =
            seed_listing(&store, &owner, 10, today() - Days::new(5), today() - Days::new(1));
        let pending =
            seed_listing(&store, &owner, 10, today() + Days::new(1), today() + Days::new(3));

        let err = place_bid(&store, &bidder, closed.id, 20, today()).unwrap_err();
        assert!(matches!(err, ApiError::ListingNotActive));

        let err = place_bid(&store, &bidder, pending.id, 20, today()).unwrap_err();
        assert!(matches!(err, ApiError::ListingNotActive));
    }

    #[test]
    fn missing_listing_is_not_found() {
        let store = MemoryStore::default();
        let bidder = seed_user(&store, "bidder", false);

        let err = place_bid(&store, &bidder, 42, 20, today()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn owner_may_outbid_own_listing() {
        // No self-bidding restriction; kept in line with the source design.
        let store = MemoryStore::default();
        let owner = seed_user(&store, "owner", false);
        let listing = seed_listing(&store, &owner, 10, today(), today() + Days::new(3));

        let updated = place_bid(&store, &owner, listing.id, 11, today()).unwrap();
        assert_eq!(updated.winner_id, Some(owner.id));
    }

    #[test]
    fn concurrent_bids_resolve_to_the_maximum_accepted() {
        let store = Arc::new(MemoryStore::default());
        let owner = seed_user(&store, "owner", false);
        let listing = seed_listing(&store, &owner, 8, today(), today() + Days::new(3));

        let mut handles = Vec::new();
        for offset in 0..16u64 {
            let store = Arc::clone(&store);
            let bidder = seed_user(&store, &format!("bidder{}", offset), false);
            let listing_id = listing.id;
            handles.push(std::thread::spawn(move || {
                let price = 10 + offset;
                place_bid(&store, &bidder, listing_id, price, today())
                    .map(|l| (price, l.winner_id))
                    .map_err(|_| ())
                    .ok()
                    .map(|(price, winner)| (price, winner, bidder.id))
            }));
        }

        let accepted: Vec<(u64, Option<u64>, u64)> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        assert!(!accepted.is_empty());

        let (max_price, _, max_bidder) =
            *accepted.iter().max_by_key(|(price, _, _)| *price).unwrap();

        let final_state = store.get_listing(listing.id).unwrap().unwrap();
        assert_eq!(final_state.current_price, max_price);
        assert_eq!(final_state.winner_id, Some(max_bidder));
        assert!(final_state.current_price >= final_state.asking_price);
    }
}
