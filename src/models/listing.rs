use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Listing state, computed from the bidding window against today's date.
/// Never stored; there is no transition hook to miss.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingState {
    Pending,
    Active,
    Closed,
}

impl fmt::Display for ListingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = match *self {
            ListingState::Pending => "pending",
            ListingState::Active => "active",
            ListingState::Closed => "closed",
        };
        write!(f, "{}", out)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Numeric id, assigned by the store.
    pub id: u64,
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: Option<String>,
    /// First day of the bidding window.
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "20.11.2024")]
    pub start_date: NaiveDate,
    /// Last day of the bidding window, inclusive.
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "24.11.2024")]
    pub end_date: NaiveDate,
    /// Floor price, immutable after creation.
    pub asking_price: u64,
    /// Highest accepted bid so far, or the asking price if none.
    pub current_price: u64,
    /// The user that created the listing.
    pub owner_id: u64,
    /// The user holding the highest accepted bid.
    pub winner_id: Option<u64>,
}

impl Listing {
    pub fn state(&self, today: NaiveDate) -> ListingState {
        if today < self.start_date {
            ListingState::Pending
        } else if today > self.end_date {
            ListingState::Closed
        } else {
            ListingState::Active
        }
    }

    /// Bidding is allowed only inside `[start_date, end_date]`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.state(today) == ListingState::Active
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: Option<String>,
    /// Floor price; the current price starts here.
    pub asking_price: u64,
    /// First day of the bidding window.
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "20.11.2024")]
    pub start_date: NaiveDate,
    /// Last day of the bidding window, inclusive.
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "24.11.2024")]
    pub end_date: NaiveDate,
}

/// Partial update; absent fields keep their prior value. The asking price
/// and the current price are deliberately not here.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    /// Item name.
    pub name: Option<String>,
    /// Item description.
    pub description: Option<String>,
    /// First day of the bidding window.
    #[serde(default, with = "date_format::option")]
    #[schema(value_type = Option<String>, example = "20.11.2024")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the bidding window, inclusive.
    #[serde(default, with = "date_format::option")]
    #[schema(value_type = Option<String>, example = "24.11.2024")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    /// Offered price; must strictly exceed the listing's current price.
    pub new_price: u64,
}

/// Serde adapter for the `d.m.Y` wire form of calendar dates.
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(de)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        use crate::constants::DATE_FORMAT;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            ser: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, ser),
                None => ser.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            de: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let raw = Option::<String>::deserialize(de)?;
            raw.map(|s| {
                NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}
