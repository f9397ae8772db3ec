/// Wire format for calendar dates, e.g. `20.11.2024`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Upper bound for nick, password, name and listing-name fields.
pub const MAX_NAME_LEN: usize = 256;

/// Upper bound for listing descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 2048;

/// Attempts a contended bid makes before giving up with a conflict.
pub const BID_CAS_RETRIES: usize = 8;
