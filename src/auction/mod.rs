//! The bidding and listing lifecycle engine, free of transport concerns.
//! Every operation takes the acting user and today's date explicitly.

pub mod access;
pub mod account;
pub mod bidding;
pub mod lifecycle;
