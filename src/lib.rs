//! Finds BoardGameGeek expansions missing from a user's collection.
//!
//! The pipeline fetches the user's owned base games from the BGG XML API,
//! follows each game's expansion links, fetches the user's owned expansions,
//! and reports every expansion the user does not own yet, grouped by the
//! base game it belongs to.

pub mod bgg;
pub mod config;
pub mod error;
pub mod notify;
pub mod reconcile;
pub mod util;
