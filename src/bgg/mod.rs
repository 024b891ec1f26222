//! BGG XML API v2 client and domain records.

pub mod client;
pub mod model;
mod response;
