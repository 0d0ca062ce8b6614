//! name_origin_core - predicts countries of origin for given names.
//!
//! Results from the upstream classifier are cached in SQLite together with
//! country metadata from the reference service. A cached name is served
//! locally for 24 hours after its last access, then refreshed.

pub mod assembly;
pub mod clients;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use assembly::{CountryDetails, NameResponse, PopularNamesResponse};
pub use error::{OriginError, Result};
pub use repository::OriginRepository;
pub use service::OriginService;
