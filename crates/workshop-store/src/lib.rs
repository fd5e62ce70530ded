//! # workshop-store
//!
//! File-backed entity repositories for the workshop manager: clients,
//! vehicles, employees, service orders, inventory. Every collection lives in
//! memory as a map from [`uuid::Uuid`] to entity and is mirrored in full to
//! one JSON file, optionally obfuscated. On top of plain CRUD and predicate
//! queries, repositories offer typo-, accent- and word-order-tolerant search.
//!
//! ## Architecture
//!
//! - [`entity`]: the identity contract stored types satisfy.
//! - [`store`]: backends, the persistence engine, obfuscation, id generation.
//! - [`search`]: Levenshtein distance and token-based fuzzy ranking.
//! - [`repository`]: the typed façade domain modules program against.
//! - [`config`] and [`logging`]: layered settings and subscriber setup.
//!
//! ## Example
//!
//! ```no_run
//! use workshop_store::config::StoreConfig;
//! use workshop_store::model::Client;
//! use workshop_store::repository::{EntityStore, Repository};
//!
//! # fn main() -> workshop_store::Result<()> {
//! let config = StoreConfig::load(None)?;
//! let mut clients: Repository<Client> = Repository::from_config(&config, "clients.json")?;
//!
//! let id = clients.register(Client::new("Eduardo Pelli", "eduardo@example.com", "555-0101"))?;
//! assert!(clients.get_by_id(&id).is_some());
//!
//! let hits = clients.search_by_pattern("eduardo", |c: &Client| c.name.clone());
//! assert_eq!(hits.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod search;
pub mod store;

pub use entity::Entity;
pub use error::{Result, StoreError};
pub use repository::{EntityStore, Repository};
