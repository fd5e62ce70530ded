//! # Storage Layer
//!
//! Every repository mirrors its in-memory collection to exactly one backing
//! file. This module owns how that file is named, encoded and written.
//!
//! ## Layers
//!
//! 1. [`backend::StorageBackend`]: raw text in, raw text out, by path.
//!    [`fs_backend::FsBackend`] in production, [`mem_backend::MemBackend`] in tests.
//! 2. [`persistence::PersistenceEngine`]: JSON encoding, optional obfuscation,
//!    path suffixing and identifier generation.
//!
//! ## File Naming
//!
//! The configured path is never used verbatim. The engine inserts the storage
//! mode before the extension:
//!
//! ```text
//! data/clients.json  →  data/clients_Regular.json      (obfuscate = false)
//!                    →  data/clients_Obfuscated.json   (obfuscate = true)
//! ```
//!
//! Toggling obfuscation therefore switches which file is used; it never
//! re-encodes an existing one.
//!
//! ## File Format
//!
//! - **Regular**: pretty-printed JSON of the whole collection. Repositories
//!   store a map from string UUID to entity.
//! - **Obfuscated**: `base64(xor(utf8(json), key))`, see [`obfuscation`].
//!
//! ## Write Semantics
//!
//! - Whole-collection writes only; no incremental updates.
//! - The filesystem backend writes to a sibling `.tmp` file and renames it over
//!   the target, so readers never observe a truncated collection.
//! - There is no locking: one writer per file is assumed.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod obfuscation;
pub mod persistence;
