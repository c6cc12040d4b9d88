//! Data-driven combat content.
//!
//! This crate reads server combat rules (TOML), spell catalogs (RON) and
//! field item types (RON) into `combat-core` values. Every definition is
//! validated while loading, so a malformed shape or formula fails the load
//! before any engine is shared with the server.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AreaSpec, ConfigLoader, ContentFactory, FieldCatalog, FieldLoader, HooksSpec, ParamsSpec,
    SpellBook, SpellLoader, SpellSpec,
};
