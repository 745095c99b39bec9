//! Core engine for the bincol round-trip verification harness.
//!
//! This crate proves one narrow property about columnar file formats:
//! a table column explicitly tagged for raw-binary output survives a
//! write/read round trip through Parquet and ORC with the on-disk
//! schema declaring the column as binary rather than text.
//!
//! The pieces, leaf-first:
//!
//! - A minimal host-side table representation and its builder
//!   (`table` module).
//! - A lossless bridge from the host table into the Arrow compute
//!   representation (`bridge` module).
//! - Positional per-column output-type overrides, applied only at
//!   serialization time (`metadata` module).
//! - Format backends behind a common trait, each pairing an atomic
//!   file writer with a schema-only reader (`formats` and `sink`
//!   modules).
//! - A driver that threads every format through override → write →
//!   read-schema and asserts the declared types (`verify` module).
//!
//! The companion CLI crate is a thin shell over `verify::run`.
#![deny(missing_docs)]
pub mod bridge;
pub mod formats;
pub mod metadata;
pub mod schema;
pub mod sink;
pub mod table;
pub mod verify;
