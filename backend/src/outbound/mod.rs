//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **keys**: RSA signing keys persisted as PEM files
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod keys;
pub mod persistence;
