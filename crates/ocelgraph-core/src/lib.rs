//! ocelgraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the ocelgraph layout
//! pipeline and its command-line tool. It includes:
//!
//! - **Summary**: The read-only input contract describing object types,
//!   attributes and relations ([`summary`] module)
//! - **Identifiers**: Cheap-to-clone object type identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod summary;
