//! Almanac Core Types and Definitions
//!
//! This crate provides the foundational types of an Almanac software catalog.
//! It includes:
//!
//! - **Kinds**: The closed set of entity kinds ([`kind::Kind`])
//! - **References**: Structured entity identifiers ([`reference::Ref`],
//!   [`reference::LabelRef`], [`reference::QualifiedName`])
//! - **Metadata**: Descriptive data shared by every entity ([`metadata::Metadata`])
//! - **Entities**: The six entity kinds and the [`entity::Entity`] sum type
//!
//! Parsing of the textual reference syntax lives in `almanac-parser`; storage,
//! validation and relationship population live in `almanac`.

pub mod entity;
pub mod kind;
pub mod metadata;
pub mod reference;
