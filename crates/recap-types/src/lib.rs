//! # recap-types
//!
//! Type-descriptor resolution for the recap capture/replay code generator.
//!
//! This crate provides:
//! - A canonical descriptor record for every parameter, field, and return
//!   value of a captured API surface (Direct3D 12 / DXGI)
//! - Curated override tables (type aliases, array-length overrides,
//!   bitfield widths, COM out-pointer parameters)
//! - Declaration-text normalization and base-type classification
//! - Array-extent inference for pointer-typed symbols
//! - A resolver that walks a parsed-header dump and builds the name-keyed
//!   descriptor tables consumed by the encoder/decoder emitters
//!
//! # Example
//!
//! ```ignore
//! use recap_types::{DescriptorResolver, SourceDict};
//!
//! let source = SourceDict::from_json(&dump)?;
//! let mut resolver = DescriptorResolver::new(source);
//! resolver.resolve();
//!
//! for (name, members) in resolver.struct_members() {
//!     println!("{}: {} fields", name, members.len());
//! }
//! ```

pub mod classify;
pub mod decl;
pub mod descriptor;
pub mod extent;
pub mod resolver;
pub mod source;
pub mod tables;

pub use descriptor::{TypeDescriptor, UnionMember};
pub use resolver::{CommandSignature, DescriptorResolver};
pub use source::SourceDict;
pub use tables::{OverrideTables, TableError};
