//! Resolved symbol descriptors.
//!
//! A [`TypeDescriptor`] is the canonical record produced for one declared
//! symbol (parameter, struct/union field, or return value). It carries
//! everything the serialization emitters need: canonical base type, pointer
//! depth, constness, array extent, bitfield width, union membership, and
//! COM out-pointer classification.

use serde::{Deserialize, Serialize};

/// The resolved, canonical metadata record for one declared symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Symbol name as declared.
    pub name: String,

    /// Canonical base type after alias rewriting (e.g. `GUID` for `REFIID`).
    pub base_type: String,

    /// Original declaration text, preserved verbatim.
    pub full_type: String,

    /// Levels of indirection: 1 for `*`, 2 for `**`, and so on.
    pub pointer_depth: u32,

    /// Whether the declaration is const-qualified (directly or via alias).
    pub is_const: bool,

    /// Element-count expression for array-typed symbols. For a fixed array
    /// this is the capacity; for a dynamic array it names a sibling field or
    /// a derived byte-count expression.
    #[serde(default)]
    pub array_length: Option<String>,

    /// Fixed element capacity, 0 when the extent is dynamic or absent.
    #[serde(default)]
    pub array_capacity: usize,

    /// Dimension count for multi-dimensional fixed arrays, 0 otherwise.
    #[serde(default)]
    pub array_dimension: usize,

    /// Bitfield width annotation (e.g. `:24`), empty for full-width fields.
    #[serde(default)]
    pub bitfield_width: String,

    /// Members of the anonymous union this symbol's type names, if any.
    #[serde(default)]
    pub union_members: Vec<UnionMember>,

    /// Whether this is a COM interface out-pointer parameter.
    #[serde(default)]
    pub is_com_outptr: bool,
}

impl TypeDescriptor {
    /// Check whether the symbol has any level of indirection.
    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }

    /// Check whether the symbol is a fixed-capacity array.
    pub fn is_fixed_array(&self) -> bool {
        self.array_capacity > 0
    }

    /// Check whether the symbol is an array whose extent is an expression
    /// (sibling field or derived byte count) rather than a fixed capacity.
    pub fn is_dynamic_array(&self) -> bool {
        self.array_capacity == 0 && self.array_length.is_some()
    }

    /// Check whether the symbol's type is an anonymous union.
    pub fn is_union(&self) -> bool {
        !self.union_members.is_empty()
    }

    /// Check whether the field occupies a specific number of bits.
    pub fn is_bitfield(&self) -> bool {
        !self.bitfield_width.is_empty()
    }
}

/// One member of an anonymous union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionMember {
    /// Member name.
    pub name: String,
    /// Declared member type.
    #[serde(rename = "type")]
    pub declared_type: String,
}
