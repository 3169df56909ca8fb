//! Classification of canonical base types against the parsed API surface.
//!
//! These predicates answer, for a resolved base type, which serialization
//! strategy applies: struct-wise field encoding, enum value encoding,
//! opaque interface-handle tracking, or anonymous-union member dispatch.
//! Membership comes from the classification sets of the parse dump, with a
//! handful of special cases the header pass cannot see.

use crate::descriptor::{TypeDescriptor, UnionMember};
use crate::source::SourceDict;
use crate::tables::OverrideTables;

/// Name prefix the header pass gives anonymous unions.
pub const ANON_UNION_PREFIX: &str = "<anon-union-";

/// Annotation token marking a parameter that receives a freshly created
/// interface reference.
pub const COM_OUTPTR_ANNOTATION: &str = "COM_Outptr";

/// Types declared in OS headers outside the parsed surface; treated as
/// structs even though no parse entry exists for them.
const UNPARSED_STRUCTS: &[&str] = &["LARGE_INTEGER"];

impl SourceDict {
    /// Whether a canonical base type names a struct.
    pub fn is_struct(&self, name: &str) -> bool {
        UNPARSED_STRUCTS.contains(&name) || self.struct_list.iter().any(|s| s == name)
    }

    /// Whether a canonical base type names an enum.
    pub fn is_enum(&self, name: &str) -> bool {
        self.enum_set.contains(name)
    }

    /// Whether a canonical base type names a COM interface.
    pub fn is_class_name(&self, name: &str) -> bool {
        self.class_list.iter().any(|s| s == name)
    }

    /// Members of the anonymous union a base type names, when it uses the
    /// anonymous-union naming convention and the parse recorded it.
    pub fn union_members(&self, base_type: &str) -> Option<&[UnionMember]> {
        if !base_type.starts_with(ANON_UNION_PREFIX) {
            return None;
        }
        self.union_dict
            .get(base_type)
            .map(|decl| decl.members.as_slice())
    }
}

/// Whether a resolved descriptor denotes a COM interface.
///
/// Takes the descriptor rather than the bare type name: a `void **`
/// out-pointer is an interface reference even though `void` is in no
/// class list, so the out-pointer flag must already be resolved.
pub fn is_class(descriptor: &TypeDescriptor, source: &SourceDict) -> bool {
    if descriptor.base_type == "void"
        && descriptor.pointer_depth == 2
        && descriptor.is_com_outptr
    {
        return true;
    }
    source.is_class_name(&descriptor.base_type)
}

/// Whether a parameter receives a freshly created interface reference,
/// either via the annotation token in its declaration text or via the
/// curated override for functions that annotate with plain `_Out_`.
pub fn is_com_outptr(
    tables: &OverrideTables,
    owner: &str,
    parameter: &str,
    full_type: &str,
) -> bool {
    full_type.contains(COM_OUTPTR_ANNOTATION) || tables.com_outptr_param(owner, parameter)
}
