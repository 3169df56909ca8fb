//! Curated override tables for the Direct3D 12 / DXGI API surface.
//!
//! Everything the header text cannot express on its own lives here as plain
//! data: type-alias rewrites, base-type to encoder-primitive mappings,
//! array-length overrides for specific struct fields, bitfield widths, and
//! the COM out-pointer parameters whose declarations lack the usual
//! annotation. Rule sets are indexed once at construction; overlapping
//! alias spellings are rejected at that point so disjointness stays a
//! checkable invariant rather than an ordering assumption.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while indexing a rule set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The same source spelling appears in more than one alias rule.
    #[error("type spelling {0:?} appears in more than one alias rule")]
    DuplicateAlias(String),

    /// The same source spelling appears in more than one primitive rule.
    #[error("type spelling {0:?} appears in more than one primitive rule")]
    DuplicatePrimitive(String),

    /// The same (container, field) pair appears twice in a field-keyed table.
    #[error("{table} override for {container}.{field} appears more than once")]
    DuplicateField {
        table: &'static str,
        container: String,
        field: String,
    },
}

/// Maps one or more source type spellings to a canonical type, optionally
/// adding indirection or forcing constness (e.g. `LPCSTR` is `const char *`).
#[derive(Debug, Clone, Copy)]
pub struct AliasRule {
    pub spellings: &'static [&'static str],
    pub canonical: &'static str,
    pub pointer_depth: u32,
    pub is_const: bool,
}

/// Maps one or more base-type spellings to a serialization primitive name.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveRule {
    pub spellings: &'static [&'static str],
    pub primitive: &'static str,
}

/// A `(container, field)` keyed override carrying a value expression.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub container: &'static str,
    pub field: &'static str,
    pub value: &'static str,
}

/// Marks one function parameter as a COM out-pointer.
#[derive(Debug, Clone, Copy)]
pub struct ParamRule {
    pub function: &'static str,
    pub parameter: &'static str,
}

/// A complete set of curated rules for one API surface.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub aliases: &'static [AliasRule],
    pub primitives: &'static [PrimitiveRule],
    pub array_lengths: &'static [FieldRule],
    pub bitfields: &'static [FieldRule],
    pub com_outptr_params: &'static [ParamRule],
    pub handles: &'static [&'static str],
}

/// Alias rewrite target: canonical base plus pointer/const adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasTarget {
    pub canonical: &'static str,
    pub pointer_depth: u32,
    pub is_const: bool,
}

const DX12_ALIASES: &[AliasRule] = &[
    AliasRule { spellings: &["D3D12_RECT", "RECT"], canonical: "tagRECT", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["POINT"], canonical: "tagPOINT", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["REFIID", "REFGUID", "IID"], canonical: "GUID", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["DXGI_RGBA"], canonical: "D3DCOLORVALUE", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["ID3DBlob"], canonical: "ID3D10Blob", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["SECURITY_ATTRIBUTES"], canonical: "_SECURITY_ATTRIBUTES", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["D3D12_PRIMITIVE_TOPOLOGY"], canonical: "D3D_PRIMITIVE_TOPOLOGY", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["LPCVOID"], canonical: "void", pointer_depth: 1, is_const: true },
    AliasRule { spellings: &["LPVOID"], canonical: "void", pointer_depth: 1, is_const: false },
    AliasRule { spellings: &["WCHAR"], canonical: "wchar_t", pointer_depth: 0, is_const: false },
    AliasRule { spellings: &["LPCSTR"], canonical: "char", pointer_depth: 1, is_const: true },
    AliasRule { spellings: &["LPCWSTR"], canonical: "wchar_t", pointer_depth: 1, is_const: true },
];

const DX12_PRIMITIVES: &[PrimitiveRule] = &[
    PrimitiveRule { spellings: &["BYTE", "byte", "UINT8", "unsigned char"], primitive: "UInt8" },
    PrimitiveRule { spellings: &["INT8"], primitive: "Int8" },
    PrimitiveRule { spellings: &["UINT16", "unsigned short"], primitive: "UInt16" },
    PrimitiveRule { spellings: &["SHORT"], primitive: "Int16" },
    PrimitiveRule {
        spellings: &["unsigned long", "ULONG", "DWORD", "UINT", "UINT32", "unsigned int", "DXGI_USAGE"],
        primitive: "UInt32",
    },
    PrimitiveRule { spellings: &["HRESULT", "LONG", "BOOL", "INT", "int"], primitive: "Int32" },
    PrimitiveRule { spellings: &["UINT64", "D3D12_GPU_VIRTUAL_ADDRESS", "SIZE_T"], primitive: "UInt64" },
    PrimitiveRule { spellings: &["LONG_PTR"], primitive: "Int64" },
    PrimitiveRule { spellings: &["FLOAT", "float"], primitive: "Float" },
    PrimitiveRule { spellings: &["HANDLE", "HMONITOR", "HWND", "HMODULE", "HDC"], primitive: "Handle" },
    PrimitiveRule { spellings: &["void"], primitive: "Void" },
    PrimitiveRule { spellings: &["char"], primitive: "String" },
    PrimitiveRule { spellings: &["wchar_t"], primitive: "WString" },
    PrimitiveRule { spellings: &["PFN_DESTRUCTION_CALLBACK"], primitive: "Function" },
];

const DX12_ARRAY_LENGTHS: &[FieldRule] = &[
    FieldRule {
        container: "D3D12_PIPELINE_STATE_STREAM_DESC",
        field: "pPipelineStateSubobjectStream",
        value: "SizeInBytes",
    },
    FieldRule { container: "D3D12_AUTO_BREADCRUMB_NODE", field: "pCommandHistory", value: "BreadcrumbCount" },
    FieldRule { container: "D3D12_AUTO_BREADCRUMB_NODE1", field: "pCommandHistory", value: "BreadcrumbCount" },
    FieldRule {
        container: "D3D12_AUTO_BREADCRUMB_NODE1",
        field: "pBreadcrumbContexts",
        value: "BreadcrumbContextsCount",
    },
    FieldRule {
        container: "D3D12_FEATURE_DATA_PROTECTED_RESOURCE_SESSION_TYPES",
        field: "pTypes",
        value: "Count",
    },
];

const DX12_BITFIELDS: &[FieldRule] = &[
    FieldRule { container: "D3D12_RAYTRACING_INSTANCE_DESC", field: "InstanceID", value: ":24" },
    FieldRule { container: "D3D12_RAYTRACING_INSTANCE_DESC", field: "InstanceMask", value: ":8" },
    FieldRule {
        container: "D3D12_RAYTRACING_INSTANCE_DESC",
        field: "InstanceContributionToHitGroupIndex",
        value: ":24",
    },
    FieldRule { container: "D3D12_RAYTRACING_INSTANCE_DESC", field: "Flags", value: ":8" },
];

// These creation functions annotate their void** parameter with _Out_
// instead of _COM_Outptr_.
const DX12_COM_OUTPTR_PARAMS: &[ParamRule] = &[
    ParamRule {
        function: "D3D12CreateRootSignatureDeserializer",
        parameter: "ppRootSignatureDeserializer",
    },
    ParamRule {
        function: "D3D12CreateVersionedRootSignatureDeserializer",
        parameter: "ppRootSignatureDeserializer",
    },
];

const DX12_HANDLES: &[&str] = &["HANDLE", "HMONITOR", "HWND", "HMODULE", "HDC"];

/// The curated rule set for the Direct3D 12 / DXGI surface.
pub const DX12_RULES: RuleSet = RuleSet {
    aliases: DX12_ALIASES,
    primitives: DX12_PRIMITIVES,
    array_lengths: DX12_ARRAY_LENGTHS,
    bitfields: DX12_BITFIELDS,
    com_outptr_params: DX12_COM_OUTPTR_PARAMS,
    handles: DX12_HANDLES,
};

/// Indexed override tables consulted during descriptor resolution.
///
/// Lookup misses are not errors: every accessor has a well-defined default
/// (unchanged type, no extent, empty width, not an out-pointer).
#[derive(Debug, Clone, Default)]
pub struct OverrideTables {
    aliases: HashMap<&'static str, AliasTarget>,
    primitives: HashMap<&'static str, &'static str>,
    array_lengths: HashMap<(&'static str, &'static str), &'static str>,
    bitfields: HashMap<(&'static str, &'static str), &'static str>,
    com_outptr_params: HashSet<(&'static str, &'static str)>,
    handles: HashSet<&'static str>,
}

impl OverrideTables {
    /// Index a rule set, rejecting overlapping entries.
    pub fn build(rules: &RuleSet) -> Result<Self, TableError> {
        let mut tables = Self::default();

        for rule in rules.aliases {
            let target = AliasTarget {
                canonical: rule.canonical,
                pointer_depth: rule.pointer_depth,
                is_const: rule.is_const,
            };
            for &spelling in rule.spellings {
                if tables.aliases.insert(spelling, target).is_some() {
                    return Err(TableError::DuplicateAlias(spelling.to_string()));
                }
            }
        }

        for rule in rules.primitives {
            for &spelling in rule.spellings {
                if tables.primitives.insert(spelling, rule.primitive).is_some() {
                    return Err(TableError::DuplicatePrimitive(spelling.to_string()));
                }
            }
        }

        for rule in rules.array_lengths {
            let key = (rule.container, rule.field);
            if tables.array_lengths.insert(key, rule.value).is_some() {
                return Err(TableError::DuplicateField {
                    table: "array length",
                    container: rule.container.to_string(),
                    field: rule.field.to_string(),
                });
            }
        }

        for rule in rules.bitfields {
            let key = (rule.container, rule.field);
            if tables.bitfields.insert(key, rule.value).is_some() {
                return Err(TableError::DuplicateField {
                    table: "bitfield",
                    container: rule.container.to_string(),
                    field: rule.field.to_string(),
                });
            }
        }

        for rule in rules.com_outptr_params {
            tables
                .com_outptr_params
                .insert((rule.function, rule.parameter));
        }

        tables.handles.extend(rules.handles.iter().copied());

        Ok(tables)
    }

    /// The builtin Direct3D 12 / DXGI tables.
    pub fn dx12() -> Self {
        // The builtin set is verified disjoint by the tests below.
        match Self::build(&DX12_RULES) {
            Ok(tables) => tables,
            Err(err) => unreachable!("builtin dx12 rules overlap: {err}"),
        }
    }

    /// Look up the alias rewrite for a base type, if any.
    pub fn alias(&self, base_type: &str) -> Option<AliasTarget> {
        self.aliases.get(base_type).copied()
    }

    /// Map a base type to its serialization primitive name; `None` means the
    /// type name is used as-is.
    pub fn encoder_primitive(&self, base_type: &str) -> Option<&'static str> {
        self.primitives.get(base_type).copied()
    }

    /// Explicit array-length expression for a struct field, if curated.
    pub fn array_length(&self, container: &str, field: &str) -> Option<&'static str> {
        self.array_lengths.get(&(container, field)).copied()
    }

    /// Bitfield width annotation for a struct field, if curated.
    pub fn bitfield_width(&self, container: &str, field: &str) -> Option<&'static str> {
        self.bitfields.get(&(container, field)).copied()
    }

    /// Whether a function parameter is a curated COM out-pointer.
    pub fn com_outptr_param(&self, function: &str, parameter: &str) -> bool {
        self.com_outptr_params.contains(&(function, parameter))
    }

    /// Whether a type name denotes an opaque OS handle.
    pub fn is_handle(&self, name: &str) -> bool {
        self.handles.contains(name)
    }
}
