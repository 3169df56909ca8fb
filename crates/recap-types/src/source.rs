//! Input model for the collaborator header parse.
//!
//! The upstream header pass delivers one dump per generation run: header
//! units with their classes (struct/class declarations) and free functions,
//! plus flat classification sets (struct names, interface names, enum names,
//! anonymous unions). The dump is read once and never mutated; resolution
//! walks it read-only.

use crate::descriptor::UnionMember;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The parsed API surface delivered by the header pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDict {
    /// Processed header units, keyed by header name, in processing order.
    #[serde(default)]
    pub header_dict: IndexMap<String, HeaderUnit>,

    /// Names of all struct types in the surface.
    #[serde(default)]
    pub struct_list: Vec<String>,

    /// Names of all COM interface types in the surface.
    #[serde(default)]
    pub class_list: Vec<String>,

    /// Names of all enum types in the surface.
    #[serde(default)]
    pub enum_set: HashSet<String>,

    /// Anonymous unions, keyed by their generated `<anon-union-N>` name.
    #[serde(default)]
    pub union_dict: HashMap<String, UnionDecl>,
}

impl SourceDict {
    /// Load a parse dump from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One processed header file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderUnit {
    /// Struct and interface declarations, keyed by type name.
    #[serde(default)]
    pub classes: IndexMap<String, ClassDecl>,

    /// Free functions declared in this header.
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

/// A struct or interface declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Declared type name.
    #[serde(default)]
    pub name: String,

    /// How the type was declared (`struct`, `class`, `union`).
    #[serde(default)]
    pub declaration_method: DeclarationKind,

    /// Data members by access level.
    #[serde(default)]
    pub properties: MemberAccess<RawSymbol>,

    /// Methods by access level.
    #[serde(default)]
    pub methods: MemberAccess<FunctionDecl>,
}

/// The declaration keyword a type was introduced with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Struct,
    Class,
    Union,
    /// Anything the header pass emits that resolution does not select on.
    #[default]
    #[serde(other)]
    Other,
}

/// Members grouped by access level. Only public members are resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberAccess<T> {
    #[serde(default)]
    pub public: Vec<T>,
}

/// A free function or method declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function name.
    pub name: String,

    /// Raw return-type declaration text.
    #[serde(rename = "rtnType", default)]
    pub rtn_type: String,

    /// Parameters in declared order.
    #[serde(default)]
    pub parameters: Vec<RawSymbol>,

    /// Owning container name; `None` for free functions.
    #[serde(default)]
    pub parent: Option<String>,
}

/// One declared symbol (parameter or field) as delivered by the header pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSymbol {
    /// Symbol name.
    pub name: String,

    /// Raw declaration text, annotations included.
    #[serde(rename = "type")]
    pub declared_type: String,

    /// Owning container name, when the header pass records one.
    #[serde(default)]
    pub parent: Option<String>,

    /// Fixed element capacity, when the declaration is an array.
    #[serde(default)]
    pub array_size: Option<usize>,

    /// Dimension count for multi-dimensional arrays.
    #[serde(rename = "multi_dimensional_array", default)]
    pub array_dimension: Option<usize>,
}

/// An anonymous union recorded by the header pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnionDecl {
    /// Members in declared order.
    #[serde(default)]
    pub members: Vec<UnionMember>,
}
