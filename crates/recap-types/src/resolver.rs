//! Descriptor resolution over a parsed API surface.
//!
//! [`DescriptorResolver`] drives one generation pass: it walks every header
//! unit of the parse dump, filters out the declarations that are not part
//! of the captured surface (macro artifacts, operators, vtable shims,
//! anonymous unions), and resolves each surviving parameter, field, and
//! return type into a [`TypeDescriptor`]. The results live in name-keyed
//! tables the encoder/decoder emitters consume by lookup.

use crate::classify;
use crate::decl;
use crate::descriptor::TypeDescriptor;
use crate::extent;
use crate::source::{ClassDecl, DeclarationKind, FunctionDecl, RawSymbol, SourceDict};
use crate::tables::OverrideTables;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Function name prefixes that mark macro-expansion artifacts.
const MACRO_PREFIXES: &[&str] = &["DEFINE_", "DECLARE_"];

/// GUID-equality helpers declared inline in the headers; they are not part
/// of the captured surface.
const GUID_HELPERS: &[&str] = &["InlineIsEqualGUID", "IsEqualGUID"];

/// Suffix of the compiler-generated virtual-table companion structs.
const VTABLE_SUFFIX: &str = "Vtbl";

/// Resolved signature of a free function or interface method: cleaned
/// return-type text, a qualifier slot, and the parameter descriptors in
/// declared order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandSignature {
    pub return_type: String,
    pub qualifier: String,
    pub parameters: Vec<TypeDescriptor>,
}

/// Builds and owns the per-pass descriptor tables.
#[derive(Debug, Clone, Default)]
pub struct DescriptorResolver {
    source: SourceDict,
    tables: OverrideTables,
    check_denylist: bool,
    denylist: HashSet<String>,
    struct_members: IndexMap<String, Vec<TypeDescriptor>>,
    cmd_params: IndexMap<String, CommandSignature>,
    method_params: IndexMap<String, CommandSignature>,
}

impl DescriptorResolver {
    /// Create a resolver over a parse dump with the builtin DX12 tables.
    pub fn new(source: SourceDict) -> Self {
        Self::with_tables(source, OverrideTables::dx12())
    }

    /// Create a resolver with caller-supplied override tables.
    pub fn with_tables(source: SourceDict, tables: OverrideTables) -> Self {
        Self {
            source,
            tables,
            ..Default::default()
        }
    }

    /// Replace the struct deny-list.
    pub fn set_denylist<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylist = names.into_iter().map(Into::into).collect();
    }

    /// Toggle deny-list filtering of struct selection.
    pub fn set_check_denylist(&mut self, check: bool) {
        self.check_denylist = check;
    }

    /// Run one resolution pass. Tables from a previous pass are discarded.
    pub fn resolve(&mut self) {
        self.collect_structs();
        self.collect_commands();
        self.collect_methods();
    }

    // ==================== Per-symbol resolution ====================

    /// Resolve one parameter or field into its canonical descriptor.
    /// `owner` names the containing struct, function, or interface; a
    /// parent recorded on the symbol itself takes precedence.
    pub fn resolve_value(&self, symbol: &RawSymbol, owner: &str) -> TypeDescriptor {
        let owner = symbol.parent.as_deref().unwrap_or(owner);

        let parsed = decl::classify_declaration(&symbol.declared_type, &self.tables);

        let union_members = self
            .source
            .union_members(&parsed.base_type)
            .map(<[_]>::to_vec)
            .unwrap_or_default();

        let extent = extent::resolve_extent(
            symbol,
            owner,
            &parsed.base_type,
            parsed.pointer_depth,
            &self.tables,
        );

        // Out-pointer semantics only exist for pointer-typed parameters.
        let is_com_outptr = parsed.pointer_depth > 0
            && classify::is_com_outptr(&self.tables, owner, &symbol.name, &symbol.declared_type);

        TypeDescriptor {
            name: symbol.name.clone(),
            base_type: parsed.base_type,
            full_type: symbol.declared_type.clone(),
            pointer_depth: parsed.pointer_depth,
            is_const: parsed.is_const,
            array_length: extent.length,
            array_capacity: extent.capacity,
            array_dimension: extent.dimension,
            bitfield_width: self
                .tables
                .bitfield_width(owner, &symbol.name)
                .unwrap_or_default()
                .to_string(),
            union_members,
            is_com_outptr,
        }
    }

    /// Resolve a bare return-type declaration. Return values have no
    /// owning container and carry no extent, bitfield, or union data.
    pub fn resolve_return(&self, name: &str, declared_type: &str) -> TypeDescriptor {
        let parsed = decl::classify_declaration(declared_type, &self.tables);
        TypeDescriptor {
            name: name.to_string(),
            base_type: parsed.base_type,
            full_type: declared_type.to_string(),
            pointer_depth: parsed.pointer_depth,
            is_const: parsed.is_const,
            ..Default::default()
        }
    }

    // ==================== Selection ====================

    fn is_required_function(function: &FunctionDecl) -> bool {
        function.parent.is_none()
            && !MACRO_PREFIXES
                .iter()
                .any(|prefix| function.name.starts_with(prefix))
            && !GUID_HELPERS.contains(&function.name.as_str())
            && !function.name.starts_with("operator")
    }

    fn is_required_struct(&self, type_name: &str, class: &ClassDecl) -> bool {
        class.declaration_method == DeclarationKind::Struct
            && !(self.check_denylist && self.denylist.contains(&class.name))
            && !type_name.ends_with(VTABLE_SUFFIX)
            && !type_name.contains("::<anon-union-")
    }

    fn is_required_class(class: &ClassDecl) -> bool {
        class.declaration_method == DeclarationKind::Class
    }

    // ==================== Table construction ====================

    fn collect_structs(&mut self) {
        let mut members = IndexMap::new();
        for unit in self.source.header_dict.values() {
            for (type_name, class) in &unit.classes {
                if !self.is_required_struct(type_name, class) {
                    continue;
                }
                let fields = class
                    .properties
                    .public
                    .iter()
                    .map(|field| self.resolve_value(field, type_name))
                    .collect();
                members.insert(type_name.clone(), fields);
            }
        }
        self.struct_members = members;
    }

    fn collect_commands(&mut self) {
        let mut commands = IndexMap::new();
        for unit in self.source.header_dict.values() {
            for function in &unit.functions {
                if !Self::is_required_function(function) {
                    continue;
                }
                commands.insert(
                    function.name.clone(),
                    self.resolve_signature(function, &function.name),
                );
            }
        }
        self.cmd_params = commands;
    }

    fn collect_methods(&mut self) {
        let mut methods = IndexMap::new();
        for unit in self.source.header_dict.values() {
            for (class_name, class) in &unit.classes {
                if !Self::is_required_class(class) {
                    continue;
                }
                for method in &class.methods.public {
                    let key = format!("{}_{}", class_name, method.name);
                    methods.insert(key, self.resolve_signature(method, class_name));
                }
            }
        }
        self.method_params = methods;
    }

    fn resolve_signature(&self, function: &FunctionDecl, owner: &str) -> CommandSignature {
        CommandSignature {
            return_type: decl::normalize_declaration(&function.rtn_type),
            qualifier: String::new(),
            parameters: function
                .parameters
                .iter()
                .map(|param| self.resolve_value(param, owner))
                .collect(),
        }
    }

    // ==================== Accessors ====================

    /// Struct name to field descriptors, in declaration order.
    pub fn struct_members(&self) -> &IndexMap<String, Vec<TypeDescriptor>> {
        &self.struct_members
    }

    /// Free-function name to resolved signature.
    pub fn command_params(&self) -> &IndexMap<String, CommandSignature> {
        &self.cmd_params
    }

    /// `Interface_Method` key to resolved signature.
    pub fn method_params(&self) -> &IndexMap<String, CommandSignature> {
        &self.method_params
    }

    /// All resolved method keys.
    pub fn filtered_method_names(&self) -> Vec<&str> {
        self.method_params.keys().map(String::as_str).collect()
    }

    /// The struct classification list, deny-list filtered when enabled.
    pub fn filtered_struct_names(&self) -> Vec<&str> {
        if self.check_denylist {
            self.source
                .struct_list
                .iter()
                .filter(|name| !self.denylist.contains(name.as_str()))
                .map(String::as_str)
                .collect()
        } else {
            self.source.struct_list.iter().map(String::as_str).collect()
        }
    }

    /// Whether a resolved descriptor denotes a COM interface.
    pub fn is_class(&self, descriptor: &TypeDescriptor) -> bool {
        classify::is_class(descriptor, &self.source)
    }

    /// Serialization type name used when emitting an encode/decode call for
    /// a base type: the encoder primitive when one is mapped, with function
    /// pointers and anonymous unions folded onto their own encoders.
    pub fn invocation_type_name(&self, base_type: &str) -> String {
        let name = self
            .tables
            .encoder_primitive(base_type)
            .unwrap_or(base_type);
        if name == "Function" {
            return "FunctionPtr".to_string();
        }
        if self.source.union_members(name).is_some() {
            return "Union".to_string();
        }
        name.to_string()
    }

    /// The parse dump this resolver reads from.
    pub fn source(&self) -> &SourceDict {
        &self.source
    }

    /// The override tables in effect.
    pub fn tables(&self) -> &OverrideTables {
        &self.tables
    }
}
