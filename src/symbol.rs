//! The universe of names: variables, parameters, functions, and labels.
//!
//! Every symbol is identified by a private, monotonically increasing id
//! assigned at construction — the same identity-by-index approach the
//! teacher uses for `NamespaceId`/`StringId` rather than comparing by name.
//! Two `VariableSymbol`s named `x` declared in different scopes are never
//! equal.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SymbolId(u64);

impl SymbolId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Discriminates what kind of name a symbol refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum SymbolKind {
    GlobalVariable,
    LocalVariable,
    Parameter,
    Function,
    Label,
}

/// A variable, parameter, or global binding.
#[derive(Clone)]
pub struct VariableSymbol {
    id: SymbolId,
    pub name: String,
    pub ty: Type,
    pub is_read_only: bool,
    pub kind: SymbolKind,
}

impl VariableSymbol {
    fn new(name: impl Into<String>, ty: Type, is_read_only: bool, kind: SymbolKind) -> Self {
        Self {
            id: SymbolId::next(),
            name: name.into(),
            ty,
            is_read_only,
            kind,
        }
    }

    #[must_use]
    pub fn new_global(name: impl Into<String>, ty: Type, is_read_only: bool) -> Self {
        Self::new(name, ty, is_read_only, SymbolKind::GlobalVariable)
    }

    #[must_use]
    pub fn new_local(name: impl Into<String>, ty: Type, is_read_only: bool) -> Self {
        Self::new(name, ty, is_read_only, SymbolKind::LocalVariable)
    }

    #[must_use]
    pub fn new_parameter(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, ty, true, SymbolKind::Parameter)
    }
}

impl fmt::Debug for VariableSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableSymbol")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .field("is_read_only", &self.is_read_only)
            .finish()
    }
}

impl PartialEq for VariableSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for VariableSymbol {}

impl std::hash::Hash for VariableSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A user-defined or built-in function's signature.
pub struct FunctionSymbol {
    id: SymbolId,
    pub name: String,
    pub parameters: Vec<std::rc::Rc<VariableSymbol>>,
    pub return_type: Type,
}

impl FunctionSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: Vec<std::rc::Rc<VariableSymbol>>, return_type: Type) -> Self {
        Self {
            id: SymbolId::next(),
            name: name.into(),
            parameters,
            return_type,
        }
    }
}

impl fmt::Debug for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSymbol")
            .field("name", &self.name)
            .field("arity", &self.parameters.len())
            .field("return_type", &self.return_type)
            .finish()
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for FunctionSymbol {}

impl std::hash::Hash for FunctionSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A unique jump target inside a single function body.
#[derive(Clone)]
pub struct BoundLabel {
    id: SymbolId,
    pub name: String,
}

impl BoundLabel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SymbolId::next(),
            name: name.into(),
        }
    }
}

impl fmt::Debug for BoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundLabel({})", self.name)
    }
}

impl PartialEq for BoundLabel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for BoundLabel {}

impl std::hash::Hash for BoundLabel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
