pub mod r#type;
pub mod symbol_table;


use colored::Colorize;
use thiserror::Error;

use crate::codegen::{Label, Slot};
use r#type::Type;
use symbol_table::{ParameterTable, SymbolTable};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SymbolError {
    #[error("undefined identifier `{0}`")]
    Undefined(String),

    #[error("duplicate identifier `{0}`")]
    Duplicate(String),

    #[error("`{0}` is not a subroutine")]
    NotASubroutine(String),
}

/// How a name resolves at a use site. Parameters always win over globals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    Parameter(Slot),
    Global(Type),
}

/// All state of one compilation: the global symbol table, the parameter
/// table of the subroutine being parsed and the label counter.
#[derive(Debug, Default)]
pub struct Context {
    symbols: SymbolTable,
    params: ParameterTable,
    label_count: usize,
    current_subroutine: Option<String>,
    scoped_locals: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// With scoped locals, `dim` inside a subroutine no longer reserves the
    /// name in the global table.
    pub fn with_scoped_locals(scoped_locals: bool) -> Self {
        Self {
            scoped_locals,
            ..Self::default()
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn new_label(&mut self) -> Label {
        let label = Label(self.label_count);
        self.label_count += 1;
        label
    }

    pub fn labels_allocated(&self) -> usize {
        self.label_count
    }

    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), SymbolError> {
        self.symbols.declare(name, ty)
    }

    pub fn lookup_type(&self, name: &str) -> Result<Type, SymbolError> {
        self.symbols.lookup_type(name)
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.params.is_parameter(name)
    }

    pub fn parameter_ordinal(&self, name: &str) -> Option<usize> {
        self.params.ordinal(name)
    }

    pub fn clear_parameters(&mut self) {
        self.params.clear();
    }

    pub fn resolve(&self, name: &str) -> Result<Binding, SymbolError> {
        match self.params.slot(name) {
            Some(slot) => Ok(Binding::Parameter(slot)),
            None => self.lookup_type(name).map(Binding::Global),
        }
    }

    pub fn in_subroutine(&self) -> Option<&str> {
        self.current_subroutine.as_deref()
    }

    pub fn enter_subroutine(&mut self, name: &str) -> Result<(), SymbolError> {
        self.declare(name, Type::Subroutine { arity: 0 })?;
        self.params.clear();
        self.current_subroutine = Some(name.to_string());
        Ok(())
    }

    pub fn add_formal(&mut self, name: &str) -> Result<Slot, SymbolError> {
        self.params.add(name).map(|ordinal| self.params.slot_for(ordinal))
    }

    /// Closes the formal list and records the arity on the subroutine, so
    /// recursive calls in the body are checked too.
    pub fn end_formals(&mut self) -> Result<usize, SymbolError> {
        let arity = self.params.close_formals();
        if let Some(name) = &self.current_subroutine {
            self.symbols.set_arity(name, arity)?;
        }
        Ok(arity)
    }

    /// Flat locals reserve their name globally as `Type::Local`, which
    /// no code outside the subroutine can load or store.
    pub fn add_local(&mut self, name: &str, ty: Type) -> Result<Slot, SymbolError> {
        log::trace!("local {} : {}", name, ty);
        if !self.scoped_locals {
            self.declare(name, Type::Local)?;
        }
        self.add_formal(name)
    }

    pub fn leave_subroutine(&mut self) {
        self.params.clear();
        self.current_subroutine = None;
    }

    pub fn dump_symbols(&self) -> String {
        let mut out = format!("{}\n", "::Symbol Table::".bold());
        if self.symbols.is_empty() {
            out.push_str("(empty)\n");
        }
        for (name, ty) in self.symbols.iter() {
            out.push_str(&format!("{:<24}{}\n", name.blue(), ty));
        }
        out
    }
}
