use std::collections::HashMap;

use ordermap::OrderMap;

use super::r#type::Type;
use super::SymbolError;
use crate::codegen::Slot;

/// Global names in declaration order. Entries are never removed.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: OrderMap<String, Type>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), SymbolError> {
        if self.contains(name) {
            return Err(SymbolError::Duplicate(name.to_string()));
        }
        self.entries.insert(name.to_string(), ty);
        Ok(())
    }

    pub fn lookup_type(&self, name: &str) -> Result<Type, SymbolError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| SymbolError::Undefined(name.to_string()))
    }

    pub fn set_arity(&mut self, name: &str, arity: usize) -> Result<(), SymbolError> {
        match self.entries.get_mut(name) {
            Some(ty @ Type::Subroutine { .. }) => {
                *ty = Type::Subroutine { arity };
                Ok(())
            }
            Some(_) => Err(SymbolError::NotASubroutine(name.to_string())),
            None => Err(SymbolError::Undefined(name.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Type)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Return address and saved frame pointer sit between the formals and the
// first local.
const FRAME_LINKAGE_SLOTS: usize = 2;

/// Formals and locals of the subroutine being parsed, by 1-based ordinal.
#[derive(Debug, Default)]
pub struct ParameterTable {
    params: HashMap<String, usize>,
    count: usize,
    base: usize,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.params.clear();
        self.count = 0;
        self.base = 0;
    }

    pub fn add(&mut self, name: &str) -> Result<usize, SymbolError> {
        if self.is_parameter(name) {
            return Err(SymbolError::Duplicate(name.to_string()));
        }
        self.count += 1;
        self.params.insert(name.to_string(), self.count);
        Ok(self.count)
    }

    /// Marks the end of the formal list. Everything added afterwards is a
    /// local and lives below the frame pointer.
    pub fn close_formals(&mut self) -> usize {
        self.base = self.count;
        self.count += FRAME_LINKAGE_SLOTS;
        self.base
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.params.get(name).copied()
    }

    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.ordinal(name).map(|ordinal| self.slot_for(ordinal))
    }

    /// Formals were pushed left to right by the caller, so the last one is
    /// nearest the saved frame pointer.
    pub fn slot_for(&self, ordinal: usize) -> Slot {
        let offset = 16 + 8 * (self.base as i64 - ordinal as i64);
        Slot { ordinal, offset }
    }
}
