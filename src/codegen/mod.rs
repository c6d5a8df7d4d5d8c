//! The operations the parser emits through. Every operation appends to the
//! backend's output in call order; nothing is buffered or reordered.
//!
//! The evaluation model is a single accumulator plus the machine stack:
//! loads leave a value in the accumulator, `push_accumulator` saves it, and
//! the `pop_*` operations combine the popped (left) operand with the
//! accumulator (right operand), leaving the result in the accumulator.

pub mod nasm;
pub mod recorder;


use std::fmt::Display;

pub use nasm::{Nasm, Target};
pub use recorder::{Op, Recorder};

use crate::symbols::r#type::Type;

/// Bytes each pushed actual parameter occupies on the stack.
pub const STACK_WORD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub usize);

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A formal parameter or local of the current subroutine: its ordinal and
/// its byte offset from the frame pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub ordinal: usize,
    pub offset: i64,
}

pub trait CodeGen {
    fn emit_header(&mut self);
    fn allocate(&mut self, name: &str, ty: Type, initial: i64);
    fn emit_program_prologue(&mut self);
    fn emit_program_epilogue(&mut self);

    fn load_constant(&mut self, value: i64);
    fn load_variable(&mut self, name: &str);
    fn load_parameter(&mut self, slot: Slot);
    fn store_variable(&mut self, name: &str);
    fn store_parameter(&mut self, slot: Slot);

    fn push_accumulator(&mut self);
    fn pop_add(&mut self);
    fn pop_sub(&mut self);
    fn pop_mul(&mut self);
    fn pop_div(&mut self);
    fn pop_compare(&mut self);
    fn pop_and(&mut self);
    fn pop_or(&mut self);
    fn pop_xor(&mut self);
    fn clear_accumulator(&mut self);
    fn negate_boolean(&mut self);

    fn set_equal(&mut self);
    fn set_not_equal(&mut self);
    fn set_less(&mut self);
    fn set_greater(&mut self);
    fn set_less_or_equal(&mut self);
    fn set_greater_or_equal(&mut self);

    fn branch(&mut self, label: Label);
    fn branch_if_false(&mut self, label: Label);
    fn post_label(&mut self, label: Label);

    fn call_subroutine(&mut self, name: &str);
    fn clean_stack(&mut self, bytes: usize);
    fn subroutine_prologue(&mut self, name: &str, local_count: usize);
    fn subroutine_epilogue(&mut self, local_count: usize);

    fn read_into(&mut self, name: &str);
    fn read_into_parameter(&mut self, slot: Slot);
    fn write_value(&mut self);

    /// Hands over everything emitted so far and leaves the backend empty.
    fn take_output(&mut self) -> String;
}
