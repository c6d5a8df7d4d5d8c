use std::fmt::Display;

use super::{CodeGen, Label, Slot};
use crate::symbols::r#type::Type;

/// One call on the code-generation contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Header,
    Allocate(String, Type, i64),
    ProgramPrologue,
    ProgramEpilogue,
    LoadConstant(i64),
    LoadVariable(String),
    LoadParameter(Slot),
    StoreVariable(String),
    StoreParameter(Slot),
    Push,
    PopAdd,
    PopSub,
    PopMul,
    PopDiv,
    PopCompare,
    PopAnd,
    PopOr,
    PopXor,
    Clear,
    Not,
    SetEqual,
    SetNotEqual,
    SetLess,
    SetGreater,
    SetLessOrEqual,
    SetGreaterOrEqual,
    Branch(Label),
    BranchIfFalse(Label),
    PostLabel(Label),
    Call(String),
    CleanStack(usize),
    SubroutinePrologue(String, usize),
    SubroutineEpilogue(usize),
    ReadInto(String),
    ReadIntoParameter(Slot),
    Write,
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Allocate(name, ty, init) => write!(f, "allocate {} : {} = {}", name, ty, init),
            Op::LoadConstant(n) => write!(f, "load_constant {}", n),
            Op::LoadVariable(name) => write!(f, "load_variable {}", name),
            Op::LoadParameter(slot) => {
                write!(f, "load_parameter #{} [{:+}]", slot.ordinal, slot.offset)
            }
            Op::StoreVariable(name) => write!(f, "store_variable {}", name),
            Op::StoreParameter(slot) => {
                write!(f, "store_parameter #{} [{:+}]", slot.ordinal, slot.offset)
            }
            Op::Branch(l) => write!(f, "branch {}", l),
            Op::BranchIfFalse(l) => write!(f, "branch_if_false {}", l),
            Op::PostLabel(l) => write!(f, "{}:", l),
            Op::Call(name) => write!(f, "call {}", name),
            Op::CleanStack(n) => write!(f, "clean_stack {}", n),
            Op::SubroutinePrologue(name, n) => write!(f, "subroutine_prologue {} {}", name, n),
            Op::SubroutineEpilogue(n) => write!(f, "subroutine_epilogue {}", n),
            Op::ReadInto(name) => write!(f, "read_into {}", name),
            Op::ReadIntoParameter(slot) => {
                write!(f, "read_into_parameter #{} [{:+}]", slot.ordinal, slot.offset)
            }
            op => write!(f, "{}", format!("{:?}", op).to_lowercase()),
        }
    }
}

/// Backend that keeps the sequence of contract calls instead of text.
#[derive(Debug, Default)]
pub struct Recorder {
    ops: Vec<Op>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    fn record(&mut self, op: Op) {
        log::trace!("emit {}", op);
        self.ops.push(op);
    }
}

impl CodeGen for Recorder {
    fn emit_header(&mut self) {
        self.record(Op::Header)
    }
    fn allocate(&mut self, name: &str, ty: Type, initial: i64) {
        self.record(Op::Allocate(name.to_string(), ty, initial))
    }
    fn emit_program_prologue(&mut self) {
        self.record(Op::ProgramPrologue)
    }
    fn emit_program_epilogue(&mut self) {
        self.record(Op::ProgramEpilogue)
    }
    fn load_constant(&mut self, value: i64) {
        self.record(Op::LoadConstant(value))
    }
    fn load_variable(&mut self, name: &str) {
        self.record(Op::LoadVariable(name.to_string()))
    }
    fn load_parameter(&mut self, slot: Slot) {
        self.record(Op::LoadParameter(slot))
    }
    fn store_variable(&mut self, name: &str) {
        self.record(Op::StoreVariable(name.to_string()))
    }
    fn store_parameter(&mut self, slot: Slot) {
        self.record(Op::StoreParameter(slot))
    }
    fn push_accumulator(&mut self) {
        self.record(Op::Push)
    }
    fn pop_add(&mut self) {
        self.record(Op::PopAdd)
    }
    fn pop_sub(&mut self) {
        self.record(Op::PopSub)
    }
    fn pop_mul(&mut self) {
        self.record(Op::PopMul)
    }
    fn pop_div(&mut self) {
        self.record(Op::PopDiv)
    }
    fn pop_compare(&mut self) {
        self.record(Op::PopCompare)
    }
    fn pop_and(&mut self) {
        self.record(Op::PopAnd)
    }
    fn pop_or(&mut self) {
        self.record(Op::PopOr)
    }
    fn pop_xor(&mut self) {
        self.record(Op::PopXor)
    }
    fn clear_accumulator(&mut self) {
        self.record(Op::Clear)
    }
    fn negate_boolean(&mut self) {
        self.record(Op::Not)
    }
    fn set_equal(&mut self) {
        self.record(Op::SetEqual)
    }
    fn set_not_equal(&mut self) {
        self.record(Op::SetNotEqual)
    }
    fn set_less(&mut self) {
        self.record(Op::SetLess)
    }
    fn set_greater(&mut self) {
        self.record(Op::SetGreater)
    }
    fn set_less_or_equal(&mut self) {
        self.record(Op::SetLessOrEqual)
    }
    fn set_greater_or_equal(&mut self) {
        self.record(Op::SetGreaterOrEqual)
    }
    fn branch(&mut self, label: Label) {
        self.record(Op::Branch(label))
    }
    fn branch_if_false(&mut self, label: Label) {
        self.record(Op::BranchIfFalse(label))
    }
    fn post_label(&mut self, label: Label) {
        self.record(Op::PostLabel(label))
    }
    fn call_subroutine(&mut self, name: &str) {
        self.record(Op::Call(name.to_string()))
    }
    fn clean_stack(&mut self, bytes: usize) {
        self.record(Op::CleanStack(bytes))
    }
    fn subroutine_prologue(&mut self, name: &str, local_count: usize) {
        self.record(Op::SubroutinePrologue(name.to_string(), local_count))
    }
    fn subroutine_epilogue(&mut self, local_count: usize) {
        self.record(Op::SubroutineEpilogue(local_count))
    }
    fn read_into(&mut self, name: &str) {
        self.record(Op::ReadInto(name.to_string()))
    }
    fn read_into_parameter(&mut self, slot: Slot) {
        self.record(Op::ReadIntoParameter(slot))
    }
    fn write_value(&mut self) {
        self.record(Op::Write)
    }

    fn take_output(&mut self) -> String {
        std::mem::take(&mut self.ops)
            .iter()
            .map(|op| format!("{}\n", op))
            .collect()
    }
}
