use super::{CodeGen, Label, Slot};
use crate::symbols::r#type::Type;

const INDENT: &str = "    ";

// True is all ones so `not` flips it to false.
const SET_BOOLEAN: [&str; 2] = ["movzx\trax, al", "neg\trax"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    /// x86-64 ELF, linked against libc with gcc
    Linux,
    /// x86-64 PE, linked against msvcrt with GoLink
    Windows,
}

impl Target {
    pub fn host() -> Self {
        if cfg!(windows) {
            Target::Windows
        } else {
            Target::Linux
        }
    }

    fn int_format(&self) -> &'static str {
        match self {
            Target::Linux => "%ld",
            Target::Windows => "%lld",
        }
    }

    /// First and second integer argument registers.
    fn arg_registers(&self) -> (&'static str, &'static str) {
        match self {
            Target::Linux => ("rdi", "rsi"),
            Target::Windows => ("rcx", "rdx"),
        }
    }

    fn call(&self, function: &str) -> String {
        match self {
            Target::Linux => format!("call\t{} wrt ..plt", function),
            Target::Windows => format!("call\t{}", function),
        }
    }
}

/// NASM x86-64 text. Variables are static quadwords, the accumulator is
/// `rax` and `rcx` is the scratch register for popped operands.
#[derive(Debug)]
pub struct Nasm {
    target: Target,
    output: String,
}

impl Nasm {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            output: String::new(),
        }
    }

    fn emit(&mut self, line: &str) {
        log::trace!("emit {}", line);
        self.output.push_str(INDENT);
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_all(&mut self, lines: &[&str]) {
        lines.iter().for_each(|line| self.emit(line));
    }

    fn emit_label(&mut self, label: &str) {
        log::trace!("emit {}:", label);
        self.output.push_str(label);
        self.output.push_str(":\n");
    }

    fn pop_combine(&mut self, instruction: &str) {
        self.emit("pop\trcx");
        self.emit(&format!("{}\trax, rcx", instruction));
    }

    fn set_flag(&mut self, setcc: &str) {
        self.emit(&format!("{}\tal", setcc));
        self.emit_all(&SET_BOOLEAN);
    }

    // C calls need a 16 byte aligned stack, which expression pushes do not
    // keep. rbx is callee saved, so it holds the old stack pointer.
    fn call_c(&mut self, function: &str, format: &str, value: &str) {
        let (first, second) = self.target.arg_registers();
        self.emit_all(&["push\trbx", "mov\trbx, rsp", "and\trsp, -16"]);
        if self.target == Target::Windows {
            self.emit("sub\trsp, 32");
        }
        self.emit(&format!("{}\t{}, {}", mnemonic(value), second, value));
        self.emit(&format!("lea\t{}, [{}]", first, format));
        self.emit("xor\teax, eax");
        let call = self.target.call(function);
        self.emit(&call);
        self.emit_all(&["mov\trsp, rbx", "pop\trbx"]);
    }
}

fn mnemonic(operand: &str) -> &'static str {
    if operand.starts_with('[') {
        "lea"
    } else {
        "mov"
    }
}

fn variable(name: &str) -> String {
    format!("v_{}", name)
}

fn subroutine(name: &str) -> String {
    format!("s_{}", name)
}

fn frame(slot: Slot) -> String {
    format!("[rbp{:+}]", slot.offset)
}

impl CodeGen for Nasm {
    fn emit_header(&mut self) {
        self.emit_all(&["default rel", "global main", "extern printf", "extern scanf"]);
        if self.target == Target::Windows {
            self.emit("extern exit");
        }
        self.output.push('\n');
        self.emit("section .data");
        let format = self.target.int_format();
        self.output
            .push_str(&format!("fmt_write:\tdb \"{}\", 10, 0\n", format));
        self.output
            .push_str(&format!("fmt_read:\tdb \"{}\", 0\n", format));
    }

    fn allocate(&mut self, name: &str, ty: Type, initial: i64) {
        log::trace!("allocate {} ({})", name, ty);
        self.output
            .push_str(&format!("{}:\tdq {}\n", variable(name), initial));
    }

    fn emit_program_prologue(&mut self) {
        self.output.push('\n');
        self.emit("section .text");
        self.emit_label("main");
        self.emit_all(&["push\trbp", "mov\trbp, rsp"]);
    }

    fn emit_program_epilogue(&mut self) {
        match self.target {
            Target::Linux => {
                self.emit_all(&["xor\teax, eax", "mov\trsp, rbp", "pop\trbp", "ret"]);
                self.output.push('\n');
                self.emit("section .note.GNU-stack noalloc noexec nowrite progbits");
            }
            // returning from the entry point would skip flushing stdout
            Target::Windows => {
                self.emit_all(&["and\trsp, -16", "sub\trsp, 32", "xor\tecx, ecx"]);
                let call = self.target.call("exit");
                self.emit(&call);
            }
        }
    }

    fn load_constant(&mut self, value: i64) {
        self.emit(&format!("mov\trax, {}", value));
    }

    fn load_variable(&mut self, name: &str) {
        self.emit(&format!("mov\trax, [{}]", variable(name)));
    }

    fn load_parameter(&mut self, slot: Slot) {
        self.emit(&format!("mov\trax, {}", frame(slot)));
    }

    fn store_variable(&mut self, name: &str) {
        self.emit(&format!("mov\t[{}], rax", variable(name)));
    }

    fn store_parameter(&mut self, slot: Slot) {
        self.emit(&format!("mov\t{}, rax", frame(slot)));
    }

    fn push_accumulator(&mut self) {
        self.emit("push\trax");
    }

    fn pop_add(&mut self) {
        self.pop_combine("add");
    }

    fn pop_sub(&mut self) {
        self.pop_combine("sub");
        self.emit("neg\trax");
    }

    fn pop_mul(&mut self) {
        self.pop_combine("imul");
    }

    fn pop_div(&mut self) {
        self.emit_all(&["mov\trcx, rax", "pop\trax", "cqo", "idiv\trcx"]);
    }

    fn pop_compare(&mut self) {
        self.emit_all(&["pop\trcx", "cmp\trcx, rax"]);
    }

    fn pop_and(&mut self) {
        self.pop_combine("and");
    }

    fn pop_or(&mut self) {
        self.pop_combine("or");
    }

    fn pop_xor(&mut self) {
        self.pop_combine("xor");
    }

    fn clear_accumulator(&mut self) {
        self.emit("xor\trax, rax");
    }

    fn negate_boolean(&mut self) {
        self.emit("not\trax");
    }

    fn set_equal(&mut self) {
        self.set_flag("sete");
    }

    fn set_not_equal(&mut self) {
        self.set_flag("setne");
    }

    fn set_less(&mut self) {
        self.set_flag("setl");
    }

    fn set_greater(&mut self) {
        self.set_flag("setg");
    }

    fn set_less_or_equal(&mut self) {
        self.set_flag("setle");
    }

    fn set_greater_or_equal(&mut self) {
        self.set_flag("setge");
    }

    fn branch(&mut self, label: Label) {
        self.emit(&format!("jmp\t{}", label));
    }

    fn branch_if_false(&mut self, label: Label) {
        self.emit("test\trax, rax");
        self.emit(&format!("jz\t{}", label));
    }

    fn post_label(&mut self, label: Label) {
        self.emit_label(&label.to_string());
    }

    fn call_subroutine(&mut self, name: &str) {
        self.emit(&format!("call\t{}", subroutine(name)));
    }

    fn clean_stack(&mut self, bytes: usize) {
        if bytes > 0 {
            self.emit(&format!("add\trsp, {}", bytes));
        }
    }

    fn subroutine_prologue(&mut self, name: &str, local_count: usize) {
        self.emit_label(&subroutine(name));
        self.emit_all(&["push\trbp", "mov\trbp, rsp"]);
        if local_count > 0 {
            self.emit(&format!("sub\trsp, {}", 8 * local_count));
        }
    }

    fn subroutine_epilogue(&mut self, _local_count: usize) {
        self.emit_all(&["mov\trsp, rbp", "pop\trbp", "ret"]);
    }

    fn read_into(&mut self, name: &str) {
        let target = format!("[{}]", variable(name));
        self.call_c("scanf", "fmt_read", &target);
    }

    fn read_into_parameter(&mut self, slot: Slot) {
        self.call_c("scanf", "fmt_read", &frame(slot));
    }

    fn write_value(&mut self) {
        self.call_c("printf", "fmt_write", "rax");
    }

    fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
