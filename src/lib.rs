use codegen::{CodeGen, Nasm, Recorder, Target};
use parser::{ParseResult, Parser};
use symbols::Context;

pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod toolchain;

#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    pub target: Target,
    /// Keep subroutine locals out of the global symbol table.
    pub scoped_locals: bool,
    /// Record the code-generation calls instead of emitting assembly.
    pub emit_ops: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            target: Target::host(),
            scoped_locals: false,
            emit_ops: false,
        }
    }
}

impl CompileOptions {
    pub fn backend(&self) -> Box<dyn CodeGen> {
        if self.emit_ops {
            Box::new(Recorder::new())
        } else {
            Box::new(Nasm::new(self.target))
        }
    }
}

pub struct Compiled {
    pub output: String,
    pub context: Context,
}

/// Runs the one-pass translator over `input`, emitting into `gen`.
pub fn translate<G: CodeGen + ?Sized>(
    input: &str,
    context: &mut Context,
    gen: &mut G,
) -> ParseResult<()> {
    Parser::new(input, context, gen)?.program()
}

pub fn compile(input: &str, options: &CompileOptions) -> anyhow::Result<Compiled> {
    let mut context = Context::with_scoped_locals(options.scoped_locals);
    let mut gen = options.backend();

    translate(input, &mut context, gen.as_mut())?;
    log::debug!(
        "translated {} symbol(s), {} label(s)",
        context.symbols().len(),
        context.labels_allocated()
    );

    Ok(Compiled {
        output: gen.take_output(),
        context,
    })
}
