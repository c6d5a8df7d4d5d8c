use b4gl::codegen::Target;
use b4gl::parser::ParseError;
use b4gl::toolchain::{Artifacts, Toolchain};
use b4gl::{compile, CompileOptions};
use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path of input source file
    file: PathBuf,

    /// Base path for the generated .asm, object and executable files
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Assembly dialect to generate
    #[arg(long, value_enum, default_value_t = Target::host())]
    target: Target,

    /// Stop after writing the assembly file
    #[arg(long = "assembly-only", short = 'S')]
    assembly_only: bool,

    /// Assemble and link, but do not run the program
    #[arg(long)]
    no_run: bool,

    /// Print the code generation operations instead of building
    #[arg(long)]
    emit_ops: bool,

    /// Keep `dim` inside a subroutine out of the global namespace
    #[arg(long)]
    scoped_locals: bool,

    /// Print the symbol table after compiling
    #[arg(long)]
    dump_symbols: bool,

    /// Trace the parser and the emitted code
    #[arg(long, short)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("could not set up logging: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let text = fs::read_to_string(&cli.file).with_context(|| {
        format!(
            "failed to open file {:?}, does the file exist?",
            cli.file.display()
        )
    })?;

    let options = CompileOptions {
        target: cli.target,
        scoped_locals: cli.scoped_locals,
        emit_ops: cli.emit_ops,
    };
    let compiled = compile(&text, &options)?;

    if cli.dump_symbols {
        print!("{}", compiled.context.dump_symbols());
    }
    if cli.emit_ops {
        print!("{}", compiled.output);
        return Ok(());
    }

    let base = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.file.with_extension(""));
    let artifacts = Artifacts::new(&base, cli.target);
    if let Some(clash) = artifacts.clobbers(&cli.file) {
        bail!(
            "output {} would overwrite the source file, pass a different --output",
            clash.display()
        );
    }
    fs::write(&artifacts.assembly, &compiled.output)
        .with_context(|| format!("failed to write {}", artifacts.assembly.display()))?;
    log::info!("wrote {}", artifacts.assembly.display());

    if cli.assembly_only {
        return Ok(());
    }
    build_and_run(&artifacts, cli)
}

fn build_and_run(artifacts: &Artifacts, cli: &Cli) -> anyhow::Result<()> {
    let toolchain = Toolchain::new(cli.target);

    println!("compiling");
    print!("{}", toolchain.assemble(artifacts)?);
    println!("linking");
    print!("{}", toolchain.link(artifacts)?);

    if !cli.no_run {
        println!("running\n");
        print!("{}", toolchain.execute(artifacts)?);
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ParseError>() {
        Some(ParseError { token, error }) => eprintln!(
            "{}",
            format!(
                "Error {}:{} (at {:?} [{}]):: {}",
                token.line,
                token.span.0,
                token.lexeme,
                token.tok_type.kind(),
                error
            )
            .red()
        ),
        None => eprintln!("{}", format!("Error: {:#}", err).red()),
    }
}
