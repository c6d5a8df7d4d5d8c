use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Writes `source` to a fresh directory under the system temp dir and
/// returns the path of the source file.
fn source_file(test: &str, source: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("b4gl-{}-{}", test, process::id()));
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join(format!("{}.bas", test));
    fs::write(&file, source).unwrap();
    file
}

fn b4gl() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

#[test]
fn test_assembly_only() {
    let file = source_file("assembly_only", "dim x\nx = 5\nwrite(x)\n");
    let output = b4gl()
        .arg(&file)
        .args(["-S", "--target", "linux"])
        .output()
        .unwrap();
    println!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.status.success());

    let asm = fs::read_to_string(file.with_extension("asm")).unwrap();
    assert!(asm.contains("v_x:\tdq 0"));
    assert!(asm.contains("main:"));
    assert!(asm.contains("mov\t[v_x], rax"));
    assert!(!file.with_extension("o").exists());
}

#[test]
fn test_output_base() {
    let file = source_file("output_base", "dim y = 1\n");
    let base = file.with_file_name("renamed");
    b4gl()
        .arg(&file)
        .arg("-o")
        .arg(&base)
        .args(["-S", "--target", "windows"])
        .assert()
        .success();

    let asm = fs::read_to_string(base.with_extension("asm")).unwrap();
    assert!(asm.contains("extern exit"));
    assert!(asm.contains("\"%lld\""));
}

#[test]
fn test_emit_ops() {
    let file = source_file("emit_ops", "dim x = 2\nx = x + 3\nwrite(x)\n");
    let output = b4gl().arg(&file).arg("--emit-ops").output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "header\n\
         allocate x : int = 2\n\
         programprologue\n\
         load_variable x\n\
         push\n\
         load_constant 3\n\
         popadd\n\
         store_variable x\n\
         load_variable x\n\
         write\n\
         programepilogue\n"
    );
}

#[test]
fn test_dump_symbols() {
    let file = source_file("dump_symbols", "dim n, name$\nsub f(a)\nendsub\n");
    let output = b4gl()
        .arg(&file)
        .args(["--emit-ops", "--dump-symbols"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let n = stdout.find("int").unwrap();
    let name = stdout.find("string").unwrap();
    let f = stdout.find("subroutine/1").unwrap();
    assert!(n < name && name < f);
}

#[test]
fn test_semantic_error_fails() {
    let file = source_file("semantic_error", "dim x\nx = y + 1\n");
    let output = b4gl().arg(&file).arg("-S").output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("undefined identifier `y`"), "{}", stderr);
    assert!(stderr.contains("Error 2:"), "{}", stderr);
    assert!(!file.with_extension("asm").exists());
}

#[test]
fn test_source_is_never_overwritten() {
    let source = "dim x\nx = 5\nwrite(x)\n";
    let file = source_file("overwrite", source).with_extension("asm");
    fs::write(&file, source).unwrap();

    let output = b4gl()
        .arg(&file)
        .args(["-S", "--target", "linux"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("would overwrite the source file"));
    assert_eq!(fs::read_to_string(&file).unwrap(), source);

    let bare = file.with_extension("");
    fs::write(&bare, source).unwrap();
    let output = b4gl()
        .arg(&bare)
        .args(["--no-run", "--target", "linux"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&bare).unwrap(), source);
}

#[test]
fn test_missing_file() {
    let output = b4gl()
        .arg("no/such/program.bas")
        .arg("-S")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does the file exist?"));
}

#[test]
fn test_scoped_locals() {
    let source = "sub f()\ndim t\nendsub\nsub g()\ndim t\nendsub\n";
    let file = source_file("scoped_locals", source);

    let flat = b4gl().arg(&file).arg("--emit-ops").output().unwrap();
    assert!(!flat.status.success());
    assert!(String::from_utf8_lossy(&flat.stderr).contains("duplicate identifier `t`"));

    b4gl()
        .arg(&file)
        .args(["--emit-ops", "--scoped-locals"])
        .assert()
        .success();
}

fn nasm_and_gcc_available() -> bool {
    ["nasm", "gcc"].iter().all(|tool| {
        process::Command::new(tool)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

#[cfg(target_os = "linux")]
#[test]
fn test_run_recursive_program() {
    if !nasm_and_gcc_available() {
        println!("skipping: nasm or gcc not installed");
        return;
    }

    let source = "\
' sums 1..n recursively
dim total, i = 1
sub sum(n)
    if n > 0
        total = total + n
        sum(n - 1)
    endif
endsub
sum(4)
write(total)
while i < 4
    i = i * 2
wend
write(i, 7 / 2, 0 - 7 / 2)
";
    let file = source_file("run_recursive", source);
    let output = b4gl()
        .arg(&file)
        .args(["--target", "linux"])
        .output()
        .unwrap();
    println!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.ends_with("running\n\n10\n4\n3\n-3\n"), "{}", stdout);
}
