//! esfc-drv - Driver
//!
//! The outermost layer: argument parsing, file I/O, pipeline wiring, and
//! exit codes. Everything interesting happens in the phase crates; this
//! one reads the file, runs lex - parse - resolve - print, and writes the
//! result to stdout.
//!
//! Exit codes: 0 on success, 1 on any lex/parse or I/O failure, 3 on a
//! command-line usage error.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use esfc_gen::{print, print_resolved};
use esfc_lex::{Lexer, TokenKind};
use esfc_par::{ParseError, Parser};
use esfc_sem::resolve;
use esfc_util::Diagnostic;

/// Whether the lexer honors the ES3 future-reserved word list. A
/// build-time constant; there is deliberately no CLI hook for it.
pub const CARE_FUTURE_RESERVED: bool = true;

const USAGE: &str = "\
Usage: esfc [options] <file>

Options:
  --print-resolution   annotate the output with resolved variable tags
  --emit-tokens        print the token stream and stop
  --emit-ast           print the AST and stop
  -h, --help           print this help
  -V, --version        print version information
";

/// How far to run the pipeline before emitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitStage {
    /// Lexer output only.
    Tokens,
    /// Parser output only.
    Ast,
    /// The pretty-printed program (default).
    Source,
}

/// One invocation's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The source file.
    pub input: PathBuf,
    /// Use the resolution-annotated printer.
    pub print_resolution: bool,
    /// Pipeline stage to emit.
    pub emit: EmitStage,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum CliRequest {
    Run(Config),
    Help,
    Version,
}

/// Parses command-line arguments (program name already stripped).
pub fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<CliRequest> {
    let mut input = None;
    let mut print_resolution = false;
    let mut emit = EmitStage::Source;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliRequest::Help),
            "-V" | "--version" => return Ok(CliRequest::Version),
            "--print-resolution" => print_resolution = true,
            "--emit-tokens" => emit = EmitStage::Tokens,
            "--emit-ast" => emit = EmitStage::Ast,
            other if other.starts_with('-') => bail!("unknown option '{other}'"),
            _ => {
                if input.is_some() {
                    bail!("more than one input file");
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    let Some(input) = input else {
        bail!("no input file");
    };
    Ok(CliRequest::Run(Config {
        input,
        print_resolution,
        emit,
    }))
}

/// Entry point used by the binary. `args` includes the program name.
pub fn run<I: Iterator<Item = String>>(mut args: I) -> i32 {
    let _program = args.next();
    match parse_args(args) {
        Ok(CliRequest::Help) => {
            print!("{USAGE}");
            0
        }
        Ok(CliRequest::Version) => {
            println!("esfc {}", env!("CARGO_PKG_VERSION"));
            0
        }
        Ok(CliRequest::Run(config)) => Session::new(config).run(),
        Err(e) => {
            eprintln!("error: {e}");
            eprint!("{USAGE}");
            3
        }
    }
}

/// One compilation. Reads the input, runs the pipeline, writes stdout.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the session, returning the process exit code. Diagnostics go
    /// to stderr.
    pub fn run(&self) -> i32 {
        let source = match std::fs::read_to_string(&self.config.input)
            .with_context(|| format!("cannot read {}", self.config.input.display()))
        {
            Ok(source) => source,
            Err(e) => {
                eprintln!("error: {e:#}");
                return 1;
            }
        };

        let output = match self.config.emit {
            EmitStage::Tokens => dump_tokens(&source),
            EmitStage::Ast => dump_ast(&source),
            EmitStage::Source => compile_source(&source, self.config.print_resolution),
        };

        match output {
            Ok(text) => {
                print!("{text}");
                0
            }
            Err(e) => {
                let diag = Diagnostic::error(e.to_string(), e.span()).with_source(&source);
                eprintln!("{}", diag.render());
                1
            }
        }
    }
}

/// The full pipeline on a source string: parse, resolve, pretty-print.
pub fn compile_source(source: &str, print_resolution: bool) -> Result<String, ParseError> {
    let parser = Parser::new(Lexer::new(source, CARE_FUTURE_RESERVED));
    let tree = parser.parse_program()?;
    let resolution = resolve(&tree);
    Ok(if print_resolution {
        print_resolved(&tree.program, &resolution)
    } else {
        print(&tree.program)
    })
}

/// Lexes the whole input and renders one token per line.
fn dump_tokens(source: &str) -> Result<String, ParseError> {
    let mut lexer = Lexer::new(source, CARE_FUTURE_RESERVED);
    let mut out = String::new();
    loop {
        let token = lexer.next().map_err(ParseError::from)?;
        let _ = writeln!(out, "{token}");
        if token.kind == TokenKind::Eof {
            return Ok(out);
        }
    }
}

/// Parses the input and renders the AST debug form.
fn dump_ast(source: &str) -> Result<String, ParseError> {
    let tree = Parser::new(Lexer::new(source, CARE_FUTURE_RESERVED)).parse_program()?;
    Ok(format!("{:#?}\n", tree.program))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_run() {
        let request = parse_args(["--print-resolution", "a.js"].map(String::from).into_iter())
            .expect("args parse");
        match request {
            CliRequest::Run(config) => {
                assert!(config.print_resolution);
                assert_eq!(config.emit, EmitStage::Source);
                assert_eq!(config.input, PathBuf::from("a.js"));
            }
            other => panic!("expected run request, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(std::iter::empty()).is_err());
        assert!(parse_args(["--nope", "a.js"].map(String::from).into_iter()).is_err());
        assert!(parse_args(["a.js", "b.js"].map(String::from).into_iter()).is_err());
    }

    #[test]
    fn test_compile_source_end_to_end() {
        let out = compile_source("var x=1;", false).expect("compile");
        assert_eq!(out, "/* Program */\nvar x = 1;\n");
    }

    #[test]
    fn test_compile_source_resolution_tags() {
        let out = compile_source("var x = 1; x;", true).expect("compile");
        assert_eq!(out, "/* Program */\nvar x<0> = 1;\nx<0>;\n");
    }

    #[test]
    fn test_compile_source_error() {
        assert!(compile_source("var ;", false).is_err());
    }

    #[test]
    fn test_dump_tokens_includes_newlines() {
        let out = dump_tokens("a\nb").expect("lex");
        assert!(out.contains("NEW_LINE"));
        assert!(out.contains("ID (0): a"));
        assert!(out.contains("EOF"));
    }
}
