use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::slice;
use clap::{Command, Arg, ArgMatches, crate_version};

use loxwalk::frontend;
use loxwalk::source::{ModuleSource, SourceType, SourceText, ParseContext};
use loxwalk::parser::stmt::{Stmt, StmtMeta};
use loxwalk::interpreter::Interpreter;
use loxwalk::debug::SourceError;
use loxwalk::debug::symbol::{BufferedResolver, DebugSymbolResolver};


const EXIT_BUILD_ERROR: i32 = 65;
const EXIT_RUNTIME_ERROR: i32 = 70;

fn main() {
    env_logger::init();

    let exit_code = run_main();
    process::exit(exit_code);
}

fn run_main() -> i32 {
    let app = Command::new("loxwalk")
        .version(crate_version!())
        .about("A tree-walking interpreter for a small class-based scripting language")
        .arg(
            Arg::new("file")
            .index(1)
            .help("Path to input script file")
            .value_name("FILE")
        )
        .arg(
            Arg::new("cmd")
            .short('c')
            .help("Execute a snippet then exit")
            .value_name("CMD")
            .conflicts_with("file")
        )
        .arg(
            Arg::new("interactive")
            .short('i')
            .help("Drop into an interactive REPL after executing")
        )
        .arg(
            Arg::new("parse_only")
            .short('P')
            .help("Parse and print AST instead of executing")
        );

    let args = app.get_matches();

    let module = match input_module(&args) {
        Some(module) => module,
        None => {
            Repl::new(Session::new()).run();
            return 0;
        },
    };

    if args.is_present("parse_only") {
        return parse_and_print_ast(&module);
    }

    let mut session = Session::new();
    let exit_code = session.run_module(&module);

    if args.is_present("interactive") {
        Repl::new(session).run();
    }

    exit_code
}

fn input_module(args: &ArgMatches) -> Option<ModuleSource> {
    if let Some(s) = args.value_of("cmd") {
        let source = SourceType::String(s.to_string());
        return Some(ModuleSource::new("<cmd>", source));
    }

    args.value_of("file").map(|s| {
        let source = SourceType::File(PathBuf::from(s));
        ModuleSource::new(s, source)
    })
}

fn parse_and_print_ast(module: &ModuleSource) -> i32 {
    let source_text = match module.source_text() {
        Ok(source_text) => source_text,

        Err(error) => {
            eprintln!("Error reading source: {}.", error);
            return EXIT_BUILD_ERROR;
        },
    };

    match loxwalk::parse_source(&mut ParseContext::new(), source_text) {
        Err(errors) => {
            eprintln!("Errors in {}:\n", module.name());
            frontend::print_source_errors(module, &errors[..]);
            EXIT_BUILD_ERROR
        },

        Ok(ast) => {
            println!("{:#?}", ast);
            0
        },
    }
}


/// The parse context and interpreter both have to outlive a single input
struct Session {
    parse_ctx: ParseContext,
    interpreter: Interpreter,
}

impl Session {
    fn new() -> Self {
        Self {
            parse_ctx: ParseContext::new(),
            interpreter: Interpreter::new(Box::new(io::stdout())),
        }
    }

    fn run_module(&mut self, module: &ModuleSource) -> i32 {
        let ast = match loxwalk::build_module(&mut self.parse_ctx, module) {
            Ok(ast) => ast,
            Err(errors) => {
                loxwalk::print_build_errors(&errors, module.name(), module);
                return EXIT_BUILD_ERROR;
            },
        };

        if let Err(error) = self.interpreter.execute(ast) {
            print_runtime_error(module, error.as_ref());
            return EXIT_RUNTIME_ERROR;
        }

        0
    }
}

fn print_runtime_error(resolver: &impl DebugSymbolResolver, error: &impl SourceError) {
    io::stdout().flush().ok();
    frontend::print_source_errors(resolver, slice::from_ref(error));
}


//////// REPL ////////


const PROMPT_START: &str = ">>> ";
const PROMPT_CONTINUE: &str = "... ";

struct Repl {
    session: Session,
}

enum ReadLine {
    Ok(String),
    Empty,
    Restart,
    Quit,
}

impl Repl {
    fn new(session: Session) -> Self {
        Self { session }
    }

    fn read_line(&self, prompt: &'static str) -> ReadLine {
        print!("{}", prompt);
        io::stdout().flush().ok();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => return ReadLine::Quit,  // EOF
            Ok(..) => { },
            Err(error) => {
                eprintln!("Could not read input: {}", error);
                return ReadLine::Restart;
            },
        }

        let input = input.trim_end();

        if input.is_empty() {
            return ReadLine::Empty;
        }

        if input == "quit" {
            return ReadLine::Quit;
        }

        ReadLine::Ok(input.to_string())
    }

    fn run(&mut self) {
        println!("\nloxwalk {}\n", crate_version!());

        loop {
            let mut input = String::new();

            // keep reading while the input runs off the end, an empty line forces it through
            loop {
                let prompt =
                    if input.is_empty() { PROMPT_START }
                    else { PROMPT_CONTINUE };

                match self.read_line(prompt) {
                    ReadLine::Quit => {
                        println!();
                        return;
                    },
                    ReadLine::Restart => continue,
                    ReadLine::Empty => {
                        if input.is_empty() { continue }
                        else { break }
                    },
                    ReadLine::Ok(line) => {
                        input.push_str(&line);
                        input.push('\n');

                        if !is_incomplete(&input) {
                            break
                        }
                    },
                }
            }

            self.exec_input(input);
        }
    }

    fn exec_input(&mut self, input: String) {
        let resolver = BufferedResolver::new(&input);

        let parse_result = loxwalk::parse_source(&mut self.session.parse_ctx, SourceText::from(input));
        let mut ast = match parse_result {
            Ok(ast) => ast,
            Err(errors) => {
                frontend::print_source_errors(&resolver, &errors[..]);
                return;
            },
        };

        // if the last stmt is an expression statement, echo its value
        if let Some(stmt) = ast.pop() {
            let (mut stmt, symbol) = stmt.take();
            if let Stmt::Expression(expr) = stmt {
                stmt = Stmt::Print(expr);
            }
            ast.push(StmtMeta::new(stmt, symbol))
        }

        let ast = match loxwalk::resolve_ast(ast) {
            Ok(ast) => ast,
            Err(errors) => {
                frontend::print_source_errors(&resolver, &errors[..]);
                return;
            },
        };

        if let Err(error) = self.session.interpreter.execute(ast) {
            print_runtime_error(&resolver, error.as_ref());
        }
    }
}

// true if parsing failed because it ran into the end of the input
fn is_incomplete(input: &str) -> bool {
    let end = input.trim_end().chars().count();

    match loxwalk::parse_source(&mut ParseContext::new(), SourceText::from(input.to_string())) {
        Ok(..) => false,
        Err(errors) => errors.iter()
            .filter_map(|error| error.debug_symbol())
            .any(|symbol| symbol.end() >= end),
    }
}
