use opslang::{ExecResult, Executor, Grammar, OpsError, OpsProgram, Parser, TraceConfig, TraceFormat};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut path = PathBuf::from("program.txt");
    let mut quiet = false;
    let mut trace_json = false;
    for (i, arg) in args.iter().enumerate() {
        match arg.as_str() {
            "--quiet" | "-q" => quiet = true,
            "--trace-json" => trace_json = true,
            other if i == 0 && !other.starts_with('-') => path = PathBuf::from(other),
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(2);
            }
        }
    }

    let source = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Could not read {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&source, quiet, trace_json) {
        eprintln!("{} error: {}", e.category(), e);
        process::exit(1);
    }
}

fn print_usage() {
    println!("Usage: opslang [path] [options]");
    println!();
    println!("Compiles the program at `path` (default: program.txt) to OPS code");
    println!("and executes it.");
    println!();
    println!("Options:");
    println!("  --quiet, -q     Suppress the derivation trace and OPS listing");
    println!("  --trace-json    Print the derivation trace as JSON Lines");
    println!("  --help, -h      Show this help");
}

fn run(source: &str, quiet: bool, trace_json: bool) -> Result<(), OpsError> {
    let mut parser = Parser::new(Grammar::standard());
    parser.set_trace(TraceConfig {
        enabled: !quiet || trace_json,
        format: if trace_json { TraceFormat::JsonLines } else { TraceFormat::Text },
    });

    let program = parser.parse(source)?;

    if !quiet {
        println!("Source:");
        println!("{}", source);
        println!();
        for line in parser.trace().render() {
            println!("{}", line);
        }
        println!();
        print_program(&program);
        println!();
    } else if trace_json {
        for line in parser.trace().render() {
            println!("{}", line);
        }
    }

    let mut executor = Executor::new();
    let result = executor.execute(&program)?;
    print_result(&result);
    Ok(())
}

fn print_program(program: &OpsProgram) {
    println!("OPS:");
    println!("{}", program);
    println!();
    println!("OPS (value, kind):");
    for element in program.iter() {
        println!("{}", element);
    }
}

fn print_result(result: &ExecResult) {
    println!("Execution output:");
    if result.output.is_empty() {
        println!("(no output)");
    } else {
        for line in &result.output {
            println!("{}", line);
        }
    }

    println!();
    println!("Variable state:");
    let mut names: Vec<&String> = result.variables.keys().collect();
    names.sort();
    for name in names {
        println!("{} = {}", name, result.variables[name]);
    }
}
