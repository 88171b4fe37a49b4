//! Flo CLI
//!
//! Runs programs handed in as JSON syntax trees, under a capability table.

use std::path::Path;

use floc::commands::{ast_file, check_file, run_file};
use floc::{init_tracing, parse_run_args, CommandError};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let (path, options) = match parse_run_args(&args[2..]) {
                Ok(parsed) => parsed,
                Err(err) => {
                    eprintln!("error: {err}");
                    print_run_usage();
                    std::process::exit(1);
                }
            };
            if let Err(err) = run_file(&path, &options, flo_eval::stdout_handler()) {
                exit_with(&err);
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: flo check <program.json>");
                std::process::exit(1);
            }
            match check_file(Path::new(&args[2])) {
                Ok(problems) if problems.is_empty() => println!("{}: ok", args[2]),
                Ok(problems) => {
                    for problem in &problems {
                        eprintln!("{}: {problem}", args[2]);
                    }
                    eprintln!("{} problem(s) found", problems.len());
                    std::process::exit(1);
                }
                Err(err) => exit_with(&err),
            }
        }
        "ast" => {
            if args.len() < 3 {
                eprintln!("Usage: flo ast <program.json>");
                std::process::exit(1);
            }
            match ast_file(Path::new(&args[2])) {
                Ok(tree) => print!("{tree}"),
                Err(err) => exit_with(&err),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Flo {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare program path means `run` with default options.
            if Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            {
                match parse_run_args(&args[1..]) {
                    Ok((path, options)) => {
                        if let Err(err) = run_file(&path, &options, flo_eval::stdout_handler()) {
                            exit_with(&err);
                        }
                    }
                    Err(err) => {
                        eprintln!("error: {err}");
                        std::process::exit(1);
                    }
                }
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn exit_with(err: &CommandError) -> ! {
    eprintln!("error: {err}");
    if let CommandError::Eval(eval) = err {
        eprint!("{}", eval.backtrace);
    }
    std::process::exit(1);
}

fn print_run_usage() {
    eprintln!("Usage: flo run <program.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --cap-file=<path>   Capability configuration (JSON)");
    eprintln!("  --deny-net          Force the `net` capability off");
    eprintln!("  --deny-fs           Force the `fs` capability off");
    eprintln!("  --deny-db           Force the `db` capability off");
    eprintln!("  --env-file=<path>   KEY=VALUE file served by std/env");
    eprintln!("  --debug             Print the AST before and the result after");
}

fn print_usage() {
    println!("Flo runtime with capability enforcement");
    println!();
    println!("Usage: flo <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <program.json>     Run a program (JSON syntax tree)");
    println!("  check <program.json>   Check a program without running it");
    println!("  ast <program.json>     Print the lowered syntax tree");
    println!("  help                   Show this help message");
    println!("  version                Show version information");
    println!();
    println!("Run options:");
    println!("  --cap-file=<path>      Capability configuration (JSON)");
    println!("  --deny-net, --deny-fs, --deny-db");
    println!("                         Force a capability off");
    println!("  --env-file=<path>      KEY=VALUE file served by std/env");
    println!("  --debug                Print the AST before and the result after");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=flo_eval=debug) for tracing output.");
}
