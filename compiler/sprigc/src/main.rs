//! sprig CLI.

use sprigc::commands::{lex_file, parse_file, parse_options, run_check};

fn main() {
    sprigc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "lex" => {
            let mut spaces = false;
            let mut file_path = None;
            for arg in args.iter().skip(2) {
                if arg == "--spaces" {
                    spaces = true;
                } else if !arg.starts_with('-') && file_path.is_none() {
                    file_path = Some(arg.as_str());
                }
            }
            let Some(path) = file_path else {
                eprintln!("Usage: sprigc lex <file> [--spaces]");
                std::process::exit(1);
            };
            lex_file(path, spaces);
        }
        "parse" => {
            let Some(path) = args.iter().skip(2).find(|arg| !arg.starts_with('-')) else {
                eprintln!("Usage: sprigc parse <file> [--max-depth=N]");
                std::process::exit(1);
            };
            let options = match parse_options(&args[2..]) {
                Ok(options) => options,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            };
            parse_file(path, options);
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: sprigc check <file>...");
                std::process::exit(1);
            }
            run_check(&args[2..]);
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("sprigc: front end for the sprig markup language");
    println!();
    println!("Usage: sprigc <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file> [--spaces]          Print the token stream");
    println!("  parse <file> [--max-depth=N]   Print the syntax tree");
    println!("  check <file>...                Parse files in parallel, report errors");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=sprig_parse=debug) for tracing output.");
}
