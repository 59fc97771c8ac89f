use std::env;
use std::fs;
use std::process;

use gmsl::compiler::Compiler;
use gmsl::parser::{self, ParseFailure};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: gmsl <file.gms>");
        process::exit(1);
    }

    let source = fs::read_to_string(&args[1]).unwrap_or_else(|err| {
        eprintln!("Failed to read file: {err}");
        process::exit(1);
    });

    let class = match parser::parse(&source) {
        Ok(class) => class,
        Err(ParseFailure::Lex(errors)) => {
            for err in &errors {
                eprintln!("{err}");
            }
            process::exit(1);
        }
        Err(ParseFailure::Parse(err)) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let assembly = match Compiler::compile(&class) {
        Ok(assembly) => assembly,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    print!("{assembly}");
}
