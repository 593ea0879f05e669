use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::exit;

use clap::{Arg, ArgAction, command, value_parser};
use tracing::Level;

use bfopt::{dump, interpret, parse, translate};


fn main() {
    let argv = command!()
        .next_line_help(true)
        .arg(Arg::new("src_file")
            .value_name("SRC_FILE")
            .help("The brainfuck file.")
            .required(true)
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("dump")
            .short('d')
            .long("dump")
            .action(ArgAction::SetTrue)
            .help("Print the optimized operations instead of running them.")
            .required(false))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("Log to stderr. Repeat for more detail.")
            .required(false))
        .get_matches();

    init_logging(argv.get_count("verbose"));

    let src_file = argv.get_one::<PathBuf>("src_file").unwrap();
    let dump_flag = argv.get_flag("dump");

    let code = match fs::read(src_file) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error reading the Brainfuck file {}: {}", src_file.display(), err);
            exit(1);
        },
    };

    let ops = match translate(&parse(&code)) {
        Ok(ops) => ops,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        },
    };

    let stdout = BufWriter::new(io::stdout().lock());
    let result = if dump_flag {
        dump(&ops, stdout)
    } else {
        interpret(&ops, io::stdin().lock(), stdout)
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
