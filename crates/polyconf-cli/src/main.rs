use clap::{value_parser, Arg, ArgMatches, Command};
use polyconf::CodecRegistry;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Source, Target};

fn input_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .value_parser(value_parser!(PathBuf))
                .help("Input file (standard input if omitted)"),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .short('f')
                .help("Input format (defaults to the input file extension)"),
        )
}

fn cli() -> Command {
    Command::new("polyconf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and inspect configuration files in many formats")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            input_args(Command::new("convert").about("Convert a configuration to another format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file, replaced atomically (standard output if omitted)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output format (defaults to the output file extension, then the input format)"),
                ),
        )
        .subcommand(input_args(Command::new("keys").about("List every key of a configuration")))
        .subcommand(
            input_args(Command::new("get").about("Print the value stored under a key")).arg(
                Arg::new("key")
                    .long("key")
                    .short('k')
                    .required(true)
                    .help("Dotted key, e.g. db.host"),
            ),
        )
        .subcommand(Command::new("formats").about("List supported formats and their aliases"))
}

fn source(args: &ArgMatches) -> Source {
    Source {
        path: args.get_one::<PathBuf>("input").cloned(),
        format: args.get_one::<String>("from").cloned(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = cli().get_matches();
    let registry = CodecRegistry::global();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    match matches.subcommand() {
        Some(("convert", args)) => {
            let target = Target {
                path: args.get_one::<PathBuf>("output").cloned(),
                format: args.get_one::<String>("to").cloned(),
            };
            commands::convert(registry, &source(args), &target, &mut stdin, &mut stdout)
        }
        Some(("keys", args)) => commands::keys(registry, &source(args), &mut stdin, &mut stdout),
        Some(("get", args)) => {
            let key = args
                .get_one::<String>("key")
                .map(String::as_str)
                .unwrap_or_default();
            commands::get(registry, &source(args), key, &mut stdin, &mut stdout)
        }
        Some(("formats", _)) => commands::formats(&mut stdout),
        _ => Ok(()),
    }
}
