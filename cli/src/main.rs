use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dynacast::{decode_to_json, enum_descriptor, load_descriptor_pool, message_descriptor, Registry};
use dynacast_compiler::error::CastError;
use dynacast_compiler::{create_enum_map, pascal_to_snake, snake_to_pascal, EnumMap, Mode};

#[derive(Parser)]
#[command(name = "dynacast")]
#[command(about = "Inspect protobuf payloads and enums as dynacast containers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a binary protobuf payload to JSON (printed to stdout)
    Decode {
        /// `FileDescriptorSet` written by `protoc --descriptor_set_out`
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Full name of the payload's message type, e.g. `pkg.Task`
        #[arg(short, long)]
        message: String,

        /// Input payload file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the code/name projection of an enum as JSON
    EnumMap {
        /// `FileDescriptorSet` written by `protoc --descriptor_set_out`
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Full name of the enum, e.g. `pkg.TaskState`
        #[arg(short, long = "enum")]
        enum_type: String,

        /// `int2str` or `str2int`
        #[arg(long, default_value = "int2str")]
        mode: String,

        /// Prefix to strip (defaults to the upper snake case enum name + `_`)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Convert an identifier between snake_case and PascalCase
    Case {
        #[arg(long, value_enum)]
        to: Case,

        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Case {
    Snake,
    Pascal,
}

fn main() -> Result<(), CastError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Decode { descriptor_set, message, input } => {
            let pool = load_descriptor_pool(descriptor_set)?;
            let message_type = message_descriptor(&pool, message)?;
            let mut registry = Registry::new();
            registry.register_message(&message_type)?;

            let payload = fs::read(input)?;
            let json = decode_to_json(&registry, &message_type, &payload)?;
            println!("{}", json);
            Ok(())
        }

        Commands::EnumMap { descriptor_set, enum_type, mode, prefix } => {
            let mode: Mode = mode.parse()?;
            let pool = load_descriptor_pool(descriptor_set)?;
            let enum_type = enum_descriptor(&pool, enum_type)?;

            let json = match create_enum_map(&enum_type, mode, prefix.as_deref())? {
                EnumMap::Int2Str(map) => serde_json::to_string_pretty(&map)?,
                EnumMap::Str2Int(map) => serde_json::to_string_pretty(&map)?,
            };
            println!("{}", json);
            Ok(())
        }

        Commands::Case { to, name } => {
            let converted = match to {
                Case::Snake => pascal_to_snake(name),
                Case::Pascal => snake_to_pascal(name),
            };
            println!("{}", converted);
            Ok(())
        }
    }
}
