use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;
use crate::artifact::ArtifactFormat;
use crate::codec::CodecKind;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Pack directories of text files into a single artifact and back")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// YAML file mapping file types to extensions, merged over json/js/ts
    #[clap(long, global = true)]
    pub types: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Bundle a directory into an artifact
    Pack {
        source: PathBuf,
        artifact: PathBuf,
        #[clap(long, short, default_value = "binary", value_enum)]
        format: ArtifactFormat,
        /// Write binary artifacts without compressing them
        #[clap(long)]
        no_compress: bool,
        #[clap(long, short, default_value = "zlib", value_enum)]
        codec: CodecKind,
    },
    /// Materialize an artifact as files and directories
    Unpack {
        artifact: PathBuf,
        output: PathBuf,
        #[clap(long, short, default_value = "binary", value_enum)]
        format: ArtifactFormat,
        #[clap(long, short, default_value = "zlib", value_enum)]
        codec: CodecKind,
    },
    /// Print the folders and files of an artifact
    Inspect {
        artifact: PathBuf,
        #[clap(long, short, default_value = "binary", value_enum)]
        format: ArtifactFormat,
        #[clap(long, short, default_value = "zlib", value_enum)]
        codec: CodecKind,
    },
}
