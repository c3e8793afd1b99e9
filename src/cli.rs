use crate::pipeline::RunConfig;
use crate::window::WindowWidth;

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub transfers: std::path::PathBuf,
    pub timestamps: std::path::PathBuf,
    pub chunk_base: std::path::PathBuf,
    pub chunk_map: std::path::PathBuf,
    pub width: WindowWidth,
}

impl Args {
    /// Builds the `clap` command. All arguments are positional.
    fn command() -> clap::Command {
        clap::Command::new("transfer-chunker")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Split a token transfer list into fixed-width time chunks")
            .arg(
                clap::Arg::new("transfers")
                    .help("Transfer list CSV (block_id,contract_id,from_id,to_id,amount), no header")
                    .required(true)
                    .value_parser(clap::value_parser!(std::path::PathBuf)),
            )
            .arg(
                clap::Arg::new("timestamps")
                    .help("Block timestamp CSV (block_id,timestamp), no header")
                    .required(true)
                    .value_parser(clap::value_parser!(std::path::PathBuf)),
            )
            .arg(
                clap::Arg::new("chunk_base")
                    .help("Base name of chunk files; chunk i is written to <CHUNK_BASE>_i.csv")
                    .required(true)
                    .value_parser(clap::value_parser!(std::path::PathBuf)),
            )
            .arg(
                clap::Arg::new("chunk_map")
                    .help("Output TSV mapping each chunk id to its start timestamp")
                    .required(true)
                    .value_parser(clap::value_parser!(std::path::PathBuf)),
            )
            .arg(
                clap::Arg::new("width")
                    .help("Chunk width, e.g. 1D, 6H, 30min, 15T, 90S")
                    .required(true)
                    .value_parser(clap::builder::ValueParser::new(parse_width)),
            )
    }

    /// Parses command-line arguments using `clap`.
    ///
    /// Exits with a usage message if an argument is missing or the width code
    /// is invalid.
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        let path = |name: &str| {
            matches
                .get_one::<std::path::PathBuf>(name)
                .cloned()
                .unwrap_or_default()
        };
        Args {
            transfers: path("transfers"),
            timestamps: path("timestamps"),
            chunk_base: path("chunk_base"),
            chunk_map: path("chunk_map"),
            width: matches
                .get_one::<WindowWidth>("width")
                .cloned()
                .unwrap_or_else(|| unreachable!("width is a required argument")),
        }
    }

    pub fn into_config(self) -> RunConfig {
        RunConfig {
            transfers: self.transfers,
            timestamps: self.timestamps,
            chunk_base: self.chunk_base,
            index: self.chunk_map,
            width: self.width,
        }
    }
}

/// Validates a window width code such as `1D` or `1H`.
fn parse_width(s: &str) -> Result<WindowWidth, String> {
    s.parse::<WindowWidth>().map_err(|e| e.to_string())
}
