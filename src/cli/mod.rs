use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::{Compression, JobConfig, JobOptions};
use crate::error::PackError;
use crate::runner::Job;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Pack files matched by glob patterns into a ZIP archive.
    #[command(alias = "p")]
    Pack {
        /// Glob patterns selecting the entries to pack.
        #[arg(required = true)]
        patterns: Vec<String>,

        /// The path for the output archive file.
        #[arg(short, long)]
        output: PathBuf,

        /// Working root the patterns expand under. Defaults to the current directory.
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Match hidden (leading-dot) entries with wildcards.
        #[arg(long)]
        dot: bool,

        /// Store entries uncompressed instead of using DEFLATE.
        #[arg(long)]
        store: bool,

        /// DEFLATE compression level (1 = best speed, 9 = best compression). Ignored with --store.
        #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u32).range(1..=9))]
        level: u32,
    },

    /// Unpack ZIP archives into a destination directory.
    #[command(alias = "u")]
    Unpack {
        /// The archives to unpack.
        #[arg(required = true)]
        archives: Vec<String>,

        /// The directory extracted entries are rooted at.
        #[arg(short, long)]
        output: PathBuf,

        /// Disable the per-entry CRC32 integrity check. The check loads and hashes every entry, which can be costly on large archives.
        #[arg(long = "no-check-crc", action = clap::ArgAction::SetFalse, default_value_t = true)]
        check_crc: bool,
    },

    /// Run every job described in a JSON manifest concurrently.
    #[command(alias = "r")]
    Run {
        /// Path to the manifest file.
        #[arg(required = true)]
        manifest: PathBuf,
    },
}

/// Parses command-line arguments using `clap` and returns the command to
/// execute.
pub fn run() -> Result<Commands, Box<dyn std::error::Error>> {
    let args = Args::parse();
    Ok(args.command)
}

/// Converts a parsed command into the jobs the runner will execute.
pub fn jobs(command: &Commands) -> Result<Vec<Job>, PackError> {
    match command {
        Commands::Pack {
            patterns,
            output,
            cwd,
            dot,
            store,
            level,
        } => {
            let options = JobOptions {
                compression: if *store {
                    Compression::Store
                } else {
                    Compression::Deflate
                },
                compression_level: *level,
                ..JobOptions::default()
            };
            Ok(vec![Job::Pack(JobConfig {
                cwd: cwd.clone(),
                dest: output.clone(),
                src: patterns.clone(),
                dot: *dot,
                options,
            })])
        }
        Commands::Unpack {
            archives,
            output,
            check_crc,
        } => {
            let options = JobOptions {
                check_crc32: *check_crc,
                ..JobOptions::default()
            };
            Ok(vec![Job::Unpack(JobConfig {
                cwd: None,
                dest: output.clone(),
                src: archives.clone(),
                dot: false,
                options,
            })])
        }
        Commands::Run { manifest } => load_manifest(manifest),
    }
}

/// One entry of the JSON manifest: a job config plus its direction.
#[derive(Deserialize)]
struct ManifestJob {
    action: ManifestAction,
    #[serde(flatten)]
    config: JobConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ManifestAction {
    Pack,
    Unpack,
}

/// Loads a manifest: a JSON array of jobs. Routers are closures and have
/// no JSON form, so manifest jobs always run the identity router.
pub fn load_manifest(path: &Path) -> Result<Vec<Job>, PackError> {
    let input = std::fs::read(path).map_err(|e| PackError::io(e, path))?;
    let jobs: Vec<ManifestJob> = serde_json::from_slice(&input)?;
    Ok(jobs
        .into_iter()
        .map(|job| match job.action {
            ManifestAction::Pack => Job::Pack(job.config),
            ManifestAction::Unpack => Job::Unpack(job.config),
        })
        .collect())
}
