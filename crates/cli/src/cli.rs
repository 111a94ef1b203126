use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffactory")]
#[command(author, version, about = "Watch folders and transcode media with ffmpeg profiles")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch a factory's notify directory and convert new files
    Watch {
        /// Factory (profile) name
        factory: String,

        /// Run a single scan cycle and exit
        #[arg(long)]
        once: bool,

        /// Seconds between scans (defaults to the configured interval)
        #[arg(long)]
        interval: Option<u64>,

        /// Parallel conversions, overriding profile and global limits
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Convert one file now
    Run {
        /// File to convert
        #[arg(required = true)]
        file: PathBuf,

        /// Factory to use; matched by notify directory when omitted
        #[arg(short, long)]
        factory: Option<String>,

        /// Parallel conversions, overriding profile and global limits
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// List the factories in the factory directory
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the engine command line for a file without running it
    Command {
        /// Factory (profile) name
        factory: String,

        /// Input file
        file: PathBuf,

        /// Build the preview variant (output.<ext>)
        #[arg(long)]
        preview: bool,
    },

    /// Convert a file to output.<ext> to try a factory out
    Preview {
        /// Factory (profile) name
        factory: String,

        /// Input file
        file: PathBuf,

        /// Directory receiving the preview output
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Encode live inputs to a streaming destination
    Stream {
        /// Factory (profile) name
        factory: String,

        /// Video input (device, file or URL)
        #[arg(long)]
        video: String,

        /// Separate audio input
        #[arg(long)]
        audio: Option<String>,

        /// Destination URL
        #[arg(long)]
        dest: String,
    },

    /// Check that the engine runs and list hardware encoders
    Check,
}
