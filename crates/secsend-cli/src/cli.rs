//! CLI argument parsing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default plaintext chunk size: 1 MiB
pub const DEFAULT_CHUNK_SIZE: u32 = 1 << 20;

#[derive(Parser)]
#[command(name = "secsend")]
#[command(author, version, about = "Zero-knowledge file relay client", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file and upload it to a relay
    Send(SendArgs),

    /// Download and decrypt a file from a share link
    Receive(ReceiveArgs),

    /// Delete an uploaded file using its owner link
    Delete(DeleteArgs),

    /// Show a relay's advertised limits
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct SendArgs {
    /// File to encrypt and upload
    pub file: PathBuf,

    /// Relay server to upload to (also reads SECSEND_SERVER env var)
    #[arg(long, default_value = "http://127.0.0.1:8080", env = "SECSEND_SERVER")]
    pub server: String,

    /// MIME type to record in the metadata; sniffing is not performed
    #[arg(long, default_value = "application/octet-stream")]
    pub mime_type: String,

    /// Plaintext chunk size in bytes
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u32,

    /// Requested time-to-live in seconds after upload finishes, 0 = never expire
    #[arg(long, default_value_t = 0)]
    pub timeout_s: u64,

    /// Resume an interrupted upload using the owner link `send` printed for it,
    /// instead of starting a fresh one
    #[arg(long)]
    pub resume: Option<String>,
}

#[derive(Args)]
pub struct ReceiveArgs {
    /// Share link, e.g. http://host/dl?id=<id>#<key>
    pub url: String,

    /// Output file path; defaults to the decrypted name in the current directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Resume an interrupted download into an existing partial output file
    #[arg(long)]
    pub resume: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Owner link returned by `send` (must carry a root id, not a recipient link)
    pub url: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Relay server to query (also reads SECSEND_SERVER env var)
    #[arg(long, default_value = "http://127.0.0.1:8080", env = "SECSEND_SERVER")]
    pub server: String,
}
