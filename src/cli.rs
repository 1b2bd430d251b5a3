use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find, translate and burn subtitles for a title
    Run {
        /// Title of the video to look for
        title: String,

        /// Output video path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Working directory for intermediate files
        #[arg(short, long)]
        workdir: Option<PathBuf>,

        /// Use the working directory itself instead of a fresh sub-directory;
        /// it must be empty
        #[arg(long)]
        shared_workdir: bool,

        /// Telegram bot token
        #[arg(long)]
        telegram_token: Option<String>,

        /// Telegram chat ID
        #[arg(long)]
        telegram_chat_id: Option<String>,
    },

    /// Print the search queries tried for a title, in order
    Queries {
        title: String,
    },

    /// Print the subtitle scan region for a frame size
    Region {
        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,
    },

    /// Print the subtitle language inferred from a video title
    Language {
        title: String,
    },

    /// Write the default configuration to a file
    InitConfig {
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
