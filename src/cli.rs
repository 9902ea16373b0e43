use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum MatchMode {
    /// Match on extracted metadata, preferring season packs for larger seasons
    Auto,
    /// Match on the episode token in the release name only
    SingleSessionEpisode,
}

#[derive(Parser)]
#[command(name = "subsource-dl")]
#[command(about = "Download matching subtitles from SubSource for local video files")]
pub struct Cli {
    /// Video file or directory to process
    pub path: PathBuf,

    /// Where to save subtitles (default: next to each video)
    #[arg(long)]
    pub savepath: Option<PathBuf>,

    /// Matching mode
    #[arg(long, value_enum, default_value = "auto")]
    pub matchtype: MatchMode,

    /// Subtitle language to download (overrides the config file)
    #[arg(long)]
    pub language: Option<String>,

    /// Stop issuing catalog requests and downloads after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,
}
