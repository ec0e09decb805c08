use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "askvid",
    about = "Find when a topic is first mentioned in a YouTube video",
    version
)]
pub struct Cli {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Path to a whisper ggml model file
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
