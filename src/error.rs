/// All errors the transcript pipeline can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not extract a video ID from: {0}")]
    InvalidUrl(String),

    #[error("captions are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("no caption track available for video {0}")]
    NoTranscriptFound(String),

    #[error("caption data malformed: {0}")]
    CaptionParse(String),

    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("audio download failed: {0}")]
    Download(String),

    #[error("yt-dlp not found, install it to enable the Whisper fallback: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("model download failed: {0}")]
    ModelDownload(String),

    #[error("speech recognition failed: {0}")]
    Recognition(String),

    #[error("whisper error: {0}")]
    Whisper(#[from] whisper_rs::WhisperError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
