pub mod config;
pub mod error;
pub mod pipeline;
pub mod search;
pub mod server;
pub mod whisper;
pub mod youtube;

use serde::{Deserialize, Serialize};

/// Timestamp returned when no match is found or no transcript could be produced
pub const SENTINEL_TIMESTAMP: &str = "00:00:00";

/// A single captioned segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: Option<f64>,
}

/// Source of the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptSource {
    Caption,
    Whisper,
}

/// Complete transcript for a video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub source: TranscriptSource,
    pub segments: Vec<Segment>,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Caption => write!(f, "caption"),
            TranscriptSource::Whisper => write!(f, "whisper"),
        }
    }
}

/// Extract the 11-character video ID from a YouTube URL.
///
/// Accepts `v=` query parameters and `youtu.be/` short links; the string is
/// scanned left to right and the first match wins.
pub fn extract_video_id(input: &str) -> Option<String> {
    regex::Regex::new(r"(?:v=|youtu\.be/)([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input.trim())
        .map(|caps| caps[1].to_string())
}

/// Format a seconds offset as a zero-padded HH:MM:SS clock string.
///
/// Fractional seconds truncate toward zero. Hours are not wrapped, so very
/// long videos render as e.g. "100:00:00".
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            extract_video_id("https://youtu.be/aaaaaaaaaaa https://youtu.be/bbbbbbbbbbb"),
            Some("aaaaaaaaaaa".to_string())
        );
    }

    #[test]
    fn test_no_pattern() {
        assert_eq!(extract_video_id("https://example.com"), None);
    }

    #[test]
    fn test_id_too_short() {
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(
            extract_video_id("  https://youtu.be/dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_timestamp(0.0), "00:00:00");
    }

    #[test]
    fn test_format_hours_minutes_seconds() {
        assert_eq!(format_timestamp(3661.0), "01:01:01");
    }

    #[test]
    fn test_format_truncates() {
        assert_eq!(format_timestamp(59.9), "00:00:59");
    }

    #[test]
    fn test_format_no_hour_wrap() {
        assert_eq!(format_timestamp(360000.0), "100:00:00");
    }

    #[test]
    fn test_format_mid_video() {
        assert_eq!(format_timestamp(125.0), "00:02:05");
    }
}
