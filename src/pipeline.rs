use log::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::{SENTINEL_TIMESTAMP, extract_video_id, format_timestamp, search, whisper, youtube};

/// Whether a hosted-caption failure should trigger the Whisper fallback.
///
/// Only disabled captions do. A video with no caption track, or a transport
/// failure, degrades to the sentinel without burning an audio download.
fn triggers_fallback(err: &Error) -> bool {
    matches!(err, Error::TranscriptsDisabled(_))
}

/// Locate the first mention of `topic` in the video behind `video_url`.
///
/// Returns the formatted timestamp, or the sentinel when a transcript was
/// produced but contains no match. Failing to produce any transcript at all
/// surfaces as an error; the HTTP boundary maps those to the sentinel.
pub async fn locate(
    client: &reqwest::Client,
    config: &Config,
    video_url: &str,
    topic: &str,
) -> Result<String> {
    let video_id =
        extract_video_id(video_url).ok_or_else(|| Error::InvalidUrl(video_url.to_string()))?;

    let transcript =
        match youtube::fetch_captions(client, &video_id, &config.lang, config.fetch_timeout()).await
        {
            Ok(t) => t,
            Err(e) if triggers_fallback(&e) => {
                info!("Captions disabled for {video_id}, falling back to Whisper");
                whisper::transcribe(client, config, &video_id).await?
            }
            Err(e) => return Err(e),
        };

    info!(
        "Transcript for {video_id}: {} segments via {}",
        transcript.segments.len(),
        transcript.source
    );

    Ok(match search::find_topic(&transcript.segments, topic) {
        Some(start) => format_timestamp(start),
        None => SENTINEL_TIMESTAMP.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_on_disabled_captions() {
        assert!(triggers_fallback(&Error::TranscriptsDisabled("abc".into())));
    }

    #[test]
    fn test_no_fallback_on_missing_track() {
        assert!(!triggers_fallback(&Error::NoTranscriptFound("abc".into())));
    }

    #[test]
    fn test_no_fallback_on_parse_error() {
        assert!(!triggers_fallback(&Error::CaptionParse("bad xml".into())));
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let client = reqwest::Client::new();
        let config = Config::default();

        let result = locate(&client, &config, "https://example.com", "rust").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
