use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use futures_util::StreamExt;
use log::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::{Segment, Transcript, TranscriptSource};

/// Sample rate whisper.cpp expects
const WHISPER_SAMPLE_RATE: u32 = 16_000;

const HUGGINGFACE_BASE: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// The model tier is fixed at "base"; English gets the smaller English-only weights.
fn model_filename(lang: &str) -> &'static str {
    if lang == "en" { "ggml-base.en.bin" } else { "ggml-base.bin" }
}

fn default_model_path(lang: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("askvid")
        .join("models")
        .join(model_filename(lang))
}

/// Transcribe a video by downloading its audio and running whisper.cpp locally.
///
/// The audio lands in a fresh temporary directory that is removed when this
/// function returns, on success and failure alike.
pub async fn transcribe(client: &reqwest::Client, config: &Config, video_id: &str) -> Result<Transcript> {
    let model_path = ensure_model(client, config).await?;

    let workdir = tempfile::tempdir()?;
    let audio_path = download_audio(video_id, workdir.path(), config.download_timeout()).await?;
    let samples = load_samples(&audio_path)?;
    debug!(
        "Decoded {} samples ({:.1}s of audio)",
        samples.len(),
        samples.len() as f64 / WHISPER_SAMPLE_RATE as f64
    );

    let lang = config.lang.clone();
    let segments = tokio::task::spawn_blocking(move || run_model(&model_path, &lang, &samples))
        .await
        .map_err(|e| Error::Recognition(format!("transcription task failed: {e}")))??;

    Ok(Transcript {
        video_id: video_id.to_string(),
        language: config.lang.clone(),
        source: TranscriptSource::Whisper,
        segments,
    })
}

/// Download the best audio track as 16kHz mono WAV via yt-dlp.
async fn download_audio(video_id: &str, dir: &Path, timeout: Duration) -> Result<PathBuf> {
    let url = format!("https://www.youtube.com/watch?v={video_id}");
    let output_template = dir.join("audio.%(ext)s");
    let output_path = dir.join("audio.wav");

    debug!("Downloading audio via yt-dlp: {url}");

    let mut cmd = tokio::process::Command::new("yt-dlp");
    cmd.args([
        "--extract-audio",
        "--audio-format",
        "wav",
        "--postprocessor-args",
        "ffmpeg:-ar 16000 -ac 1",
        "--no-playlist",
        "--no-exec",
        "-o",
    ])
    .arg(&output_template)
    .arg(&url)
    .stdout(Stdio::null())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result,
        Err(_) => {
            return Err(Error::Download(format!(
                "yt-dlp timed out after {}s",
                timeout.as_secs()
            )));
        }
    };

    let output = match output {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(Error::YtDlpNotFound),
        Err(e) => return Err(Error::Download(format!("failed to run yt-dlp: {e}"))),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr: String = stderr.chars().take(1000).collect();
        return Err(Error::Download(format!(
            "yt-dlp exited with {}: {stderr}",
            output.status
        )));
    }

    if !output_path.exists() {
        return Err(Error::Download(format!(
            "yt-dlp did not produce expected output file: {}",
            output_path.display()
        )));
    }

    Ok(output_path)
}

/// Read a 16kHz mono WAV file into f32 samples ready for whisper.
fn load_samples(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| Error::Recognition(format!("failed to open wav: {e}")))?;

    let spec = reader.spec();
    if spec.channels != 1 || spec.sample_rate != WHISPER_SAMPLE_RATE {
        return Err(Error::Recognition(format!(
            "expected {WHISPER_SAMPLE_RATE}Hz mono audio, got {}Hz with {} channel(s)",
            spec.sample_rate, spec.channels
        )));
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<std::result::Result<Vec<_>, _>>(),
        hound::SampleFormat::Float => reader.samples::<f32>().collect(),
    }
    .map_err(|e| Error::Recognition(format!("wav decode error: {e}")))?;

    Ok(samples)
}

/// Run whisper.cpp over the samples. Blocking; call from a blocking task.
fn run_model(model_path: &Path, lang: &str, samples: &[f32]) -> Result<Vec<Segment>> {
    let path = model_path
        .to_str()
        .ok_or_else(|| Error::Recognition("model path contains invalid UTF-8".to_string()))?;

    info!("Loading whisper model: {path}");
    let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())?;
    let mut state = ctx.create_state()?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
    params.set_language(Some(lang));
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    info!("Running transcription over {} samples", samples.len());
    state.full(params, samples)?;

    let num_segments = state.full_n_segments();
    let mut segments = Vec::with_capacity(num_segments as usize);

    for i in 0..num_segments {
        let segment = state
            .get_segment(i)
            .ok_or_else(|| Error::Recognition(format!("segment {i} not found")))?;

        let text = segment
            .to_str_lossy()
            .map_err(|e| Error::Recognition(format!("segment text error: {e}")))?
            .trim()
            .to_string();
        if text.is_empty() {
            continue;
        }

        // Timestamps come back in centiseconds
        let start = segment.start_timestamp() as f64 / 100.0;
        let end = segment.end_timestamp() as f64 / 100.0;

        segments.push(Segment {
            text,
            start,
            duration: Some(end - start),
        });
    }

    debug!("Transcription produced {} segments", segments.len());
    Ok(segments)
}

/// Resolve the model file, downloading it into the cache on first use.
///
/// An explicitly configured path is never downloaded to; it must exist.
async fn ensure_model(client: &reqwest::Client, config: &Config) -> Result<PathBuf> {
    if let Some(ref path) = config.model_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(Error::ModelDownload(format!(
            "configured model file does not exist: {}",
            path.display()
        )));
    }

    let path = default_model_path(&config.lang);
    if path.exists() {
        debug!("Model already cached: {}", path.display());
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let url = format!("{HUGGINGFACE_BASE}/{}", model_filename(&config.lang));
    info!("Downloading whisper model: {url}");
    download_model(client, &url, &path).await?;

    Ok(path)
}

async fn download_model(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::ModelDownload(format!("HTTP error: {e}")))?;

    // Write to a temp file first, then rename
    let tmp_path = dest.with_extension("bin.part");
    let mut file = std::fs::File::create(&tmp_path)?;
    let mut stream = response.bytes_stream();

    use std::io::Write;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
    }
    file.flush()?;
    drop(file);

    let file_size = std::fs::metadata(&tmp_path)?.len();
    if file_size < 1_000_000 {
        std::fs::remove_file(&tmp_path).ok();
        return Err(Error::ModelDownload(format!(
            "downloaded file too small ({file_size} bytes), likely an error page"
        )));
    }

    std::fs::rename(&tmp_path, dest)?;
    info!("Model saved: {} ({file_size} bytes)", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_filename_english() {
        assert_eq!(model_filename("en"), "ggml-base.en.bin");
    }

    #[test]
    fn test_model_filename_other_language() {
        assert_eq!(model_filename("de"), "ggml-base.bin");
    }

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_load_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        write_wav(&path, WHISPER_SAMPLE_RATE, 1, &[0, i16::MAX, i16::MIN / 2]);

        let samples = load_samples(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 0.0).abs() < f32::EPSILON);
        assert!((samples[1] - 1.0).abs() < f32::EPSILON);
        assert!(samples[2] < -0.49 && samples[2] > -0.51);
    }

    #[test]
    fn test_load_samples_rejects_wrong_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        write_wav(&path, 44_100, 1, &[0; 8]);

        assert!(load_samples(&path).is_err());
    }

    #[test]
    fn test_load_samples_rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        write_wav(&path, WHISPER_SAMPLE_RATE, 2, &[0; 8]);

        assert!(load_samples(&path).is_err());
    }

    #[test]
    fn test_load_samples_missing_file() {
        assert!(load_samples(Path::new("/nonexistent/audio.wav")).is_err());
    }
}
