//! Audio playback using cpal
//! Resamples from source rate to native device rate, folding the playback
//! speed into the conversion ratio

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig, SupportedStreamConfig,
};
use rubato::{FftFixedIn, Resampler};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::decode::{decode_mp3, DecodedAudio};
use super::AudioSink;
use crate::voice::tts::types::{clamp_speed, AudioPayload};

/// Audio player for synthesized speech
pub struct AudioPlayer {
    device: Device,
    supported_config: SupportedStreamConfig,
}

/// Completion shared with the output callbacks. Playback ends either when
/// the data callback runs out of samples or when the stream reports an error.
#[derive(Debug, Default)]
struct PlaybackState {
    finished: AtomicBool,
    error: Mutex<Option<String>>,
}

impl PlaybackState {
    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Keeps the first error; later ones are only logged.
    fn fail(&self, message: String) {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(message);
    }

    fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    async fn wait(&self) -> Result<()> {
        loop {
            if let Some(message) = self.error() {
                return Err(anyhow!("playback stream error: {message}"));
            }
            if self.is_finished() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

/// Audio playback handle - dropping stops playback (RAII)
pub struct AudioPlayback {
    _stream: Stream,
    state: Arc<PlaybackState>,
}

impl AudioPlayback {
    /// Check if playback has finished
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Wait for playback to complete, or for the stream to fail
    pub async fn wait(&self) -> Result<()> {
        self.state.wait().await
    }
}

impl AudioPlayer {
    /// Create a new audio player using the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;

        let supported_config = device
            .default_output_config()
            .context("failed to get default output config")?;

        Ok(Self {
            device,
            supported_config,
        })
    }

    /// Start playing decoded audio, returns handle that stops on drop
    pub fn start(&self, audio: DecodedAudio, speed: f32) -> Result<AudioPlayback> {
        let native_rate = self.supported_config.sample_rate().0;
        let native_channels = self.supported_config.channels() as usize;
        let sample_format = self.supported_config.sample_format();
        let config: StreamConfig = self.supported_config.clone().into();

        let source_rate = effective_source_rate(audio.sample_rate, speed);
        let resampled = resample(&audio.samples, source_rate, native_rate)?;
        let samples = expand_to_channels(&resampled, native_channels);

        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let state = Arc::new(PlaybackState::default());

        let stream = match sample_format {
            SampleFormat::F32 => {
                self.build_stream::<f32>(&config, samples, position, state.clone())?
            }
            SampleFormat::I16 => {
                self.build_stream::<i16>(&config, samples, position, state.clone())?
            }
            SampleFormat::U16 => {
                self.build_stream::<u16>(&config, samples, position, state.clone())?
            }
            format => anyhow::bail!("unsupported sample format: {:?}", format),
        };

        stream.play().context("failed to start playback stream")?;

        Ok(AudioPlayback {
            _stream: stream,
            state,
        })
    }

    fn build_stream<T>(
        &self,
        config: &StreamConfig,
        samples: Arc<Vec<f32>>,
        position: Arc<AtomicUsize>,
        state: Arc<PlaybackState>,
    ) -> Result<Stream>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let silence = T::from_sample(0.0f32);
        let error_state = state.clone();
        self.device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let pos = position.load(Ordering::SeqCst);
                    let remaining = samples.len().saturating_sub(pos);

                    if remaining == 0 {
                        data.fill(silence);
                        state.finish();
                        return;
                    }

                    let to_copy = remaining.min(data.len());
                    for (i, &sample) in samples[pos..pos + to_copy].iter().enumerate() {
                        data[i] = T::from_sample(sample);
                    }

                    if to_copy < data.len() {
                        data[to_copy..].fill(silence);
                    }

                    position.store(pos + to_copy, Ordering::SeqCst);
                },
                move |err| {
                    tracing::error!(error = ?err, "playback stream error");
                    error_state.fail(err.to_string());
                },
                None,
            )
            .context("failed to build output stream")
    }
}

#[async_trait(?Send)]
impl AudioSink for AudioPlayer {
    async fn play(&self, payload: &AudioPayload, speed: f32) -> Result<()> {
        let audio = decode_mp3(&payload.mp3_data)?;
        tracing::debug!(
            samples = audio.samples.len(),
            sample_rate = audio.sample_rate,
            speed,
            "starting playback"
        );

        if audio.samples.is_empty() {
            return Ok(());
        }

        let playback = self.start(audio, speed)?;
        playback.wait().await
    }
}

/// Playing at `speed` is the same as claiming the audio was recorded at
/// `rate * speed` and converting that to the device rate.
fn effective_source_rate(rate: u32, speed: f32) -> u32 {
    ((rate as f64) * clamp_speed(speed) as f64).round().max(1.0) as u32
}

/// The output covers exactly the input duration: the resampler's delay is
/// flushed with trailing silence and trimmed from the front.
fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let chunk_size = 1024;
    let mut resampler =
        FftFixedIn::<f32>::new(source_rate as usize, target_rate as usize, chunk_size, 2, 1)
            .context("failed to create resampler")?;

    let expected =
        (samples.len() as u64 * target_rate as u64).div_ceil(source_rate as u64) as usize;
    let delay = resampler.output_delay();

    let mut output = Vec::with_capacity(expected + delay);
    let mut pos = 0;

    while pos < samples.len() {
        let frames_needed = resampler.input_frames_next();
        let end = (pos + frames_needed).min(samples.len());

        let mut input_chunk = samples[pos..end].to_vec();
        if input_chunk.len() < frames_needed {
            input_chunk.resize(frames_needed, 0.0);
        }

        process_chunk(&mut resampler, input_chunk, &mut output)?;
        pos = end;
    }

    while output.len() < delay + expected {
        let zeros = vec![0.0; resampler.input_frames_next()];
        let before = output.len();
        process_chunk(&mut resampler, zeros, &mut output)?;
        if output.len() == before {
            break;
        }
    }

    output.drain(..delay.min(output.len()));
    output.truncate(expected);
    Ok(output)
}

fn process_chunk(
    resampler: &mut FftFixedIn<f32>,
    chunk: Vec<f32>,
    output: &mut Vec<f32>,
) -> Result<()> {
    let resampled = resampler
        .process(&[chunk], None)
        .map_err(|e| anyhow!("resampling failed: {e:?}"))?;
    if let Some(chunk) = resampled.into_iter().next() {
        output.extend(chunk);
    }
    Ok(())
}

fn expand_to_channels(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let mut output = Vec::with_capacity(samples.len() * channels);
    for &sample in samples {
        for _ in 0..channels {
            output.push(sample);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_scales_source_rate() {
        assert_eq!(effective_source_rate(24000, 1.0), 24000);
        assert_eq!(effective_source_rate(24000, 1.5), 36000);
        assert_eq!(effective_source_rate(24000, 0.5), 12000);
        assert_eq!(effective_source_rate(24000, 10.0), 48000);
    }

    #[test]
    fn faster_playback_produces_fewer_frames() {
        let samples = vec![0.1f32; 24000];
        let normal = resample(&samples, 24000, 48000).unwrap();
        let fast = resample(&samples, effective_source_rate(24000, 2.0), 48000).unwrap();
        assert!(fast.len() < normal.len());
    }

    #[test]
    fn resampled_audio_keeps_its_start_and_end() {
        // a whole number of resampler chunks, where the tail used to go missing
        let samples = vec![0.5f32; 24 * 1024];
        let resampled = resample(&samples, 24000, 48000).unwrap();

        assert_eq!(resampled.len(), 2 * samples.len());
        for index in [32, resampled.len() / 2, resampled.len() - 32] {
            assert!(
                (resampled[index] - 0.5).abs() < 0.05,
                "sample {index} was {}",
                resampled[index]
            );
        }
    }

    #[test]
    fn identical_rates_are_passthrough() {
        let samples = vec![0.5, -0.5, 0.25];
        assert_eq!(resample(&samples, 48000, 48000).unwrap(), samples);
    }

    #[tokio::test]
    async fn stream_error_ends_the_wait() {
        let state = Arc::new(PlaybackState::default());
        let callback_state = state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            callback_state.fail("device disconnected".to_string());
            callback_state.fail("second error".to_string());
        });

        let err = tokio::time::timeout(Duration::from_secs(2), state.wait())
            .await
            .expect("wait returned")
            .unwrap_err();
        assert!(err.to_string().contains("device disconnected"));
        assert!(!state.is_finished());
    }

    #[tokio::test]
    async fn finished_stream_ends_the_wait() {
        let state = PlaybackState::default();
        state.finish();
        state.wait().await.unwrap();
    }

    #[test]
    fn mono_is_duplicated_per_channel() {
        assert_eq!(expand_to_channels(&[0.1, 0.2], 2), vec![0.1, 0.1, 0.2, 0.2]);
    }
}
