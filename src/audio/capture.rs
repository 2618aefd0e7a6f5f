use crate::audio::frame_ring::FrameRing;
use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;

/// Mono input capture feeding the frame ring. The stream keeps running for as
/// long as this handle is alive; dropping it closes the stream.
pub struct AudioCapture {
    _stream: cpal::Stream,
}

impl AudioCapture {
    pub fn start(ring: Arc<FrameRing>, sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .context("no default recording device")?;
        if let Ok(name) = device.name() {
            log::info!("cpal input device: {name}");
        }

        let default = device.default_input_config()?;
        let channels = default.channels();
        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err| {
            log::warn!("cpal stream error: {err}");
        };

        let stream = match default.sample_format() {
            cpal::SampleFormat::F32 => {
                let mut chunker = FrameChunker::new(ring, channels as usize);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _| chunker.push(data.iter().copied()),
                    err_fn,
                    None,
                )?
            }
            cpal::SampleFormat::I16 => {
                let mut chunker = FrameChunker::new(ring, channels as usize);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _| {
                        chunker.push(data.iter().map(|&s| s as f32 / i16::MAX as f32))
                    },
                    err_fn,
                    None,
                )?
            }
            cpal::SampleFormat::U16 => {
                let mut chunker = FrameChunker::new(ring, channels as usize);
                device.build_input_stream(
                    &config,
                    move |data: &[u16], _| {
                        chunker.push(
                            data.iter()
                                .map(|&s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0),
                        )
                    },
                    err_fn,
                    None,
                )?
            }
            other => anyhow::bail!("unsupported input sample format: {other:?}"),
        };

        stream.play()?;
        Ok(Self { _stream: stream })
    }
}

/// Runs inside the audio callback: downmixes interleaved channels to mono and
/// publishes a frame every time the preallocated buffer fills. No allocation
/// and no locking on this path.
struct FrameChunker {
    ring: Arc<FrameRing>,
    frame: Vec<f32>,
    fill: usize,
    channels: usize,
    acc: f32,
    acc_channels: usize,
}

impl FrameChunker {
    fn new(ring: Arc<FrameRing>, channels: usize) -> Self {
        let frame = vec![0.0; ring.frame_len()];
        Self {
            ring,
            frame,
            fill: 0,
            channels: channels.max(1),
            acc: 0.0,
            acc_channels: 0,
        }
    }

    fn push<I: Iterator<Item = f32>>(&mut self, samples: I) {
        for s in samples {
            self.acc += s;
            self.acc_channels += 1;
            if self.acc_channels < self.channels {
                continue;
            }
            let mono = self.acc / self.channels as f32;
            self.acc = 0.0;
            self.acc_channels = 0;

            self.frame[self.fill] = mono;
            self.fill += 1;
            if self.fill == self.frame.len() {
                self.ring.publish(&self.frame);
                self.fill = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunker_publishes_once_per_full_frame() {
        let ring = Arc::new(FrameRing::new(4, 3));
        let mut chunker = FrameChunker::new(Arc::clone(&ring), 1);
        let mut out = vec![0.0f32; 4];

        chunker.push([1.0, 2.0, 3.0].into_iter());
        assert_eq!(ring.latest_into(&mut out), None);

        chunker.push([4.0, 5.0].into_iter());
        assert_eq!(ring.latest_into(&mut out), Some(1));
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn chunker_downmixes_stereo_to_mono() {
        let ring = Arc::new(FrameRing::new(2, 2));
        let mut chunker = FrameChunker::new(Arc::clone(&ring), 2);
        chunker.push([1.0, 0.0, 0.5, 0.5].into_iter());

        let mut out = vec![0.0f32; 2];
        assert_eq!(ring.latest_into(&mut out), Some(1));
        assert_eq!(out, vec![0.5, 0.5]);
    }
}
