//! WAV encoding and decoding
//!
//! Everything the synthesis chain produces is normalized to a mono `f32`
//! waveform. Integer PCM is scaled to `[-1.0, 1.0)`, multi-channel audio is
//! mixed down by averaging the channels of each frame.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read};
use std::path::Path;

use crate::models::AudioTrack;

/// Decode WAV bytes, e.g. an HTTP response body.
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<AudioTrack, hound::Error> {
    decode_reader(WavReader::new(Cursor::new(bytes))?)
}

pub fn decode_wav_file(path: &Path) -> Result<AudioTrack, hound::Error> {
    decode_reader(WavReader::open(path)?)
}

fn decode_reader<R: Read>(mut reader: WavReader<R>) -> Result<AudioTrack, hound::Error> {
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let samples = downmix(&interleaved, spec.channels);
    log::debug!(
        "Decoded WAV: {} frames, {} Hz, {} channel(s)",
        samples.len(),
        spec.sample_rate,
        spec.channels
    );
    Ok(AudioTrack::new(samples, spec.sample_rate))
}

fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Write a track as 32-bit float mono WAV.
pub fn encode_wav(track: &AudioTrack, path: &Path) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: track.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in track.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    log::info!(
        "Saved WAV file: {} ({} samples, {} Hz)",
        path.display(),
        track.samples().len(),
        track.sample_rate()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int16_stereo_wav(frames: &[(i16, i16)], sample_rate: u32) -> Vec<u8> {
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut buffer, spec).unwrap();
            for &(l, r) in frames {
                writer.write_sample(l).unwrap();
                writer.write_sample(r).unwrap();
            }
            writer.finalize().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_decode_int16_stereo_downmixes() {
        let bytes = int16_stereo_wav(&[(16384, 0), (-16384, -16384)], 22050);
        let track = decode_wav_bytes(&bytes).unwrap();

        assert_eq!(track.sample_rate(), 22050);
        assert_eq!(track.samples(), &[0.25, -0.5]);
    }

    #[test]
    fn test_encode_then_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narration.wav");
        let track = AudioTrack::new(vec![0.0, 0.5, -0.25], 16000);

        encode_wav(&track, &path).unwrap();
        let decoded = decode_wav_file(&path).unwrap();
        assert_eq!(decoded, track);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_wav_bytes(b"definitely not a wav").is_err());
    }
}
