use super::error::AssemblyError;
use super::model::AudioArtifact;
use std::io::Cursor;

/// Decode an artifact's PCM16LE payload into normalized samples in
/// [-1, 1]. A trailing odd byte is ignored.
pub fn decode_samples(artifact: &AudioArtifact) -> Vec<f32> {
    artifact
        .data
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect()
}

/// Convert one normalized sample to a signed 16-bit value. Scaling is
/// asymmetric: negatives span the full -32768, non-negatives top out at
/// 32767. Input is clipped to [-1, 1] first.
fn sample_to_i16(sample: f32) -> i16 {
    let clipped = sample.clamp(-1.0, 1.0);
    if clipped < 0.0 {
        (clipped * 32768.0) as i16
    } else {
        (clipped * 32767.0) as i16
    }
}

/// Concatenate the artifacts in array order and encode the result as a
/// canonical mono 16-bit PCM WAV byte stream.
///
/// All artifacts are treated as mono at the sample rate of the first;
/// mixed rates are not resampled. Output is byte-reproducible for
/// identical inputs.
pub fn merge(artifacts: &[AudioArtifact]) -> Result<Vec<u8>, AssemblyError> {
    if artifacts.is_empty() {
        return Err(AssemblyError::NoArtifacts);
    }

    let sample_rate = artifacts[0].sample_rate;
    let total_len: usize = artifacts.iter().map(AudioArtifact::sample_count).sum();

    let mut samples = Vec::with_capacity(total_len);
    for artifact in artifacts {
        samples.extend(decode_samples(artifact));
    }

    tracing::debug!(
        artifact_count = artifacts.len(),
        total_samples = samples.len(),
        sample_rate = sample_rate,
        "assembling master wav"
    );

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in &samples {
            writer.write_sample(sample_to_i16(*sample))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
