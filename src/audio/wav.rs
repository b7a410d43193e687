//! WAV container encoding for mono 16-bit PCM
//!
//! Produces the exact 44-byte RIFF/WAVE header standard players expect,
//! followed by the samples as little-endian signed 16-bit integers. The
//! header is a fixed-layout struct serialized field by field; no offset
//! arithmetic.

use crate::{Error, Result};

/// Size of the WAV header in bytes
pub const HEADER_LEN: usize = 44;

/// Fixed-format WAV header for mono, 16-bit, uncompressed PCM.
///
/// Only the sample rate and data size vary; every other field is a constant
/// of the format. All multi-byte fields are little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Samples per second, Hz
    pub sample_rate: u32,
    /// Size of the sample section in bytes (sample count × 2)
    pub data_len: u32,
}

impl WavHeader {
    const AUDIO_FORMAT_PCM: u16 = 1;
    const NUM_CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    const BLOCK_ALIGN: u16 = 2;
    const FMT_CHUNK_LEN: u32 = 16;

    /// Serialize the header into its 44-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        let mut w = FieldWriter::new(&mut out);

        w.tag(b"RIFF");
        w.u32(36 + self.data_len); // ChunkSize
        w.tag(b"WAVE");
        w.tag(b"fmt ");
        w.u32(Self::FMT_CHUNK_LEN);
        w.u16(Self::AUDIO_FORMAT_PCM);
        w.u16(Self::NUM_CHANNELS);
        w.u32(self.sample_rate);
        w.u32(self.sample_rate * 2); // ByteRate: 2 bytes per mono sample
        w.u16(Self::BLOCK_ALIGN);
        w.u16(Self::BITS_PER_SAMPLE);
        w.tag(b"data");
        w.u32(self.data_len);

        out
    }
}

/// Sequential little-endian field writer over a fixed buffer.
struct FieldWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FieldWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn tag(&mut self, tag: &[u8; 4]) {
        self.put(tag);
    }

    fn u32(&mut self, v: u32) {
        self.put(&v.to_le_bytes());
    }

    fn u16(&mut self, v: u16) {
        self.put(&v.to_le_bytes());
    }
}

/// Largest sample rate whose ByteRate (rate × 2) still fits the header field
const MAX_SAMPLE_RATE: u32 = u32::MAX / 2;

/// Largest data section whose ChunkSize (36 + data) still fits the header field
const MAX_DATA_LEN: u32 = u32::MAX - 36;

/// Encode mono 16-bit PCM samples into a complete WAV byte buffer.
///
/// The result is always exactly `44 + 2 * samples.len()` bytes: the fixed
/// header followed by each sample in input order, little-endian.
///
/// # Errors
///
/// Returns [`Error::InvalidSample`] if `sample_rate` is zero or too large
/// for the header's ByteRate field, or if the sample data would not fit the
/// header's 32-bit size fields. The rate comes from a remote MIME parameter,
/// so out-of-range values must fail instead of wrapping into a corrupt
/// header.
pub fn pcm_to_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    if sample_rate == 0 {
        return Err(Error::InvalidSample("sample rate must be positive".into()));
    }
    if sample_rate > MAX_SAMPLE_RATE {
        return Err(Error::InvalidSample(format!(
            "sample rate {sample_rate} exceeds WAV byte-rate limits"
        )));
    }

    let data_len = u32::try_from(samples.len() * 2)
        .ok()
        .filter(|&len| len <= MAX_DATA_LEN)
        .ok_or_else(|| {
            Error::InvalidSample(format!("{} samples exceed WAV size limits", samples.len()))
        })?;

    let header = WavHeader {
        sample_rate,
        data_len,
    };

    let mut out = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    out.extend_from_slice(&header.to_bytes());
    for &sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(buf: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(buf: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn length_is_header_plus_two_bytes_per_sample() {
        for n in [0usize, 1, 3, 100] {
            let samples = vec![0i16; n];
            let wav = pcm_to_wav(&samples, 16000).unwrap();
            assert_eq!(wav.len(), HEADER_LEN + 2 * n, "n = {n}");
        }
    }

    #[test]
    fn header_fields_match_format() {
        let wav = pcm_to_wav(&[1, 2, 3], 24000).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + 6); // ChunkSize
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16); // Subchunk1Size
        assert_eq!(u16_at(&wav, 20), 1); // AudioFormat = PCM
        assert_eq!(u16_at(&wav, 22), 1); // NumChannels
        assert_eq!(u32_at(&wav, 24), 24000); // SampleRate
        assert_eq!(u32_at(&wav, 28), 48000); // ByteRate
        assert_eq!(u16_at(&wav, 32), 2); // BlockAlign
        assert_eq!(u16_at(&wav, 34), 16); // BitsPerSample
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 6); // Subchunk2Size
    }

    #[test]
    fn samples_serialized_little_endian_in_order() {
        let wav = pcm_to_wav(&[0, 16384, -16384], 16000).unwrap();

        assert_eq!(wav.len(), 50);
        assert_eq!(u32_at(&wav, 24), 16000);
        assert_eq!(i16::from_le_bytes([wav[44], wav[45]]), 0);
        assert_eq!(i16::from_le_bytes([wav[46], wav[47]]), 16384);
        assert_eq!(i16::from_le_bytes([wav[48], wav[49]]), -16384);
    }

    #[test]
    fn empty_pcm_is_a_valid_header_only_file() {
        let wav = pcm_to_wav(&[], 8000).unwrap();
        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(u32_at(&wav, 4), 36);
        assert_eq!(u32_at(&wav, 40), 0);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert!(matches!(
            pcm_to_wav(&[0], 0),
            Err(Error::InvalidSample(_))
        ));
    }

    #[test]
    fn rejects_sample_rate_whose_byte_rate_overflows() {
        // A remote MIME parameter can claim any rate; 2.2 GHz would wrap the
        // ByteRate field
        assert!(matches!(
            pcm_to_wav(&[0], 2_200_000_000),
            Err(Error::InvalidSample(_))
        ));
    }

    #[test]
    fn accepts_largest_representable_sample_rate() {
        let wav = pcm_to_wav(&[0], u32::MAX / 2).unwrap();
        assert_eq!(
            u32::from_le_bytes(wav[28..32].try_into().unwrap()),
            (u32::MAX / 2) * 2
        );
    }

    #[test]
    fn extreme_sample_values_round_trip() {
        let wav = pcm_to_wav(&[i16::MIN, i16::MAX], 44100).unwrap();
        assert_eq!(i16::from_le_bytes([wav[44], wav[45]]), i16::MIN);
        assert_eq!(i16::from_le_bytes([wav[46], wav[47]]), i16::MAX);
    }
}
