use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use image::{Rgb, RgbImage};
use memmap2::Mmap;

use crate::error::{PoseTrackError, Result};
use crate::frame::{ColorMode, SourceInfo, VideoFrame};
use crate::io::source::FrameSource;

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            100 | 101 => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame, or `None` if the dimensions overflow.
    pub fn frame_byte_size(&self) -> Option<usize> {
        let pixels = (self.width as usize).checked_mul(self.height as usize)?;
        pixels.checked_mul(self.bytes_per_pixel_plane() * self.planes_per_pixel())
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            0 => ColorMode::Mono,
            8 => ColorMode::BayerRGGB,
            9 => ColorMode::BayerGRBG,
            10 => ColorMode::BayerGBRG,
            11 => ColorMode::BayerBGGR,
            100 => ColorMode::RGB,
            101 => ColorMode::BGR,
            _ => ColorMode::Mono,
        }
    }
}

/// Memory-mapped SER video reader.
pub struct SerReader {
    mmap: Mmap,
    path: PathBuf,
    frame_size: usize,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the map is read-only and lives no longer than the reader.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(PoseTrackError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(PoseTrackError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let frame_size = header
            .frame_byte_size()
            .ok_or_else(|| PoseTrackError::InvalidSer("Frame size overflows".into()))?;

        let expected_data_size = frame_size
            .checked_mul(header.frame_count as usize)
            .and_then(|bytes| bytes.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| PoseTrackError::InvalidSer("Data size overflows".into()))?;
        if mmap.len() < expected_data_size {
            return Err(PoseTrackError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            frame_size,
            header,
        })
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.header.frame_count as usize;
        if index >= count {
            return Err(PoseTrackError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.frame_size;
        Ok(&self.mmap[offset..offset + self.frame_size])
    }
}

impl FrameSource for SerReader {
    fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Decode a single frame to 8-bit RGB.
    fn read_frame(&self, index: usize) -> Result<VideoFrame> {
        let raw = self.frame_raw(index)?;
        let decoder = SampleDecoder {
            bytes_per_sample: self.header.bytes_per_pixel_plane(),
            bit_depth: self.header.pixel_depth,
            little_endian: self.header.little_endian,
        };
        let (w, h) = (self.header.width, self.header.height);

        let image = match self.header.color_mode() {
            ColorMode::Mono => decode_mono(raw, w, h, &decoder),
            ColorMode::RGB => decode_interleaved(raw, w, h, &decoder, [0, 1, 2]),
            ColorMode::BGR => decode_interleaved(raw, w, h, &decoder, [2, 1, 0]),
            bayer => decode_bayer(raw, w, h, &decoder, bayer),
        };

        Ok(VideoFrame { index, image })
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo {
            filename: self.path.clone(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode(),
            frame_rate: None,
        }
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width == 0 || height == 0 {
        return Err(PoseTrackError::InvalidDimensions { width, height });
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(PoseTrackError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }

    // Treat 0 as little-endian, matching the writers seen in the wild.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// Reads one sample and rescales it to 8 bits.
struct SampleDecoder {
    bytes_per_sample: usize,
    bit_depth: u32,
    little_endian: bool,
}

impl SampleDecoder {
    fn sample(&self, raw: &[u8], sample_index: usize) -> u8 {
        let idx = sample_index * self.bytes_per_sample;
        if self.bytes_per_sample == 1 {
            return raw[idx];
        }
        let pair = [raw[idx], raw[idx + 1]];
        let val = if self.little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        } as u32;
        let max_val = (1u32 << self.bit_depth) - 1;
        ((val.min(max_val) * 255 + max_val / 2) / max_val) as u8
    }
}

fn decode_mono(raw: &[u8], width: u32, height: u32, decoder: &SampleDecoder) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = decoder.sample(raw, (y * width + x) as usize);
        Rgb([v, v, v])
    })
}

fn decode_interleaved(
    raw: &[u8],
    width: u32,
    height: u32,
    decoder: &SampleDecoder,
    rgb_planes: [usize; 3],
) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let base = (y * width + x) as usize * 3;
        Rgb(rgb_planes.map(|plane| decoder.sample(raw, base + plane)))
    })
}

/// Nearest-neighbour demosaic: every pixel of a 2x2 Bayer cell takes the
/// cell's red, mean green and blue samples.
fn decode_bayer(
    raw: &[u8],
    width: u32,
    height: u32,
    decoder: &SampleDecoder,
    mode: ColorMode,
) -> RgbImage {
    // (row, col) of red and blue within the cell; the other two are green.
    let (red_at, blue_at) = match mode {
        ColorMode::BayerGRBG => ((0, 1), (1, 0)),
        ColorMode::BayerGBRG => ((1, 0), (0, 1)),
        ColorMode::BayerBGGR => ((1, 1), (0, 0)),
        _ => ((0, 0), (1, 1)),
    };
    let green_at = [(red_at.0, blue_at.1), (blue_at.0, red_at.1)];

    let at = |x: u32, y: u32, (dy, dx): (u32, u32)| {
        let sx = (x + dx).min(width - 1);
        let sy = (y + dy).min(height - 1);
        decoder.sample(raw, (sy * width + sx) as usize)
    };

    RgbImage::from_fn(width, height, |x, y| {
        let (cx, cy) = (x & !1, y & !1);
        let r = at(cx, cy, red_at);
        let b = at(cx, cy, blue_at);
        let g0 = at(cx, cy, green_at[0]) as u16;
        let g1 = at(cx, cy, green_at[1]) as u16;
        Rgb([r, ((g0 + g1 + 1) / 2) as u8, b])
    })
}
