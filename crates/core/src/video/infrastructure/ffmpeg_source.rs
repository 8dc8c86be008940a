use std::fmt;
use std::path::{Path, PathBuf};

use ffmpeg_next::format::context::{Context as FormatContext, Input};
use ffmpeg_next::format::format::{Format, Input as InputFormat};
use ffmpeg_next::codec::packet::Packet;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;
use thiserror::Error;

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::FrameSource;

#[cfg(target_os = "macos")]
const CAPTURE_BACKEND: &str = "avfoundation";
#[cfg(target_os = "windows")]
const CAPTURE_BACKEND: &str = "dshow";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CAPTURE_BACKEND: &str = "v4l2";

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("frame source has not been opened")]
    NotOpened,
    #[error("no video stream found in {0}")]
    NoVideoStream(String),
    #[error("ffmpeg was built without the {0} capture device")]
    NoCaptureBackend(&'static str),
    #[error("camera {device} stopped delivering frames")]
    FrameUnavailable { device: String },
    #[error("decoded frame does not fill {width}x{height} RGB pixels")]
    FrameSize { width: u32, height: u32 },
    #[error(transparent)]
    Ffmpeg(#[from] ffmpeg_next::Error),
}

/// What a single demuxer read means for the decode loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadOutcome {
    Packet,
    /// The device has nothing ready yet.
    Retry,
    EndOfInput,
}

/// Any read error other than end of input or `EAGAIN` is fatal; an
/// unplugged camera reports `ENODEV` or `EIO` here and must not be retried.
fn read_outcome(result: Result<(), ffmpeg_next::Error>) -> Result<ReadOutcome, CaptureError> {
    match result {
        Ok(()) => Ok(ReadOutcome::Packet),
        Err(ffmpeg_next::Error::Eof) => Ok(ReadOutcome::EndOfInput),
        Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::error::EAGAIN => {
            Ok(ReadOutcome::Retry)
        }
        Err(e) => Err(CaptureError::Ffmpeg(e)),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    Camera { device: String },
    File { path: PathBuf },
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Camera { device } => write!(f, "camera {device}"),
            SourceKind::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Captures frames through libavformat/libavdevice.
///
/// A camera is opened with the platform capture device (v4l2,
/// avfoundation or dshow); a file is anything ffmpeg can demux, including
/// single still images. Every decoded frame is converted to RGB24.
pub struct FfmpegSource {
    kind: SourceKind,
    state: Option<DecodeState>,
}

// Safety: FfmpegSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegSource {}

impl FfmpegSource {
    pub fn camera(device: &str) -> Self {
        Self {
            kind: SourceKind::Camera {
                device: device_path(device),
            },
            state: None,
        }
    }

    pub fn file(path: &Path) -> Self {
        Self {
            kind: SourceKind::File {
                path: path.to_path_buf(),
            },
            state: None,
        }
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }
}

struct DecodeState {
    input: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    width: u32,
    height: u32,
    stream_index: usize,
    frame_index: usize,
    flushing: bool,
}

impl DecodeState {
    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        loop {
            if let Some(frame) = self.receive()? {
                return Ok(Some(frame));
            }
            if self.flushing {
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match read_outcome(packet.read(&mut self.input))? {
                ReadOutcome::Packet => {
                    if packet.stream() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        log::debug!("Skipping undecodable packet: {e}");
                    }
                }
                ReadOutcome::Retry => continue,
                ReadOutcome::EndOfInput => {
                    let _ = self.decoder.send_eof();
                    self.flushing = true;
                }
            }
        }
    }

    fn receive(&mut self) -> Result<Option<Frame>, CaptureError> {
        let mut decoded = Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        let mut rgb_frame = Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;
        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, self.frame_index).ok_or(
            CaptureError::FrameSize {
                width: self.width,
                height: self.height,
            },
        )?;
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

impl FrameSource for FfmpegSource {
    fn open(&mut self) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let input = open_input(&self.kind)?;
        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| CaptureError::NoVideoStream(self.kind.to_string()))?;

        let stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };
        let live = matches!(self.kind, SourceKind::Camera { .. });
        let total_frames = match (&self.kind, stream.frames()) {
            (SourceKind::Camera { .. }, _) => None,
            (_, n) if n > 0 => Some(n as usize),
            (SourceKind::File { path }, _) if is_image_path(path) => Some(1),
            _ => None,
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        let metadata = SourceMetadata {
            width,
            height,
            fps,
            total_frames,
            description: self.kind.to_string(),
            live,
        };
        log::info!("Opened {} ({width}x{height} @ {fps:.1} fps)", self.kind);

        self.state = Some(DecodeState {
            input,
            decoder,
            scaler,
            width,
            height,
            stream_index,
            frame_index: 0,
            flushing: false,
        });
        Ok(metadata)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let state = self.state.as_mut().ok_or(CaptureError::NotOpened)?;
        match state.read_frame()? {
            Some(frame) => Ok(Some(frame)),
            None => match &self.kind {
                SourceKind::Camera { device } => Err(CaptureError::FrameUnavailable {
                    device: device.clone(),
                }
                .into()),
                SourceKind::File { .. } => Ok(None),
            },
        }
    }

    fn close(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Closed {}", self.kind);
        }
    }
}

fn open_input(kind: &SourceKind) -> Result<Input, CaptureError> {
    match kind {
        SourceKind::File { path } => Ok(ffmpeg_next::format::input(path)?),
        SourceKind::Camera { device } => {
            ffmpeg_next::device::register_all();
            let format = capture_format().ok_or(CaptureError::NoCaptureBackend(CAPTURE_BACKEND))?;
            let context = ffmpeg_next::format::open_with(
                device,
                &Format::Input(format),
                ffmpeg_next::Dictionary::new(),
            )?;
            match context {
                FormatContext::Input(input) => Ok(input),
                FormatContext::Output(_) => Err(CaptureError::NoCaptureBackend(CAPTURE_BACKEND)),
            }
        }
    }
}

/// Finds the platform capture demuxer. Its registered name may carry
/// aliases (e.g. `video4linux2,v4l2`).
fn capture_format() -> Option<InputFormat> {
    ffmpeg_next::device::input::video()
        .find(|format| format.name().split(',').any(|name| name == CAPTURE_BACKEND))
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Maps a bare camera index to the platform's device path.
///
/// On Linux `2` becomes `/dev/video2`; elsewhere the capture backend takes
/// the index (or device name) as given.
fn device_path(device: &str) -> String {
    if cfg!(not(any(target_os = "macos", target_os = "windows")))
        && !device.is_empty()
        && device.chars().all(|c| c.is_ascii_digit())
    {
        return format!("/dev/video{device}");
    }
    device.to_string()
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping per-row stride padding.
fn extract_rgb_pixels(rgb_frame: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    pixels
}
