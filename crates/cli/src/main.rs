use std::path::PathBuf;
use std::process;

use clap::Parser;

use faceframe_core::detection::domain::face_analyzer::FaceAnalyzer;
use faceframe_core::detection::infrastructure::recorded_response_analyzer::RecordedResponseAnalyzer;
use faceframe_core::detection::infrastructure::rekognition_analyzer::RekognitionAnalyzer;
use faceframe_core::overlay::domain::label_painter::LabelPainter;
use faceframe_core::overlay::domain::overlay_renderer::OverlayRenderer;
use faceframe_core::overlay::domain::overlay_style::OverlayStyle;
use faceframe_core::overlay::infrastructure::font_label_painter::FontLabelPainter;
use faceframe_core::overlay::infrastructure::stroke_label_painter::StrokeLabelPainter;
use faceframe_core::pipeline::live_overlay_use_case::LiveOverlayUseCase;
use faceframe_core::pipeline::pipeline_logger::SummaryPipelineLogger;
use faceframe_core::shared::constants::{
    DEFAULT_CAMERA, DEFAULT_JPEG_QUALITY, DEFAULT_REGION, LABEL_FONT_NAME, LABEL_FONT_URL,
};
use faceframe_core::shared::font_resolver;
use faceframe_core::video::domain::display_sink::DisplaySink;
use faceframe_core::video::domain::frame_source::FrameSource;
use faceframe_core::video::infrastructure::ffmpeg_source::FfmpegSource;
use faceframe_core::video::infrastructure::image_file_sink::ImageFileSink;
use faceframe_core::video::infrastructure::jpeg_encoder::JpegEncoder;

/// Live face analysis overlay: bounding box, landmarks and age range.
///
/// Pick a display: --window (needs a build with `--features window`),
/// --output or --output-dir.
#[derive(Parser, Debug)]
#[command(name = "faceframe")]
struct Cli {
    /// Camera device: an index (0 = /dev/video0 on Linux) or a device path.
    #[arg(long, conflicts_with = "input")]
    camera: Option<String>,

    /// Read frames from a video or image file instead of a camera.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write each annotated frame over this image file.
    #[arg(long, conflicts_with_all = ["output_dir", "window"])]
    output: Option<PathBuf>,

    /// Write annotated frames as numbered JPEGs into this directory.
    #[arg(long, conflicts_with = "window")]
    output_dir: Option<PathBuf>,

    /// Show annotated frames in the `output` window (press q to quit).
    /// Only available when built with `--features window`.
    #[arg(long)]
    window: bool,

    /// Region of the face analysis service.
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Replay a saved DetectFaces JSON response instead of calling the service.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// TrueType/OpenType font for the age label.
    #[arg(long, conflicts_with = "download_font")]
    font: Option<PathBuf>,

    /// Download (once) and use Noto Sans for the age label.
    #[arg(long)]
    download_font: bool,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// JPEG quality of the analysed image (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    jpeg_quality: u8,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let source = build_source(&cli);
    let analyzer = build_analyzer(&cli)?;
    let renderer = OverlayRenderer::new(OverlayStyle::default(), build_label_painter(&cli)?);
    let sink = build_sink(&cli)?;

    let mut use_case = LiveOverlayUseCase::new(
        source,
        Box::new(JpegEncoder::new(cli.jpeg_quality)?),
        analyzer,
        renderer,
        sink,
        Box::new(SummaryPipelineLogger::default()),
        cli.max_frames,
    );
    let summary = use_case.execute()?;
    log::info!(
        "Annotated {} frame(s), {} face(s) in total ({})",
        summary.frames,
        summary.faces,
        summary.stop
    );
    Ok(())
}

fn build_source(cli: &Cli) -> Box<dyn FrameSource> {
    match &cli.input {
        Some(path) => Box::new(FfmpegSource::file(path)),
        None => Box::new(FfmpegSource::camera(
            cli.camera.as_deref().unwrap_or(DEFAULT_CAMERA),
        )),
    }
}

fn build_analyzer(cli: &Cli) -> Result<Box<dyn FaceAnalyzer>, Box<dyn std::error::Error>> {
    match &cli.replay {
        Some(path) => {
            log::info!("Replaying face analysis from {}", path.display());
            Ok(Box::new(RecordedResponseAnalyzer::from_path(path)?))
        }
        None => Ok(Box::new(RekognitionAnalyzer::new(&cli.region)?)),
    }
}

fn build_label_painter(cli: &Cli) -> Result<Box<dyn LabelPainter>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.font {
        return Ok(Box::new(FontLabelPainter::from_path(path)?));
    }
    if cli.download_font {
        let path = font_resolver::resolve(
            LABEL_FONT_NAME,
            LABEL_FONT_URL,
            None,
            Some(Box::new(download_progress)),
        )?;
        eprintln!();
        return Ok(Box::new(FontLabelPainter::from_path(&path)?));
    }
    Ok(Box::new(StrokeLabelPainter::new()))
}

fn build_sink(cli: &Cli) -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.output {
        return Ok(Box::new(ImageFileSink::overwrite(path)));
    }
    if let Some(dir) = &cli.output_dir {
        return Ok(Box::new(ImageFileSink::numbered(dir, "jpg")));
    }
    window_sink()
}

#[cfg(feature = "window")]
fn window_sink() -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    use faceframe_core::video::infrastructure::highgui_window_sink::HighguiWindowSink;
    Ok(Box::new(HighguiWindowSink::new()))
}

#[cfg(not(feature = "window"))]
fn window_sink() -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    Err("this build has no window support; rebuild with --features window".into())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if let Some(replay) = &cli.replay {
        if !replay.exists() {
            return Err(format!("Replay file not found: {}", replay.display()).into());
        }
    }
    if let Some(font) = &cli.font {
        if !font.exists() {
            return Err(format!("Font file not found: {}", font.display()).into());
        }
    }
    if cli.output.is_none() && cli.output_dir.is_none() && !cli.window {
        return Err(if cfg!(feature = "window") {
            "No display selected: pass --window, --output or --output-dir".into()
        } else {
            "No display selected: pass --output or --output-dir \
             (--window needs a build with `--features window`)"
                .into()
        });
    }
    if cli.window && !cfg!(feature = "window") {
        return Err("--window requires a build with the `window` feature".into());
    }
    if !(1..=100).contains(&cli.jpeg_quality) {
        return Err(format!(
            "JPEG quality must be between 1 and 100, got {}",
            cli.jpeg_quality
        )
        .into());
    }
    if cli.region.trim().is_empty() {
        return Err("Region must not be empty".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading label font... {pct}%");
    } else {
        eprint!("\rDownloading label font... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("faceframe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--output", "out.jpg"]);
        assert_eq!(cli.camera, None);
        assert_eq!(cli.region, "eu-central-1");
        assert_eq!(cli.jpeg_quality, 95);
        assert_eq!(cli.max_frames, None);
        assert!(!cli.window);
        assert!(validate(&cli).is_ok());
    }

    #[rstest]
    #[case::camera_and_input(&["--camera", "0", "--input", "a.mp4", "--output", "o.jpg"])]
    #[case::two_sinks(&["--output", "o.jpg", "--output-dir", "frames"])]
    #[case::font_and_download(&["--output", "o.jpg", "--font", "a.ttf", "--download-font"])]
    fn test_conflicting_flags_are_rejected(#[case] args: &[&str]) {
        let args = std::iter::once("faceframe").chain(args.iter().copied());
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[rstest]
    #[case::no_sink(&[], "No display selected")]
    #[case::quality_zero(&["--output", "o.jpg", "--jpeg-quality", "0"], "JPEG quality")]
    #[case::quality_high(&["--output", "o.jpg", "--jpeg-quality", "101"], "JPEG quality")]
    #[case::missing_input(&["--input", "/nonexistent/clip.mp4", "--output", "o.jpg"], "Input file not found")]
    #[case::missing_replay(&["--replay", "/nonexistent/r.json", "--output", "o.jpg"], "Replay file not found")]
    #[case::missing_font(&["--font", "/nonexistent/f.ttf", "--output", "o.jpg"], "Font file not found")]
    #[case::blank_region(&["--region", " ", "--output", "o.jpg"], "Region")]
    fn test_validate_rejects(#[case] args: &[&str], #[case] message: &str) {
        let err = validate(&parse(args)).unwrap_err();
        assert!(err.to_string().contains(message), "{err}");
    }

    #[test]
    fn test_camera_is_default_source() {
        let cli = parse(&["--output-dir", "frames"]);
        assert!(cli.input.is_none());
        let _source = build_source(&cli);
    }

    #[test]
    fn test_help_names_window_feature() {
        let command = Cli::command();
        let window = command
            .get_arguments()
            .find(|arg| arg.get_id() == "window")
            .unwrap();
        assert!(window.get_help().unwrap().to_string().contains("--features window"));
        assert!(command.get_long_about().unwrap().to_string().contains("--features window"));
    }

    #[cfg(not(feature = "window"))]
    #[test]
    fn test_no_display_error_points_at_window_feature() {
        let err = validate(&parse(&[])).unwrap_err();
        assert!(err.to_string().contains("--features window"));
    }

    #[cfg(not(feature = "window"))]
    #[test]
    fn test_window_needs_feature() {
        let err = validate(&parse(&["--window"])).unwrap_err();
        assert!(err.to_string().contains("window"));
    }
}
