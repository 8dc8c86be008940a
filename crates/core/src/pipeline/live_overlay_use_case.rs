use std::fmt;
use std::time::Instant;

use crate::detection::domain::face_analyzer::FaceAnalyzer;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::display_sink::{DisplaySink, SinkEvent};
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::image_encoder::ImageEncoder;

/// Why the overlay loop stopped without an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The display sink reported the quit key.
    Quit,
    /// A file source ran out of frames.
    EndOfStream,
    /// The configured frame limit was reached.
    FrameLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Quit => "quit requested",
            StopReason::EndOfStream => "end of stream",
            StopReason::FrameLimit => "frame limit reached",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: usize,
    pub faces: usize,
    pub stop: StopReason,
}

/// Capture → encode → analyze → render → show, once per frame.
///
/// Every failure is fatal to the loop and returned as is. The source and
/// sink are closed on every exit path, including errors.
pub struct LiveOverlayUseCase {
    source: Box<dyn FrameSource>,
    encoder: Box<dyn ImageEncoder>,
    analyzer: Box<dyn FaceAnalyzer>,
    renderer: OverlayRenderer,
    sink: Box<dyn DisplaySink>,
    logger: Box<dyn PipelineLogger>,
    max_frames: Option<usize>,
}

/// Holds the open source and sink for the duration of one run and
/// releases both when dropped.
struct Session<'a> {
    source: &'a mut Box<dyn FrameSource>,
    sink: &'a mut Box<dyn DisplaySink>,
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.sink.close();
        self.source.close();
    }
}

impl LiveOverlayUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn FrameSource>,
        encoder: Box<dyn ImageEncoder>,
        analyzer: Box<dyn FaceAnalyzer>,
        renderer: OverlayRenderer,
        sink: Box<dyn DisplaySink>,
        logger: Box<dyn PipelineLogger>,
        max_frames: Option<usize>,
    ) -> Self {
        Self {
            source,
            encoder,
            analyzer,
            renderer,
            sink,
            logger,
            max_frames,
        }
    }

    pub fn execute(&mut self) -> Result<LoopSummary, Box<dyn std::error::Error>> {
        let mut session = Session {
            source: &mut self.source,
            sink: &mut self.sink,
        };
        let metadata = session.source.open()?;
        self.logger.info(&format!(
            "Reading {} ({}x{})",
            metadata.description, metadata.width, metadata.height
        ));

        let mut frames = 0;
        let mut faces = 0;
        let stop = loop {
            if self.max_frames.is_some_and(|max| frames >= max) {
                break StopReason::FrameLimit;
            }

            let start = Instant::now();
            let Some(mut frame) = session.source.next_frame()? else {
                break StopReason::EndOfStream;
            };
            self.logger.timing("capture", elapsed_ms(start));

            let start = Instant::now();
            let encoded = self.encoder.encode(&frame)?;
            self.logger.timing("encode", elapsed_ms(start));

            let start = Instant::now();
            let result = self.analyzer.analyze(&encoded)?;
            self.logger.timing("analyze", elapsed_ms(start));
            self.logger.metric("faces", result.len() as f64);

            let start = Instant::now();
            self.renderer.render(&mut frame, &result);
            self.logger.timing("render", elapsed_ms(start));

            let start = Instant::now();
            let event = session.sink.show(&frame)?;
            self.logger.timing("display", elapsed_ms(start));

            frames += 1;
            faces += result.len();
            self.logger.progress(frames, metadata.total_frames);

            if event == SinkEvent::Quit {
                break StopReason::Quit;
            }
        };
        drop(session);

        self.logger.info(&format!("Stopped after {frames} frame(s): {stop}"));
        self.logger.summary();
        Ok(LoopSummary {
            frames,
            faces,
            stop,
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
