use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for the live overlay loop.
///
/// The loop reports through this trait instead of logging directly so the
/// CLI can print a summary while tests stay silent.
pub trait PipelineLogger: Send {
    /// Report that `current` frames have been shown. `total` is `None` for
    /// live sources and files whose length is unknown.
    fn progress(&mut self, current: usize, total: Option<usize>);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame metric (e.g. faces found).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: Option<usize>) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and maximum of one timing or metric.
///
/// A live loop can run for hours, so samples are folded in as they arrive
/// instead of being kept.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStats {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl RunningStats {
    pub fn record(&mut self, value: f64) {
        self.max = if self.count == 0 {
            value
        } else {
            self.max.max(value)
        };
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Collects per-stage timings and metrics, and writes them through `log`
/// as a summary once the loop ends.
///
/// Progress lines are throttled to one every `throttle_frames` frames.
pub struct SummaryPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, RunningStats>,
    metrics: BTreeMap<String, RunningStats>,
    start_time: Instant,
    frames: usize,
}

impl SummaryPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn timings_for(&self, stage: &str) -> Option<&RunningStats> {
        self.timings.get(stage)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&RunningStats> {
        self.metrics.get(name)
    }

    /// Formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Overlay summary ({} frames, {:.1}s total):",
            self.frames,
            elapsed_ms / 1000.0
        )];

        for (stage, stats) in &self.timings {
            let pct = if elapsed_ms > 0.0 {
                stats.sum / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  max {:6.1}ms  ({pct:4.1}%)",
                stats.mean(),
                stats.max
            ));
        }

        for (name, stats) in &self.metrics {
            lines.push(format!(
                "  {name}: avg {:.1}  total {:.0}",
                stats.mean(),
                stats.sum
            ));
        }

        if self.frames > 0 && elapsed_ms > 0.0 {
            let fps = self.frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.2} fps"));
        }

        Some(lines.join("\n"))
    }
}

impl Default for SummaryPipelineLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl PipelineLogger for SummaryPipelineLogger {
    fn progress(&mut self, current: usize, total: Option<usize>) {
        self.frames = current;
        match total {
            Some(total) if total > 0 => {
                if current % self.throttle_frames == 0 || current == total {
                    let pct = current as f64 / total as f64 * 100.0;
                    log::info!("Processed {current}/{total} frames ({pct:.1}%)");
                }
            }
            _ => {
                if current % self.throttle_frames == 0 {
                    log::info!("Processed {current} frames");
                }
            }
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, None);
        logger.timing("analyze", 5.0);
        logger.metric("faces", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_folds_values_per_stage() {
        let mut logger = SummaryPipelineLogger::new(10);
        logger.timing("analyze", 120.0);
        logger.timing("analyze", 80.0);
        logger.timing("render", 2.0);

        let analyze = logger.timings_for("analyze").unwrap();
        assert_eq!(analyze.count, 2);
        assert_relative_eq!(analyze.sum, 200.0);
        assert_relative_eq!(analyze.max, 120.0);
        assert_relative_eq!(analyze.mean(), 100.0);
        assert_eq!(logger.timings_for("render").unwrap().count, 1);
        assert!(logger.timings_for("encode").is_none());
    }

    #[test]
    fn test_metric_mean() {
        let mut logger = SummaryPipelineLogger::new(10);
        logger.metric("faces", 1.0);
        logger.metric("faces", 2.0);
        assert_relative_eq!(logger.metrics_for("faces").unwrap().mean(), 1.5);
    }

    #[test]
    fn test_long_run_keeps_constant_state() {
        let mut logger = SummaryPipelineLogger::new(10);
        for frame in 0..100_000 {
            logger.timing("capture", (frame % 7) as f64);
            logger.metric("faces", (frame % 3) as f64);
        }
        let capture = logger.timings_for("capture").unwrap();
        assert_eq!(capture.count, 100_000);
        assert_relative_eq!(capture.max, 6.0);
        assert_relative_eq!(logger.metrics_for("faces").unwrap().max, 2.0);
    }

    #[test]
    fn test_running_stats_max_with_negative_values() {
        let mut stats = RunningStats::default();
        stats.record(-3.0);
        stats.record(-5.0);
        assert_relative_eq!(stats.max, -3.0);
        assert_relative_eq!(RunningStats::default().mean(), 0.0);
    }

    #[test]
    fn test_summary_lists_stages_metrics_and_throughput() {
        let mut logger = SummaryPipelineLogger::new(10);
        logger.progress(4, None);
        logger.timing("capture", 10.0);
        logger.timing("analyze", 200.0);
        logger.metric("faces", 2.0);
        logger.metric("faces", 3.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Overlay summary (4 frames"));
        assert!(summary.contains("capture"));
        assert!(summary.contains("analyze"));
        assert!(summary.contains("faces: avg 2.5  total 5"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_summary_stages_are_sorted() {
        let mut logger = SummaryPipelineLogger::new(10);
        logger.timing("render", 1.0);
        logger.timing("analyze", 1.0);
        let summary = logger.summary_string().unwrap();
        assert!(summary.find("analyze").unwrap() < summary.find("render").unwrap());
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(SummaryPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frames_with_and_without_total() {
        let mut logger = SummaryPipelineLogger::new(10);
        for i in 1..=20 {
            logger.progress(i, Some(20));
        }
        assert_eq!(logger.frames(), 20);

        logger.progress(21, None);
        assert_eq!(logger.frames(), 21);
    }

    #[test]
    fn test_throttle_is_at_least_one() {
        let mut logger = SummaryPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
        logger.progress(3, None);
    }
}
