//! Hand-landmark detectors — an external tracking process, or the mouse.
//!
//! The public interface is the [`HandDetector`] trait: given a frame, return
//! zero or more hands.  The frame loop doesn't need to know whether hands
//! came from a real model or the simulator.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use pinch_core::config::DetectorConfig;
use pinch_core::{Hand, Point, LANDMARK_COUNT};

use crate::frame::Frame;

// ════════════════════════════════════════════════════════════════════════════
// HandDetector trait
// ════════════════════════════════════════════════════════════════════════════

/// Window pointer state, forwarded every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Mouse position in frame pixels, `None` when outside the window.
    pub position: Option<Point>,
    /// Left button or Space held.
    pub pinch:    bool,
}

pub trait HandDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>>;

    /// Simulated detectors follow the pointer; real ones ignore it.
    fn pointer(&mut self, _input: &PointerInput) {}
}

// ════════════════════════════════════════════════════════════════════════════
// SimulatedHand — the mouse is the index fingertip
// ════════════════════════════════════════════════════════════════════════════

/// Offsets of all 21 landmarks from the index tip for a relaxed, open hand
/// with the thumb well clear of the index finger.
const OPEN_HAND: [(f32, f32); LANDMARK_COUNT] = [
    (-30.0,  80.0),                                                  // wrist
    (-45.0,  70.0), (-55.0,  60.0), (-60.0,  50.0), (-60.0,  40.0),  // thumb
    (-10.0,  60.0), ( -5.0,  40.0), ( -2.0,  20.0), (  0.0,   0.0),  // index
    ( 10.0,  70.0), ( 14.0,  30.0), ( 17.0,   5.0), ( 20.0, -20.0),  // middle
    ( 30.0,  65.0), ( 34.0,  35.0), ( 37.0,  12.0), ( 40.0, -10.0),  // ring
    ( 45.0,  60.0), ( 52.0,  40.0), ( 56.0,  25.0), ( 60.0,  10.0),  // pinky
];

/// Thumb tip offset while pinching — well inside any sane touch threshold.
const PINCHED_THUMB: (f32, f32) = (-4.0, 3.0);

#[derive(Debug, Default)]
pub struct SimulatedHand {
    input: PointerInput,
}

impl SimulatedHand {
    pub fn new() -> Self { SimulatedHand::default() }

    /// Synthesise a hand around `tip`.
    pub fn hand_at(tip: Point, pinch: bool) -> Hand {
        let mut landmarks = OPEN_HAND.map(|(dx, dy)| Point::new(tip.x + dx, tip.y + dy));
        if pinch {
            let (dx, dy) = PINCHED_THUMB;
            landmarks[pinch_core::HandLandmark::ThumbTip.index()] =
                Point::new(tip.x + dx, tip.y + dy);
            landmarks[pinch_core::HandLandmark::ThumbIp.index()] =
                Point::new(tip.x - 20.0, tip.y + 20.0);
        }
        let mut hand = Hand::new(landmarks);
        hand.handedness = "Right".into();
        hand
    }
}

impl HandDetector for SimulatedHand {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Hand>> {
        Ok(self.input.position
            .map(|tip| SimulatedHand::hand_at(tip, self.input.pinch))
            .into_iter()
            .collect())
    }

    fn pointer(&mut self, input: &PointerInput) { self.input = *input; }
}

// ════════════════════════════════════════════════════════════════════════════
// SubprocessDetector — external hand-tracking model over pipes
// ════════════════════════════════════════════════════════════════════════════

/// Runs a hand-landmark model (e.g. a MediaPipe helper script) as a child
/// process.
///
/// # Protocol
///
/// * Child prints `READY` once its model is loaded.
/// * Per frame we write `width`, `height`, `channels` as little-endian
///   `u32`s followed by raw RGB bytes.
/// * Child answers with one JSON line:
///   `{"hands":[{"handedness":"Right","score":0.9,"landmarks":[{"x":..,"y":..,"z":..}, …]}]}`
///   with `x`/`y` normalised to 0..1.  An `"error"` field means "no hands".
pub struct SubprocessDetector {
    child:          Child,
    stdin:          ChildStdin,
    stdout:         BufReader<ChildStdout>,
    min_confidence: f32,
}

/// MediaPipe Hands helper speaking the protocol above, run with
/// `python3 -c` when `detector.command` is empty.
pub const BUNDLED_HELPER: &str = include_str!("../hand_detect.py");

/// Program and arguments to launch for `cfg`.
pub fn detector_command(cfg: &DetectorConfig) -> Vec<String> {
    if cfg.command.is_empty() {
        vec!["python3".into(), "-u".into(), "-c".into(), BUNDLED_HELPER.into()]
    } else {
        cfg.command.clone()
    }
}

impl SubprocessDetector {
    pub fn spawn(cfg: &DetectorConfig) -> Result<Self> {
        let command = detector_command(cfg);
        let (program, args) = command.split_first()
            .context("detector.command is empty")?;

        if cfg.command.is_empty() {
            tracing::info!("starting bundled MediaPipe hand detector");
        } else {
            tracing::info!(command = ?cfg.command, "starting hand detector process");
        }
        let mut child = Command::new(program)
            .args(args)
            .env("PINCH_MIN_DETECTION_CONFIDENCE", cfg.min_detection_confidence.to_string())
            .env("PINCH_MIN_TRACKING_CONFIDENCE",  cfg.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start hand detector {:?}", program))?;

        let stdin  = child.stdin.take().context("hand detector has no stdin")?;
        let stdout = child.stdout.take().context("hand detector has no stdout")?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout.read_line(&mut ready).context("hand detector closed before READY")?;
        if ready.trim() != "READY" {
            let _ = child.kill();
            bail!("hand detector did not signal READY, got {:?}", ready.trim());
        }
        tracing::info!("hand detector ready");

        Ok(SubprocessDetector {
            child,
            stdin,
            stdout,
            min_confidence: cfg.min_detection_confidence,
        })
    }
}

impl HandDetector for SubprocessDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>> {
        let rgb = frame.to_rgb();
        self.stdin.write_all(&frame.width.to_le_bytes())?;
        self.stdin.write_all(&frame.height.to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&rgb)?;
        self.stdin.flush().context("hand detector stopped reading frames")?;

        let mut line = String::new();
        let n = self.stdout.read_line(&mut line)?;
        if n == 0 {
            bail!("hand detector exited");
        }
        parse_detection(&line, frame.width, frame.height, self.min_confidence)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

// ── JSON reply ────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score:      f32,
    landmarks:  Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode one reply line into pixel-space hands, dropping hands below
/// `min_confidence` or with the wrong number of landmarks.
pub fn parse_detection(line: &str, width: u32, height: u32, min_confidence: f32) -> Result<Vec<Hand>> {
    let reply: DetectionJson = serde_json::from_str(line.trim())
        .with_context(|| format!("malformed hand detector reply: {}", line.trim()))?;

    if let Some(err) = reply.error {
        tracing::warn!(error = %err, "hand detector reported an error");
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(reply.hands.len());
    for h in reply.hands {
        if h.score < min_confidence {
            tracing::debug!(score = h.score, "hand below confidence threshold");
            continue;
        }
        if h.landmarks.len() != LANDMARK_COUNT {
            tracing::warn!(got = h.landmarks.len(), "expected {} landmarks", LANDMARK_COUNT);
            continue;
        }
        let mut normalized = [Point::default(); LANDMARK_COUNT];
        for (slot, lm) in normalized.iter_mut().zip(&h.landmarks) {
            *slot = Point::new(lm.x, lm.y);
        }
        let mut hand = Hand::from_normalized(normalized, width, height);
        hand.handedness = h.handedness;
        hand.score = h.score;
        hands.push(hand);
    }
    Ok(hands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(score: f32, count: usize) -> String {
        let lms: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, i as f32 / 40.0))
            .collect();
        format!(
            r#"{{"hands":[{{"handedness":"Left","score":{},"landmarks":[{}]}}]}}"#,
            score,
            lms.join(",")
        )
    }

    #[test]
    fn parses_and_scales_landmarks() {
        let hands = parse_detection(&reply(0.9, 21), 1280, 720, 0.5).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].handedness, "Left");
        // landmark 8: x = 8/40 = 0.2
        assert!(hands[0].index_tip().distance(Point::new(256.0, 360.0)) < 0.01);
        assert!(hands[0].thumb_tip().distance(Point::new(128.0, 360.0)) < 0.01);
    }

    #[test]
    fn low_confidence_hands_are_dropped() {
        assert!(parse_detection(&reply(0.3, 21), 640, 480, 0.5).unwrap().is_empty());
    }

    #[test]
    fn wrong_landmark_count_is_dropped() {
        assert!(parse_detection(&reply(0.9, 20), 640, 480, 0.5).unwrap().is_empty());
    }

    #[test]
    fn error_reply_means_no_hands() {
        let hands = parse_detection(r#"{"hands":[],"error":"model crashed"}"#, 640, 480, 0.5).unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn empty_reply_is_no_hands() {
        assert!(parse_detection(r#"{"hands":[]}"#, 640, 480, 0.5).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_detection("not json", 640, 480, 0.5).is_err());
    }

    fn shell(script: &str) -> DetectorConfig {
        DetectorConfig {
            command: vec!["sh".into(), "-c".into(), script.into()],
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn empty_command_runs_bundled_helper() {
        let cmd = detector_command(&DetectorConfig::default());
        assert_eq!(&cmd[..3], &["python3", "-u", "-c"]);
        assert!(cmd[3].contains("READY"));
        assert!(cmd[3].contains("PINCH_MIN_DETECTION_CONFIDENCE"));
        assert!(cmd[3].contains("PINCH_MIN_TRACKING_CONFIDENCE"));

        let custom = shell("true");
        assert_eq!(detector_command(&custom), custom.command);
    }

    #[cfg(unix)]
    #[test]
    fn subprocess_round_trip_over_pipes() {
        // 2x1 frame: 12 header bytes + 6 RGB bytes
        let cfg = shell(r#"echo READY; head -c 18 >/dev/null; echo '{"hands":[]}'"#);
        let mut det = SubprocessDetector::spawn(&cfg).unwrap();
        let hands = det.detect(&Frame::filled(2, 1, 0xFF102030)).unwrap();
        assert!(hands.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn helper_without_ready_fails_to_start() {
        assert!(SubprocessDetector::spawn(&shell("echo LOADING")).is_err());
    }

    #[test]
    fn simulated_hand_follows_pointer() {
        let mut sim = SimulatedHand::new();
        let frame = Frame::filled(4, 4, 0);
        assert!(sim.detect(&frame).unwrap().is_empty());

        sim.pointer(&PointerInput { position: Some(Point::new(300.0, 200.0)), pinch: false });
        let open = sim.detect(&frame).unwrap();
        assert_eq!(open[0].index_tip(), Point::new(300.0, 200.0));
        assert!(open[0].thumb_tip().distance(open[0].index_tip()) > 60.0);

        sim.pointer(&PointerInput { position: Some(Point::new(300.0, 200.0)), pinch: true });
        let pinched = sim.detect(&frame).unwrap();
        assert!(pinched[0].thumb_tip().distance(pinched[0].index_tip()) < 10.0);
    }
}
