//! Top-level frame loop.
//!
//! One iteration: poll the window, read a frame, detect hands, advance the
//! [`Session`], draw.  Everything runs on the calling thread; the window's
//! update rate limiter (or a blocking camera read) paces the loop.

use std::time::Instant;

use anyhow::{Context, Result};

use pinch_core::{Config, FrameReport, Hand, Session};

use crate::detector::{HandDetector, PointerInput, SimulatedHand};
use crate::frame::{Backdrop, Frame, FrameSource};
use crate::inject::open_injector;
use crate::overlay::OverlayView;
use crate::visualizer::Visualizer;

/// Frames the "key fired" ring stays on screen.
const FLASH_FRAMES: u8 = 8;

// ════════════════════════════════════════════════════════════════════════════
// Mode / AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The mouse plays the hand; no camera.
    Simulation,
    /// Webcam frames and an external hand detector.
    #[cfg(feature = "camera")]
    Camera,
}

impl Mode {
    /// Camera when compiled in, simulation otherwise.
    #[cfg(feature = "camera")]
    pub fn default_for_build() -> Self { Mode::Camera }

    #[cfg(not(feature = "camera"))]
    pub fn default_for_build() -> Self { Mode::Simulation }

    pub fn banner(self) -> &'static str {
        match self {
            Mode::Simulation => "SIMULATION - MOUSE IS YOUR HAND",
            #[cfg(feature = "camera")]
            Mode::Camera     => "CAMERA",
        }
    }
}

pub struct AppConfig {
    pub config: Config,
    pub mode:   Mode,
}

/// Printed when the run ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub text:   String,
    pub chars:  usize,
    pub frames: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameLoop — state carried between iterations
// ════════════════════════════════════════════════════════════════════════════

pub struct FrameLoop {
    session: Session,
    width:   u32,
    height:  u32,
    mirror:  bool,
    flash:   u8,
}

/// Output of one [`FrameLoop::step`].
pub struct Step {
    pub frame:  Frame,
    pub hands:  Vec<Hand>,
    pub report: FrameReport,
}

impl FrameLoop {
    pub fn new(session: Session, cfg: &Config) -> Self {
        FrameLoop {
            session,
            width:  cfg.camera.width,
            height: cfg.camera.height,
            mirror: cfg.camera.mirror,
            flash:  0,
        }
    }

    /// Capture, detect and update state for one frame.
    pub fn step(
        &mut self,
        source:   &mut dyn FrameSource,
        detector: &mut dyn HandDetector,
        pointer:  &PointerInput,
        now:      Instant,
    ) -> Result<Step> {
        let mut frame = source.read()?.fit(self.width, self.height);
        if self.mirror {
            frame.mirror();
        }

        detector.pointer(pointer);
        let hands = detector.detect(&frame).context("hand detection failed")?;
        let report = self.session.process_frame(&hands, now);

        if report.pressed.is_some() {
            self.flash = FLASH_FRAMES;
        } else {
            self.flash = self.flash.saturating_sub(1);
        }
        Ok(Step { frame, hands, report })
    }

    pub fn session(&self) -> &Session { &self.session }
    pub fn flashing(&self) -> bool { self.flash > 0 }

    pub fn summary(&self) -> SessionSummary {
        let text = self.session.text();
        SessionSummary {
            text:   text.as_str().to_string(),
            chars:  text.char_count(),
            frames: self.session.frames(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

type Inputs = (Box<dyn FrameSource>, Box<dyn HandDetector>);

/// Camera and detector failures here are fatal: no frames, no typing.
fn open_inputs(app: &AppConfig) -> Result<Inputs> {
    let cfg = &app.config;
    match app.mode {
        Mode::Simulation => {
            let source: Box<dyn FrameSource> =
                Box::new(Backdrop::new(cfg.camera.width, cfg.camera.height));
            let detector: Box<dyn HandDetector> = Box::new(SimulatedHand::new());
            Ok((source, detector))
        }
        #[cfg(feature = "camera")]
        Mode::Camera => {
            let source: Box<dyn FrameSource> =
                Box::new(crate::camera::WebCamera::open(&cfg.camera)?);
            let detector: Box<dyn HandDetector> =
                Box::new(crate::detector::SubprocessDetector::spawn(&cfg.detector)?);
            Ok((source, detector))
        }
    }
}

/// Run until the window closes or the quit key is pressed.
pub fn run(app: AppConfig) -> Result<SessionSummary> {
    let cfg = &app.config;
    let (mut source, mut detector) = open_inputs(&app)?;

    let injector = open_injector(cfg.injection.enabled);
    let mut frames = FrameLoop::new(Session::from_config(cfg, injector), cfg);

    let mut vis = Visualizer::new("Pinch Keyboard", cfg.camera.width, cfg.camera.height)?;
    tracing::info!(mode = ?app.mode, "window open, touch index finger to thumb to type");

    while vis.is_open() {
        let input = vis.poll_input();
        if input.quit {
            tracing::info!("quit requested");
            break;
        }

        let step = frames.step(source.as_mut(), detector.as_mut(), &input.pointer, Instant::now())?;

        let view = OverlayView {
            keyboard: frames.session().keyboard(),
            hands:    &step.hands,
            report:   &step.report,
            text:     frames.session().text(),
            flash:    frames.flashing(),
            mode:     app.mode.banner(),
        };
        vis.render(&step.frame, &view)?;
    }

    Ok(frames.summary())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
