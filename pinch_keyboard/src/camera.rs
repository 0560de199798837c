//! Webcam capture via `nokhwa` (feature = "camera").

use anyhow::{Context, Result};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;

use pinch_core::config::CameraConfig;

use crate::frame::{Frame, FrameSource};

pub struct WebCamera {
    camera: Camera,
}

impl WebCamera {
    /// Open and start streaming device `cfg.index`, asking for the closest
    /// format to the configured resolution.  Failure here is fatal: there is
    /// nothing to type on without frames.
    pub fn open(cfg: &CameraConfig) -> Result<Self> {
        let wanted = CameraFormat::new(
            Resolution::new(cfg.width, cfg.height),
            FrameFormat::MJPEG,
            30,
        );
        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(wanted));

        let mut camera = Camera::new(CameraIndex::Index(cfg.index), format)
            .with_context(|| format!("could not open camera {}", cfg.index))?;
        camera.open_stream()
            .with_context(|| format!("could not start streaming from camera {}", cfg.index))?;

        let res = camera.resolution();
        tracing::info!(index = cfg.index, width = res.width(), height = res.height(), "camera opened");
        Ok(WebCamera { camera })
    }
}

impl FrameSource for WebCamera {
    fn read(&mut self) -> Result<Frame> {
        let buffer = self.camera.frame().context("failed to capture frame from camera")?;
        let image = buffer.decode_image::<RgbFormat>().context("failed to decode camera frame")?;
        let (width, height) = image.dimensions();
        Ok(Frame::from_rgb(width, height, image.as_raw()))
    }
}

impl Drop for WebCamera {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}
