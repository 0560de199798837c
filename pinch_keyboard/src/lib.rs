//! # pinch_keyboard
//!
//! Webcam virtual keyboard.  A QWERTY grid is drawn over the camera feed;
//! hover the index fingertip over a key and touch it to the thumb to type.
//! The gesture logic lives in [`pinch_core`]; this crate supplies frames,
//! hands, a window and (optionally) real keystrokes.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Index tip over a key | Key highlighted green |
//! | Thumb touches index tip over a key | Key typed once |
//! | Touch held | Nothing more until released |
//! | Touch again within `key_press_delay` | Ignored |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse pointer is the index tip.
//! * `camera` — **Camera mode**: webcam frames via `nokhwa`, hands from an
//!   external landmark process (see [`detector::SubprocessDetector`]).
//!
//! ### Simulation controls
//!
//! | Input | Gesture |
//! |---|---|
//! | Move mouse | Move index fingertip |
//! | Left button / `Space` held | Thumb touches index |
//! | `Q` / `Escape` | Quit |

pub mod app;
#[cfg(feature = "camera")]
pub mod camera;
pub mod canvas;
pub mod detector;
pub mod frame;
pub mod inject;
pub mod overlay;
pub mod visualizer;
