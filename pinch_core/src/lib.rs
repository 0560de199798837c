//! # pinch_core
//!
//! The decision logic behind a webcam keyboard: hover an index fingertip
//! over an on-screen key and touch it to the thumb to type.
//!
//! Hand tracking, cameras and windows live elsewhere.  This crate only sees
//! landmark coordinates in frame pixels, one batch of hands per frame:
//!
//! ```text
//!   hands ──► GestureDetector ──► TouchReading ─┐
//!     │                                         ├─► KeyPressController ──► TypedText
//!     └─────► Keyboard::hit_test ──► Key ───────┘            │
//!                                                            └──► KeyInjector
//! ```
//!
//! ## Rules
//!
//! | Condition | Result |
//! |---|---|
//! | thumb–index distance `<` threshold | touching |
//! | distance `==` threshold | not touching |
//! | no hand in frame | not touching, nothing typed |
//! | touch begins over a key, delay elapsed | key typed once |
//! | touch held across frames | nothing more |
//! | touch begins within `key_press_delay` of last press | suppressed |

pub mod config;
pub mod controller;
pub mod error;
pub mod gesture;
pub mod inject;
pub mod landmark;
pub mod layout;
pub mod session;
pub mod text;

pub use config::Config;
pub use controller::{KeyPress, KeyPressController, PressState};
pub use error::{Error, Result};
pub use gesture::{GestureDetector, TouchEdge, TouchReading};
pub use inject::{KeyInjector, NullInjector};
pub use landmark::{Hand, HandLandmark, Point, LANDMARK_COUNT};
pub use layout::{Key, KeyAction, KeyGeometry, Keyboard, Rect};
pub use session::{FrameReport, Session};
pub use text::TypedText;
