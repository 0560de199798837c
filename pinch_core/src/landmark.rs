//! Hand landmarks as delivered by a hand-tracking model.
//!
//! Indices follow the 21-point MediaPipe hand model.  Coordinates are always
//! in frame pixels by the time they reach this crate; detectors that work in
//! normalised space scale with [`Hand::from_normalized`].

// ════════════════════════════════════════════════════════════════════════════
// Point
// ════════════════════════════════════════════════════════════════════════════

/// A 2D position in frame-pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Point { x, y } }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmark — the 21 named points
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// The five fingertips, thumb first.
    pub const FINGERTIPS: [HandLandmark; 5] = [
        HandLandmark::ThumbTip,
        HandLandmark::IndexTip,
        HandLandmark::MiddleTip,
        HandLandmark::RingTip,
        HandLandmark::PinkyTip,
    ];

    /// Wrist plus the base joint of every finger.
    pub const PALM: [HandLandmark; 6] = [
        HandLandmark::Wrist,
        HandLandmark::ThumbCmc,
        HandLandmark::IndexMcp,
        HandLandmark::MiddleMcp,
        HandLandmark::RingMcp,
        HandLandmark::PinkyMcp,
    ];

    pub fn index(self) -> usize { self as usize }

    /// Short display name used by the overlay.
    pub fn name(self) -> &'static str {
        match self {
            HandLandmark::ThumbTip  => "Thumb",
            HandLandmark::IndexTip  => "Index",
            HandLandmark::MiddleTip => "Middle",
            HandLandmark::RingTip   => "Ring",
            HandLandmark::PinkyTip  => "Pinky",
            HandLandmark::Wrist     => "Wrist",
            _                       => "Joint",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// One tracked hand in the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub landmarks:  [Point; LANDMARK_COUNT],
    /// "Left" / "Right" as reported by the detector, or empty if unknown.
    pub handedness: String,
    /// Detector confidence, 0.0–1.0.
    pub score:      f32,
}

impl Hand {
    pub fn new(landmarks: [Point; LANDMARK_COUNT]) -> Self {
        Hand { landmarks, handedness: String::new(), score: 1.0 }
    }

    /// Build a hand from 0..1 normalised coordinates, scaled to a frame of
    /// `width` × `height` pixels.
    pub fn from_normalized(normalized: [Point; LANDMARK_COUNT], width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Hand::new(normalized.map(|p| Point::new(p.x * w, p.y * h)))
    }

    pub fn landmark(&self, which: HandLandmark) -> Point {
        self.landmarks[which.index()]
    }

    pub fn thumb_tip(&self) -> Point { self.landmark(HandLandmark::ThumbTip) }
    pub fn index_tip(&self) -> Point { self.landmark(HandLandmark::IndexTip) }
}
