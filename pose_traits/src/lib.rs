pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Three-axis Euler orientation in radians, in the renderer's native units.
///
/// The engine's target model works in degrees; conversion happens at the
/// smoothing boundary, so `Rig` implementations only ever see radians.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Orientation {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Scene/asset provider: a set of named renderable parts with mutable
/// three-axis orientations.
///
/// Implementations must tolerate lookups of unknown part names by returning
/// `None` / `false` rather than panicking; the engine reports missing parts
/// and degrades.
pub trait Rig {
    /// All part names present in the loaded asset.
    fn part_names(&self) -> Vec<String>;

    /// Current orientation of a part, or `None` if the part is unknown.
    fn orientation(&self, part: &str) -> Option<Orientation>;

    /// Overwrite a part's orientation. Returns `false` for unknown parts.
    fn set_orientation(&mut self, part: &str, orientation: Orientation) -> bool;
}

/// Durable key-value storage for snapshots.
///
/// Missing or unreadable values surface as `None`, never as an error; the
/// engine treats corruption as absence.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// A slider-like UI control bound to one joint group's slider axis.
///
/// The engine reads `min`/`max` to clamp goals and keeps `value` as the
/// visible mirror of the stepped animator's per-tick position.
pub trait SliderControl {
    fn min(&self) -> i32;
    fn max(&self) -> i32;
    fn value(&self) -> i32;
    fn set_value(&mut self, value: i32);
}
