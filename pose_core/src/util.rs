pub const MILLIS_PER_SEC: u64 = 1000;

/// Milliseconds between applied stepper ticks, at least 1.
#[inline]
pub fn tick_interval_ms(tick_hz: u32) -> u64 {
    (MILLIS_PER_SEC / u64::from(tick_hz.max(1))).max(1)
}

#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * (std::f32::consts::PI / 180.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn clamp_i32(v: i32, min: i32, max: i32) -> i32 {
    v.max(min).min(max)
}
