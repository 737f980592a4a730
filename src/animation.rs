//! Time-based animation used by the demos.
//!
//! Every function here is a pure function of the elapsed time in seconds.
//! Nothing is integrated or accumulated between frames.

use std::f32::consts::TAU;

use cgmath::{Matrix4, Rad};
use instant::Instant;

/// Length of one [`tumble`] cycle in seconds.
pub const TUMBLE_PERIOD: f32 = 16.0;
const TUMBLE_PHASE: f32 = TUMBLE_PERIOD / 2.0;

/// Wall clock since the frame loop started, at millisecond resolution.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn seconds(&self) -> f32 {
        seconds_from_millis(self.start.elapsed().as_millis())
    }
}

pub fn seconds_from_millis(millis: u128) -> f32 {
    millis as f32 / 1000.0
}

/// Linear rotation: one radian per second.
pub fn spin(time: f32) -> Rad<f32> {
    Rad(time)
}

/// Two-stage rotation angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tumble {
    /// Rotation about the Y axis.
    pub horizontal: Rad<f32>,
    /// Rotation about the X axis.
    pub vertical: Rad<f32>,
}

impl Tumble {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_y(self.horizontal) * Matrix4::from_angle_x(self.vertical)
    }
}

/// First half of the cycle turns a full circle horizontally, the second half
/// keeps that turn and adds a full vertical circle.
pub fn tumble(time: f32) -> Tumble {
    let t = time.rem_euclid(TUMBLE_PERIOD);
    if t < TUMBLE_PHASE {
        Tumble {
            horizontal: Rad(t / TUMBLE_PHASE * TAU),
            vertical: Rad(0.0),
        }
    } else {
        Tumble {
            horizontal: Rad(TAU),
            vertical: Rad((t - TUMBLE_PHASE) / TUMBLE_PHASE * TAU),
        }
    }
}

/// Sinusoidal blend factor in `[0, 1]`.
pub fn morph_blend(time: f32) -> f32 {
    (time.sin() / 2.0 + 0.5).clamp(0.0, 1.0)
}

/// Weights for a two-target morph. They always sum to one.
pub fn morph_weights(time: f32) -> [f32; 2] {
    let w = morph_blend(time);
    [1.0 - w, w]
}
