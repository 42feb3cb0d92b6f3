//! Input helpers
//!
//! The simulation never reads devices. Platform code turns keyboard state and
//! pointer drags into a thrust axis and, before launch, a one-shot
//! `LaunchGesture`; both land in `TickInput`.

use glam::Vec2;

/// Drags shorter than this leave the virtual joystick centred
pub const JOYSTICK_DEAD_ZONE_PX: f32 = 18.0;

/// Clamp both components into [-1, 1]
pub fn clamp_axis(axis: Vec2) -> Vec2 {
    axis.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Keyboard axis from held directions. Screen space: up is -y.
pub fn keyboard_axis(left: bool, right: bool, up: bool, down: bool) -> Vec2 {
    let x = (right as i32 - left as i32) as f32;
    let y = (down as i32 - up as i32) as f32;
    Vec2::new(x, y)
}

/// Virtual joystick: unit direction from drag start to current point
pub fn virtual_joystick_axis(start: Vec2, current: Vec2) -> Vec2 {
    let delta = current - start;
    let dist = delta.length();
    if dist < JOYSTICK_DEAD_ZONE_PX {
        return Vec2::ZERO;
    }
    delta / dist
}

/// Pointer drag as seen by the platform layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub dragging: bool,
    pub start: Vec2,
    pub current: Vec2,
}

/// Keyboard wins whenever any key is held; the joystick only steers a
/// launched craft while a drag is active.
pub fn combine_thrust(keyboard: Vec2, drag: &DragState, launched: bool) -> Vec2 {
    if keyboard != Vec2::ZERO {
        return clamp_axis(keyboard);
    }
    if !launched || !drag.dragging {
        return Vec2::ZERO;
    }
    virtual_joystick_axis(drag.start, drag.current)
}

/// Released slingshot pull, in one coordinate space (usually screen)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchGesture {
    /// Slingshot anchor
    pub anchor: Vec2,
    /// Pointer position at release
    pub release: Vec2,
}

impl LaunchGesture {
    /// Pull vector; the craft flies along it
    pub fn pull(&self) -> Vec2 {
        self.anchor - self.release
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Thrust axis in [-1, 1]^2
    pub thrust: Vec2,
    /// Release edge of a launch drag; consumed by the tick that sees it
    pub launch: Option<LaunchGesture>,
}
