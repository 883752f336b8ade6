use glam::{Quat, Vec3};
use std::f32::consts::TAU;

/// Positions handed to the render surface each tick.
///
/// Holds the live positions plus idle float, and the accumulated spin of
/// the whole cloud. The surface treats the positions as read-only and
/// valid until the next tick; `needs_upload` tells it whether anything
/// changed since it last copied them out.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    positions: Vec<Vec3>,
    rotation_y: f32,
    needs_upload: bool,
}

impl FrameBuffer {
    pub fn with_len(len: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; len],
            rotation_y: 0.0,
            needs_upload: true,
        }
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub(crate) fn positions_mut(&mut self) -> &mut Vec<Vec3> {
        &mut self.positions
    }

    /// Spin of the cloud about the vertical axis, in `[0, 2π)`.
    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Model rotation to apply to every position.
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation_y)
    }

    pub(crate) fn rotate_by(&mut self, radians: f32) {
        self.rotation_y = (self.rotation_y + radians).rem_euclid(TAU);
    }

    #[inline]
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.needs_upload = true;
    }

    /// Called by the render surface once it has copied the positions.
    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }
}
