//! Orbiting perspective camera for the point cloud.

use glam::{Mat4, Vec3, Vec4Swizzles};
use std::f32::consts::TAU;

/// Seconds per revolution while the camera drifts on its own.
pub const AUTO_ORBIT_PERIOD: f32 = 120.0;

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 30.0;
const MAX_PITCH: f32 = 1.5;

/// Camera circling the origin.
///
/// - `yaw` / `pitch` - orbit angles in radians; yaw 0 looks down -z.
/// - `distance` - eye distance from the origin.
/// - `fov_y` - vertical field of view in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 6.0,
            fov_y: 60f32.to_radians(),
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        self.distance
            * Vec3::new(
                self.pitch.cos() * self.yaw.sin(),
                self.pitch.sin(),
                self.pitch.cos() * self.yaw.cos(),
            )
    }

    /// Combined projection and view matrix for a viewport of `aspect`.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect.max(f32::EPSILON), NEAR, FAR);
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        proj * view
    }

    /// Projects a world-space point into `rect`.
    ///
    /// ### Returns
    /// The screen position and the view-space depth, or `None` for points
    /// behind the near plane.
    pub fn project(&self, view_proj: &Mat4, p: Vec3, rect: egui::Rect) -> Option<(egui::Pos2, f32)> {
        let clip = *view_proj * p.extend(1.0);
        if clip.w <= NEAR {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        let center = rect.center();
        let pos = egui::pos2(
            center.x + ndc.x * rect.width() * 0.5,
            center.y - ndc.y * rect.height() * 0.5,
        );
        Some((pos, clip.w))
    }

    /// On-screen radius in pixels of a point of world `size` at `depth`,
    /// shrinking with distance.
    pub fn point_radius(&self, size: f32, depth: f32, rect: egui::Rect) -> f32 {
        (size * rect.height() * 0.25 / depth.max(NEAR)).max(0.5)
    }

    /// Orbits by a screen-space drag.
    pub fn drag(&mut self, delta: egui::Vec2) {
        self.yaw = (self.yaw - delta.x * 0.01).rem_euclid(TAU);
        self.pitch = (self.pitch + delta.y * 0.01).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Dollies in for positive `scroll`, out for negative.
    pub fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 - scroll * 0.001).clamp(0.5, 2.0);
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Slow unattended drift around the cloud.
    pub fn auto_orbit(&mut self, dt: f32) {
        self.yaw = (self.yaw + dt * TAU / AUTO_ORBIT_PERIOD).rem_euclid(TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn origin_projects_to_rect_center() {
        let cam = OrbitCamera::default();
        let rect = test_rect();
        let vp = cam.view_proj(rect.aspect_ratio());
        let (pos, depth) = cam.project(&vp, Vec3::ZERO, rect).unwrap();
        assert!((pos - rect.center()).length() < 1e-3, "{pos:?}");
        assert!((depth - 6.0).abs() < 1e-4);
    }

    #[test]
    fn axes_land_on_expected_sides() {
        let cam = OrbitCamera::default();
        let rect = test_rect();
        let vp = cam.view_proj(rect.aspect_ratio());

        let (right, _) = cam.project(&vp, Vec3::X, rect).unwrap();
        let (up, _) = cam.project(&vp, Vec3::Y, rect).unwrap();
        assert!(right.x > rect.center().x);
        assert!(up.y < rect.center().y, "screen y grows downward");
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let cam = OrbitCamera::default();
        let rect = test_rect();
        let vp = cam.view_proj(rect.aspect_ratio());
        assert!(cam.project(&vp, Vec3::new(0.0, 0.0, 10.0), rect).is_none());
    }

    #[test]
    fn nearer_points_draw_larger() {
        let cam = OrbitCamera::default();
        let rect = test_rect();
        assert!(cam.point_radius(0.06, 3.0, rect) > cam.point_radius(0.06, 9.0, rect));
        assert_eq!(cam.point_radius(0.0, 1.0, rect), 0.5);
    }

    #[test]
    fn zoom_and_pitch_are_clamped() {
        let mut cam = OrbitCamera::default();
        for _ in 0..100 {
            cam.zoom(1000.0);
            cam.drag(egui::vec2(0.0, 500.0));
        }
        assert_eq!(cam.distance, MIN_DISTANCE);
        assert_eq!(cam.pitch, MAX_PITCH);

        for _ in 0..100 {
            cam.zoom(-1000.0);
        }
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn auto_orbit_completes_a_turn_per_period() {
        let mut cam = OrbitCamera::default();
        cam.auto_orbit(AUTO_ORBIT_PERIOD / 4.0);
        assert!((cam.yaw - TAU / 4.0).abs() < 1e-4);
    }
}
