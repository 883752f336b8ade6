//! Stochastic point-cloud synthesis for every [`ShapeKind`].
//!
//! Each call draws fresh, independent samples from the shape's
//! distribution. Two buffers generated for the same shape agree in
//! structure, never in exact coordinates.

use crate::shape::ShapeKind;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

pub const SPHERE_RADIUS: f32 = 2.0;

pub const HEART_SCALE: f32 = 0.15;
/// Half of the heart's extrusion depth before scaling.
pub const HEART_HALF_DEPTH: f32 = 2.5;

pub const FLOWER_PETALS: f32 = 5.0;
pub const FLOWER_SCALE: f32 = 0.8;

pub const SATURN_RING_PROBABILITY: f64 = 0.6;
pub const SATURN_RING_INNER: f32 = 3.0;
pub const SATURN_RING_OUTER: f32 = 4.5;
pub const SATURN_RING_HALF_THICKNESS: f32 = 0.05;
pub const SATURN_BODY_SCALE: f32 = 0.7;

pub const MEDITATOR_LEGS_RADIUS: f32 = 1.5;
pub const MEDITATOR_LEGS_BOTTOM: f32 = -1.5;
pub const MEDITATOR_LEGS_TOP: f32 = -1.0;
pub const MEDITATOR_TORSO_SCALE: f32 = 0.6;
pub const MEDITATOR_TORSO_CENTER: Vec3 = Vec3::new(0.0, -0.2, 0.0);
pub const MEDITATOR_HEAD_SCALE: f32 = 0.35;
pub const MEDITATOR_HEAD_CENTER: Vec3 = Vec3::new(0.0, 0.9, 0.0);

/// Generates `count` target positions for `kind`.
///
/// Every entry is an independent sample; nothing is carried over from a
/// previous buffer. Returns an empty buffer for `count == 0`.
pub fn generate(kind: ShapeKind, count: usize, rng: &mut impl Rng) -> Vec<Vec3> {
    (0..count).map(|_| sample(kind, rng)).collect()
}

/// Draws a single point from the distribution of `kind`.
pub fn sample(kind: ShapeKind, rng: &mut impl Rng) -> Vec3 {
    match kind {
        ShapeKind::Sphere => sphere_point(rng),
        ShapeKind::Heart => heart_point(rng),
        ShapeKind::Flower => flower_point(rng),
        ShapeKind::Saturn => saturn_point(rng),
        ShapeKind::Meditator => meditator_point(rng),
        // Detonation is an animation concern, see `morph::scaled_target`.
        ShapeKind::Fireworks => sphere_point(rng),
    }
}

/// Maps an azimuth `theta` and a uniform draw `u` onto the radius-2 sphere.
///
/// The polar angle is `acos(2u - 1)`, which spreads points evenly over the
/// surface instead of bunching them at the poles.
#[inline]
pub fn sphere_point_from(theta: f32, u: f32) -> Vec3 {
    let phi = (2.0 * u - 1.0).clamp(-1.0, 1.0).acos();
    SPHERE_RADIUS * Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Uniform point on the surface of the radius-2 sphere.
pub fn sphere_point(rng: &mut impl Rng) -> Vec3 {
    let theta = rng.random_range(0.0..TAU);
    let u = rng.random::<f32>();
    sphere_point_from(theta, u)
}

/// Point on the classic parametric heart curve, extruded along z.
pub fn heart_point(rng: &mut impl Rng) -> Vec3 {
    let t = rng.random_range(0.0..TAU);
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    let z = rng.random_range(-HEART_HALF_DEPTH..HEART_HALF_DEPTH);
    Vec3::new(x, y, z) * HEART_SCALE
}

/// Point on a sphere-like surface whose radius carries a 5-fold petal ripple.
pub fn flower_point(rng: &mut impl Rng) -> Vec3 {
    let u = rng.random_range(0.0..TAU);
    let v = rng.random_range(0.0..PI);
    let r = 2.0 + (FLOWER_PETALS * u).sin() * (FLOWER_PETALS * v).sin();
    Vec3::new(r * v.sin() * u.cos(), r * v.sin() * u.sin(), r * v.cos()) * FLOWER_SCALE
}

/// Ring point with probability 0.6, otherwise a point on the planet body.
pub fn saturn_point(rng: &mut impl Rng) -> Vec3 {
    if rng.random_bool(SATURN_RING_PROBABILITY) {
        let angle = rng.random_range(0.0..TAU);
        let dist = rng.random_range(SATURN_RING_INNER..SATURN_RING_OUTER);
        let lift = rng.random_range(-SATURN_RING_HALF_THICKNESS..SATURN_RING_HALF_THICKNESS);
        Vec3::new(angle.cos() * dist, lift, angle.sin() * dist)
    } else {
        sphere_point(rng) * SATURN_BODY_SCALE
    }
}

/// Seated figure: crossed legs (40%), torso (30%) and head (30%).
pub fn meditator_point(rng: &mut impl Rng) -> Vec3 {
    let region = rng.random::<f32>();
    if region < 0.4 {
        let theta = rng.random_range(0.0..TAU);
        // sqrt keeps the disk evenly covered instead of crowding the centre.
        let radial = MEDITATOR_LEGS_RADIUS * rng.random::<f32>().sqrt();
        let height = rng.random_range(MEDITATOR_LEGS_BOTTOM..MEDITATOR_LEGS_TOP);
        Vec3::new(radial * theta.cos(), height, radial * theta.sin())
    } else if region < 0.7 {
        sphere_point(rng) * MEDITATOR_TORSO_SCALE + MEDITATOR_TORSO_CENTER
    } else {
        sphere_point(rng) * MEDITATOR_HEAD_SCALE + MEDITATOR_HEAD_CENTER
    }
}
