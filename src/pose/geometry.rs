//! Joint angle calculation using the dot product
//!
//! Computes the angle at a joint (the vertex `b`) formed by the two limb
//! segments b→a and b→c. Uses cos(θ) = (v1 · v2) / (|v1| × |v2|) with the
//! cosine argument clamped to [-1, 1] and a small epsilon added to the
//! magnitude product, so floating-point drift and degenerate input produce a
//! finite angle instead of NaN.

use crate::pose::Keypoint;

/// Guards the division when a limb segment collapses to a point.
const EPSILON: f32 = 1e-8;

/// Angle in degrees at vertex `b` formed by points a-b-c
///
/// # Returns
/// Angle in [0, 180]:
/// - ~180° when a, b, c are collinear with a and c on opposite sides
/// - ~90° for perpendicular segments
/// - ~0° when a and c lie on the same side of b
pub fn joint_angle(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> f32 {
    let v1 = (a.x - b.x, a.y - b.y);
    let v2 = (c.x - b.x, c.y - b.y);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    let cos_angle = (dot / (mag1 * mag2 + EPSILON)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}
