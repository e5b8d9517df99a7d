use crate::buffer::UniformValue;
use crate::coords::{Vec3, Viewport};

/// Point projected into centered screen space.
///
/// `depth` is the signed depth ratio: `0` on the camera plane, `1` at the
/// reference distance, growing with true depth.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Eye position and orientation.
///
/// Invariants:
/// - `forward` and `upward` are unit length and orthogonal
/// - `scale >= MIN_SCALE`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub upward: Vec3,
    pub scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 600.0),
            forward: Vec3::new(0.0, 0.0, -1.0),
            upward: Vec3::new(0.0, 1.0, 0.0),
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Cone-back factor `s`.
    pub const CONE_BACK_SCALE: f32 = 0.5;

    /// Reference distance along `forward` where the depth ratio is `1`.
    pub const LOOK_DISTANCE: f32 = 600.0;

    /// Zoom floor; keeps the projection away from its singularity.
    pub const MIN_SCALE: f32 = 0.1;

    /// Angle per input unit for rotations, before dividing by `scale`.
    const ROTATE_STEP: f32 = 0.1;

    /// `cross(upward, forward)`.
    ///
    /// For the default camera this is world `-X`, which is why screen `x`
    /// negates its dot product.
    #[inline]
    pub fn rightward(&self) -> Vec3 {
        self.upward.cross(self.forward)
    }

    /// Screen scale at depth ratio `depth`.
    #[inline]
    pub fn screen_scale(depth: f32) -> f32 {
        let s = Self::CONE_BACK_SCALE;
        (s + 1.0) / (depth + s)
    }

    /// Projects a world point to centered screen space.
    pub fn transform(&self, point: Vec3) -> Projected {
        let v = point - self.position;
        let look = self.forward * Self::LOOK_DISTANCE;
        let r = v.dot(look) / look.length_squared();
        let screen_scale = Self::screen_scale(r);

        let y = v.dot(self.upward) * screen_scale;
        let x = -v.dot(self.rightward()) * screen_scale;

        Projected {
            x: x * self.scale,
            y: y * self.scale,
            depth: r * self.scale,
        }
    }

    /// Moves along camera-local axes: `dx` screen-right, `dy` up, `dz` toward
    /// the viewer. Distances shrink as the camera zooms in.
    pub fn move_by(&mut self, dx: f32, dy: f32, dz: f32) {
        let dv = self.rightward() * -dx + self.upward * dy + self.forward * -dz;
        self.position = self.position + dv * (1.0 / self.scale);
    }

    /// Turns the view: `yaw` around `upward`, `pitch` around the right axis.
    pub fn rotate_by(&mut self, yaw: f32, pitch: f32) {
        if yaw != 0.0 {
            let a = yaw * Self::ROTATE_STEP / self.scale;
            let right = self.rightward();
            self.forward = (self.forward * a.cos() + right * a.sin()).normalized();
        }

        if pitch != 0.0 {
            let a = pitch * Self::ROTATE_STEP / self.scale;
            let (forward, upward) = (self.forward, self.upward);
            self.forward = (forward * a.cos() + upward * a.sin()).normalized();
            self.upward = (upward * a.cos() - forward * a.sin()).normalized();
        }
    }

    /// Rolls `upward` around `forward`.
    pub fn spin_by(&mut self, roll: f32) {
        if roll == 0.0 {
            return;
        }
        let a = roll * Self::ROTATE_STEP / self.scale;
        let right = self.rightward();
        self.upward = (self.upward * a.cos() + right * a.sin()).normalized();
    }

    /// Multiplies `scale` by `1 + delta`.
    ///
    /// A change that would land below [`MIN_SCALE`](Self::MIN_SCALE) is
    /// dropped entirely; the scale is not clamped to the floor.
    pub fn change_scale_by(&mut self, delta: f32) {
        let next = self.scale * (1.0 + delta);
        if next >= Self::MIN_SCALE {
            self.scale = next;
        }
    }

    /// World displacement that appears as `(dx, dy)` on screen for a point
    /// whose projected depth is `depth` (as returned by [`transform`](Self::transform)).
    /// Used to drag objects with the pointer.
    pub fn screen_delta_to_world(&self, dx: f32, dy: f32, depth: f32) -> Vec3 {
        let k = Self::screen_scale(depth / self.scale) * self.scale;
        if k == 0.0 || !k.is_finite() {
            return Vec3::zero();
        }
        (self.rightward() * -dx + self.upward * dy) * (1.0 / k)
    }

    /// Camera block for the uniform buffer, in declaration order:
    /// cone-back factor, viewport ratio, reference distance, scale, then the
    /// forward, upward, rightward and position vectors.
    pub fn uniform_values(&self, viewport: Viewport) -> [UniformValue; 8] {
        [
            UniformValue::Scalar(Self::CONE_BACK_SCALE),
            UniformValue::Scalar(viewport.ratio()),
            UniformValue::Scalar(Self::LOOK_DISTANCE),
            UniformValue::Scalar(self.scale),
            UniformValue::Vec3(self.forward.to_array()),
            UniformValue::Vec3(self.upward.to_array()),
            UniformValue::Vec3(self.rightward().to_array()),
            UniformValue::Vec3(self.position.to_array()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn on_axis_point_stays_centered() {
        let cam = Camera::default();
        let p = cam.transform(Vec3::zero());
        assert!(close(p.x, 0.0));
        assert!(close(p.y, 0.0));
        assert!(close(p.depth, 1.0));
    }

    #[test]
    fn reference_plane_has_unit_screen_scale() {
        let cam = Camera::default();
        let p = cam.transform(Vec3::new(100.0, 50.0, 0.0));
        assert!(close(p.x, 100.0));
        assert!(close(p.y, 50.0));
    }

    #[test]
    fn farther_points_shrink() {
        let cam = Camera::default();
        let near = cam.transform(Vec3::new(100.0, 0.0, 0.0));
        let far = cam.transform(Vec3::new(100.0, 0.0, -600.0));
        assert!(far.depth > near.depth);
        assert!(far.x < near.x);
        // r = 2 → (0.5 + 1) / (2 + 0.5)
        assert!(close(far.x, 100.0 * 1.5 / 2.5));
    }

    #[test]
    fn scale_multiplies_all_axes() {
        let mut cam = Camera::default();
        cam.scale = 2.0;
        let p = cam.transform(Vec3::new(10.0, 20.0, 0.0));
        assert!(close(p.x, 20.0));
        assert!(close(p.y, 40.0));
        assert!(close(p.depth, 2.0));
    }

    #[test]
    fn scale_never_drops_below_floor() {
        let mut cam = Camera::default();
        for _ in 0..20 {
            cam.change_scale_by(-0.5);
            assert!(cam.scale >= Camera::MIN_SCALE);
        }
        let settled = cam.scale;
        cam.change_scale_by(-0.5);
        assert_eq!(cam.scale, settled);
        assert!(close(settled, 0.125));
    }

    #[test]
    fn scale_grows_with_positive_delta() {
        let mut cam = Camera::default();
        cam.change_scale_by(0.5);
        assert!(close(cam.scale, 1.5));
    }

    #[test]
    fn rotations_keep_basis_orthonormal() {
        let mut cam = Camera::default();
        for i in 0..50 {
            cam.rotate_by(0.3, -0.2 * (i % 3) as f32);
            cam.spin_by(0.1);
        }
        assert!(close(cam.forward.length(), 1.0));
        assert!(close(cam.upward.length(), 1.0));
        assert!(cam.forward.dot(cam.upward).abs() < 1e-3);
    }

    #[test]
    fn move_right_shifts_scene_left() {
        let mut cam = Camera::default();
        let before = cam.transform(Vec3::zero());
        cam.move_by(10.0, 0.0, 0.0);
        let after = cam.transform(Vec3::zero());
        assert!(after.x < before.x);
        assert!(close(cam.position.x, 10.0));
    }

    #[test]
    fn move_is_divided_by_scale() {
        let mut cam = Camera::default();
        cam.scale = 2.0;
        cam.move_by(0.0, 10.0, 0.0);
        assert!(close(cam.position.y, 5.0));
    }

    #[test]
    fn move_toward_viewer_backs_away() {
        let mut cam = Camera::default();
        cam.move_by(0.0, 0.0, 100.0);
        assert!(close(cam.position.z, 700.0));
    }

    #[test]
    fn drag_delta_inverts_projection() {
        let cam = Camera::default();
        let origin = Vec3::new(0.0, 0.0, -600.0);
        let p0 = cam.transform(origin);
        let dv = cam.screen_delta_to_world(12.0, -7.0, p0.depth);
        let p1 = cam.transform(origin + dv);
        assert!(close(p1.x - p0.x, 12.0));
        assert!(close(p1.y - p0.y, -7.0));
    }

    #[test]
    fn drag_delta_accounts_for_zoom() {
        let mut cam = Camera::default();
        cam.change_scale_by(1.5);
        let origin = Vec3::new(30.0, -20.0, -300.0);
        let p0 = cam.transform(origin);
        let dv = cam.screen_delta_to_world(-5.0, 9.0, p0.depth);
        let p1 = cam.transform(origin + dv);
        assert!(close(p1.x - p0.x, -5.0));
        assert!(close(p1.y - p0.y, 9.0));
    }

    #[test]
    fn uniform_block_leads_with_scalars() {
        let vals = Camera::default().uniform_values(Viewport::new(800.0, 400.0));
        assert_eq!(vals[1], UniformValue::Scalar(2.0));
        assert_eq!(vals[6], UniformValue::Vec3([-1.0, 0.0, 0.0]));
    }
}
