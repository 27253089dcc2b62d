use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye position in world space, w = exponential fog density.
    pub eye_fog: [f32; 4],
}

/// Third-person chase camera looking down the travel axis. `radius` is the
/// pull-back distance behind the target; the win sequence tweens it out to
/// reveal the planet.
pub struct FollowCamera {
    pub target: Vec3,
    pub radius: f32,
    pub height: f32,
    pub fov_y_deg: f32,
    pub fog_density: f32,
    pub viewport: (u32, u32),
}

impl FollowCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            target: Vec3::new(0.0, 0.0, 15.0),
            radius: 10.0,
            height: 1.5,
            fov_y_deg: 55.0,
            fog_density: 0.03,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(self.target.x, self.height, -self.radius)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let aspect = self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32;
        let proj = Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, 0.1, 500.0);
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let eye = self.eye();

        CameraUniform {
            view_proj: (proj * view).to_cols_array_2d(),
            eye_fog: [eye.x, eye.y, eye.z, self.fog_density],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_sits_behind_target_along_travel_axis() {
        let camera = FollowCamera::new(1280, 720);
        let eye = camera.eye();
        assert!(eye.z < camera.target.z);
        assert_eq!(eye.y, camera.height);
    }

    #[test]
    fn uniform_carries_fog_density_in_w() {
        let camera = FollowCamera::new(1280, 720);
        let uniform = camera.build_uniform();
        assert!((uniform.eye_fog[3] - 0.03).abs() < 1e-6);
    }

    #[test]
    fn zero_viewport_does_not_produce_nan() {
        let mut camera = FollowCamera::new(0, 0);
        camera.viewport = (0, 0);
        let uniform = camera.build_uniform();
        for row in uniform.view_proj {
            for v in row {
                assert!(v.is_finite());
            }
        }
    }
}
