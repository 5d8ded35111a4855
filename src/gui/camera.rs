use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_STEP: f32 = 1.2;

// This camera is a close cousin of ArcBall: click-and-drag adjusts pitch
// and yaw, scrolling zooms in and out. Unlike ArcBall it chases a moving
// point — each frame it is handed the tracked planet's world position, and
// its look-at point eases toward that target by a fixed damping factor, so
// fast planet motion doesn't jerk the view around.
pub struct TrackingCamera {
    // -- look-at point --
    focus: Point3<f32>,
    target: Point3<f32>,
    // -- position relative to focus --
    theta: f32,  // azimuthal angle
    phi: f32,    // polar angle
    radius: f32, // distance from focus
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    theta_step: f32,
    phi_step: f32,
    scroll_ratio: f32,
    phi_limit: f32,
    radius_limits: (f32, f32),
    tracking_rate: f32,
}

impl TrackingCamera {
    pub fn new(radius: f32) -> Self {
        TrackingCamera {
            focus: Point3::origin(),
            target: Point3::origin(),
            theta: 0.0,
            phi: PI / 3.0,
            radius,
            width: 800,
            height: 600,
            fovy: PI / 4.0,
            znear: 0.1,
            zfar: 1024.0,
            last_cursor_pos: Vector2::zeros(),
            theta_step: 0.005,
            phi_step: 0.005,
            scroll_ratio: 1.5,
            phi_limit: 0.001,
            radius_limits: (2.0, 120.0),
            tracking_rate: 0.15,
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, self.znear, self.zfar)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    /// Point the camera at something new. Takes effect gradually; see
    /// [`Self::update_tick`].
    pub fn set_target(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// One damping step: the look-at point closes a fixed fraction of the
    /// remaining gap to the target. Call once per frame, before rendering.
    pub fn update_tick(&mut self) {
        self.focus += (self.target - self.focus) * self.tracking_rate;
    }

    /// New framebuffer dimensions. Idempotent; only the aspect ratio and
    /// reported viewport change.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn focus(&self) -> Point3<f32> {
        self.focus
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.theta = (self.theta + dtheta) % (2.0 * PI);
        self.phi = nalgebra::clamp(self.phi + dphi, self.phi_limit, PI - self.phi_limit);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = nalgebra::clamp(
            self.radius * factor,
            self.radius_limits.0,
            self.radius_limits.1,
        );
    }
}

impl Camera for TrackingCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Rotate the opposite direction as the mouse moves (drag right == camera glides
                    // left)
                    let dpos = curr_pos - self.last_cursor_pos;
                    self.rotate(-dpos.x * self.theta_step, -dpos.y * self.phi_step);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.set_dimensions(w, h);
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                self.rotate(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                self.rotate(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                self.rotate(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                self.rotate(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_STEP),
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        // Spherical offset around the focus, y-up.
        self.focus
            + Vector3::new(
                self.radius * self.theta.cos() * self.phi.sin(),
                self.radius * self.phi.cos(),
                self.radius * self.theta.sin() * self.phi.sin(),
            )
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &self.focus, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation().try_inverse().unwrap()
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_only_touches_dimensions() {
        let mut camera = TrackingCamera::new(30.0);
        let eye_before = camera.eye();

        camera.set_dimensions(1920, 1080);
        camera.set_dimensions(1920, 1080);

        assert_eq!(camera.dimensions(), (1920, 1080));
        approx::assert_relative_eq!(camera.aspect(), 1920.0 / 1080.0);
        assert_eq!(camera.eye(), eye_before);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = TrackingCamera::new(30.0);
        for _ in 0..100 {
            camera.zoom(10.0);
        }
        assert_eq!(camera.distance(), 120.0);
        for _ in 0..100 {
            camera.zoom(0.1);
        }
        assert_eq!(camera.distance(), 2.0);
    }

    #[test]
    fn test_focus_converges_to_target() {
        let mut camera = TrackingCamera::new(30.0);
        let target = Point3::new(11.0, 0.0, -4.0);
        camera.set_target(target);

        let gap_before = (camera.focus() - target).norm();
        camera.update_tick();
        let gap_after = (camera.focus() - target).norm();
        assert!(gap_after < gap_before);

        for _ in 0..500 {
            camera.update_tick();
        }
        approx::assert_abs_diff_eq!(camera.focus(), target, epsilon = 1e-3);
    }
}
