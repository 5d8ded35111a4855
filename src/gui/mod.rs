use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};
use rand::Rng;

use self::view::View;
use crate::model::System;

mod camera;
mod view;

pub use camera::TrackingCamera;

/// Ties the scene to kiss3d's refresh callback. `step` runs once per
/// display refresh until the window is closed.
pub struct Simulation {
    view: View,
    last_frame: Instant,
}

impl Simulation {
    pub fn new<R: Rng>(system: System, window: &mut Window, rng: &mut R) -> Self {
        Self {
            view: View::new(system, window, rng),
            last_frame: Instant::now(),
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        // Wall-clock delta since the previous frame; ~0 on the first one.
        let delta = self.last_frame.elapsed().as_secs_f64();
        self.last_frame = Instant::now();

        self.view.advance(delta);
        self.view.prerender(window);
    }
}
