use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::resource::Mesh;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};
use rand::Rng;
use tracing::debug;

use super::camera::TrackingCamera;
use crate::model::catalog::{MESH_SCALE, RING_SEGMENTS};
use crate::model::rock::generate_rock;
use crate::model::system::ring_points;
use crate::model::{BodyID, PivotID, System};

const CAMERA_START_DISTANCE: f32 = 30.0;

/// A static polyline kept in world space. Computed once, redrawn verbatim
/// every frame.
struct Path {
    nodes: Vec<Point3<f32>>,
    color: Point3<f32>,
}

/// Everything the renderer sees: the scene nodes mirroring the model, the
/// orbit-path rings, and the camera. One pivot group node per revolution
/// axis, with the body meshes parented underneath at their local offsets.
pub struct View {
    system: System,
    pivot_nodes: Vec<SceneNode>,
    body_meshes: HashMap<BodyID, SceneNode>,
    rings: Vec<Path>,
    camera: TrackingCamera,
}

impl View {
    pub fn new<R: Rng>(system: System, window: &mut Window, rng: &mut R) -> Self {
        // One group node per pivot, already rotated to its starting phase.
        let mut pivot_nodes: Vec<SceneNode> = vec![];
        for i in 0..system.num_pivots() {
            let mut group = window.add_group();
            group.set_local_rotation(pivot_rotation(system.pivot_angle(PivotID(i))));
            pivot_nodes.push(group);
        }

        let mut body_meshes = HashMap::new();
        let mut rings = vec![];
        for body in system.bodies() {
            let parent = &mut pivot_nodes[body.pivot.0];
            let mut node = if body.decorative {
                let rock = generate_rock(body.descriptor.radius * MESH_SCALE, rng);
                let mesh = Mesh::new(rock.coords, rock.faces, Some(rock.normals), None, false);
                parent.add_mesh(Rc::new(RefCell::new(mesh)), Vector3::repeat(1.0))
            } else {
                parent.add_sphere(body.descriptor.radius * MESH_SCALE)
            };

            // kiss3d has a single built-in lit material, so "emissive" means
            // painting with the glow color and letting the scene light wash it.
            let color = body.descriptor.emissive.unwrap_or(body.descriptor.color);
            node.set_color(color.x, color.y, color.z);
            node.set_local_translation(Translation3::new(body.local_offset as f32, 0.0, 0.0));
            body_meshes.insert(body.id, node);

            // Orbit paths are drawn unparented: the ring must not revolve
            // along with the pivot it illustrates.
            if body.descriptor.orbital_distance > 0.0 {
                let nodes = ring_points(body.descriptor.orbital_distance, RING_SEGMENTS)
                    .into_iter()
                    .map(|p| nalgebra::convert(p))
                    .collect();
                rings.push(Path {
                    nodes,
                    color: Point3::from(body.descriptor.color.coords * 0.5),
                });
            }

            debug!(name = %body.descriptor.name, decorative = body.decorative, "added body");
        }

        View {
            system,
            pivot_nodes,
            body_meshes,
            rings,
            camera: TrackingCamera::new(CAMERA_START_DISTANCE),
        }
    }

    /// One animation tick: advance the model, mirror its angles into the
    /// scene graph, and chase the planet with the camera.
    pub fn advance(&mut self, delta_seconds: f64) {
        self.system.advance(delta_seconds);

        // Each distinct pivot node is written exactly once, no matter how
        // many bodies hang off it.
        for (i, node) in self.pivot_nodes.iter_mut().enumerate() {
            node.set_local_rotation(pivot_rotation(self.system.pivot_angle(PivotID(i))));
        }
        for (id, node) in self.body_meshes.iter_mut() {
            let spin = self.system.get_body(*id).spin_angle;
            node.set_local_rotation(pivot_rotation(spin));
        }

        self.camera
            .set_target(nalgebra::convert(self.system.tracked_position()));
        self.camera.update_tick();
    }

    /// Immediate-mode drawing that has to happen before the render call.
    pub fn prerender(&self, window: &mut Window) {
        for path in self.rings.iter() {
            draw_path_raw(window, path.nodes.iter().copied(), &path.color);
        }
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, None, None)
    }
}

fn pivot_rotation(angle: f64) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle as f32)
}

fn draw_path_raw<I: Iterator<Item = Point3<f32>>>(
    window: &mut Window,
    points: I,
    color: &Point3<f32>,
) {
    let mut prev_pt = None;
    for pt in points {
        if let Some(prev_pt) = prev_pt {
            window.draw_line(&prev_pt, &pt, color);
        }
        prev_pt = Some(pt);
    }
}
