use nalgebra::Point3;

/// All angular speeds get multiplied by this before use. It's an arbitrary
/// visual-tuning constant carried over from the reference scene; don't read
/// physical meaning into it.
pub const SPEED_MULTIPLIER: f64 = 5.0;

/// Uniform scale applied to every body's radius when its mesh is built.
pub const MESH_SCALE: f32 = 0.8;

/// Number of segments in an orbit-path ring.
pub const RING_SEGMENTS: usize = 64;

/// How far beyond the tracked planet's own distance the companion rock sits.
pub const COMPANION_OFFSET: f64 = 2.2;

/// The body the camera follows.
pub const TRACKED_BODY: &str = "Earth";

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyDescriptor {
    pub name: String,
    pub radius: f32,
    pub orbital_distance: f64,
    pub color: Point3<f32>,
    pub orbit_speed: f64,
    pub spin_speed: f64,
    /// Self-lit bodies (the sun) render with this color instead of being
    /// shaded by the scene light.
    pub emissive: Option<Point3<f32>>,
}

/// The fixed table the scene is built from. One entry per celestial body;
/// the companion rock is not in here, see [`companion`].
pub fn catalog() -> Vec<BodyDescriptor> {
    vec![
        BodyDescriptor {
            name: String::from("Sun"),
            radius: 5.0,
            orbital_distance: 0.0,
            color: Point3::new(0.98, 0.83, 0.25),
            orbit_speed: 0.0,
            spin_speed: 0.004,
            emissive: Some(Point3::new(1.0, 0.85, 0.3)),
        },
        BodyDescriptor {
            name: String::from("Earth"),
            radius: 1.2,
            orbital_distance: 11.0,
            color: Point3::new(0.18, 0.42, 0.83),
            orbit_speed: 0.018,
            spin_speed: 0.03,
            emissive: None,
        },
    ]
}

/// Descriptor for the decorative rock that rides along on the tracked
/// planet's pivot. Its own orbital distance is zero on purpose: revolution
/// comes entirely from the shared pivot, so the animation driver never
/// advances that pivot twice in one frame.
pub fn companion() -> BodyDescriptor {
    BodyDescriptor {
        name: String::from("Companion"),
        radius: 0.45,
        orbital_distance: 0.0,
        color: Point3::new(0.45, 0.42, 0.40),
        orbit_speed: 0.0,
        spin_speed: 0.08,
        emissive: None,
    }
}
