use std::f64::consts::PI;

use nalgebra::{Point3, Rotation3, Vector3};
use rand::Rng;
use thiserror::Error;

use super::catalog::{BodyDescriptor, COMPANION_OFFSET, SPEED_MULTIPLIER};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PivotID(pub usize);

/// A revolution axis. Bodies hang off a pivot at some offset along x, so
/// rotating the pivot about +y carries them around a circle.
#[derive(Debug, Clone)]
pub struct OrbitPivot {
    pub angle: f64,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub descriptor: BodyDescriptor,
    pub pivot: PivotID,
    /// Distance from the pivot's origin to the mesh, along the pivot's
    /// local x axis. Usually equal to the descriptor's orbital distance;
    /// the companion rock is the exception (shared pivot, extra offset).
    pub local_offset: f64,
    pub spin_angle: f64,
    pub decorative: bool,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("tracked body {0:?} is not in the catalog")]
    TrackedBodyMissing(String),
}

/// The whole animated scene, minus anything graphical: every body, every
/// pivot, and which body the camera follows. Built once at startup and
/// passed by reference to everything that needs it.
pub struct System {
    bodies: Vec<Body>,
    pivots: Vec<OrbitPivot>,
    tracked: BodyID,
}

impl System {
    /// Builds one body per catalog entry, plus the companion rock attached
    /// to the tracked planet's pivot. Each pivot starts at a random phase
    /// in `[0, 2π)` so the bodies don't all line up at t=0.
    ///
    /// Fails if `tracked_name` names nobody — a silent miss would leave
    /// the camera staring at nothing with no diagnostic.
    pub fn new<R: Rng>(
        catalog: &[BodyDescriptor],
        tracked_name: &str,
        companion: BodyDescriptor,
        rng: &mut R,
    ) -> Result<Self, BuildError> {
        let mut bodies = vec![];
        let mut pivots = vec![];

        for descriptor in catalog {
            let pivot = PivotID(pivots.len());
            pivots.push(OrbitPivot {
                angle: rng.gen_range(0.0..2.0 * PI),
            });

            bodies.push(Body {
                id: BodyID(bodies.len()),
                descriptor: descriptor.clone(),
                pivot,
                local_offset: descriptor.orbital_distance,
                spin_angle: 0.0,
                decorative: false,
            });
        }

        let tracked = bodies
            .iter()
            .find(|b| b.descriptor.name == tracked_name)
            .map(|b| b.id)
            .ok_or_else(|| BuildError::TrackedBodyMissing(tracked_name.to_owned()))?;

        // The companion shares the tracked planet's pivot, so it revolves
        // in lockstep with it; only its offset differs.
        let planet = &bodies[tracked.0];
        let companion_body = Body {
            id: BodyID(bodies.len()),
            pivot: planet.pivot,
            local_offset: planet.descriptor.orbital_distance + COMPANION_OFFSET,
            descriptor: companion,
            spin_angle: 0.0,
            decorative: true,
        };
        bodies.push(companion_body);

        Ok(System {
            bodies,
            pivots,
            tracked,
        })
    }

    /// The animation driver: advances every spin angle and every orbit
    /// pivot by the elapsed time. Bodies whose own descriptor has zero
    /// orbital distance never touch their pivot, which is what keeps the
    /// shared planet/companion pivot from being advanced twice a frame.
    pub fn advance(&mut self, delta_seconds: f64) {
        let delta = f64::max(delta_seconds, 0.0);
        for body in self.bodies.iter_mut() {
            body.spin_angle += body.descriptor.spin_speed * SPEED_MULTIPLIER * delta;
            if body.descriptor.orbital_distance > 0.0 {
                self.pivots[body.pivot.0].angle +=
                    body.descriptor.orbit_speed * SPEED_MULTIPLIER * delta;
            }
        }
    }

    /// A body's position after composing its whole ancestor chain, which
    /// here is exactly one pivot rotation applied to the local offset.
    pub fn world_position(&self, id: BodyID) -> Point3<f64> {
        let body = &self.bodies[id.0];
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), self.pivot_angle(body.pivot));
        rotation * Point3::new(body.local_offset, 0.0, 0.0)
    }

    /// Where the camera should be looking this frame.
    pub fn tracked_position(&self) -> Point3<f64> {
        self.world_position(self.tracked)
    }

    pub fn tracked(&self) -> BodyID {
        self.tracked
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter()
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn pivot_angle(&self, id: PivotID) -> f64 {
        self.pivots[id.0].angle
    }

    pub fn num_pivots(&self) -> usize {
        self.pivots.len()
    }
}

/// Drives a system from an injected clock until `stop` says we're done.
/// The windowed build gets its deltas from the display refresh instead;
/// this exists so the loop can be run deterministically and finitely.
pub fn run<C, S>(system: &mut System, mut clock: C, mut stop: S)
where
    C: FnMut() -> f64,
    S: FnMut(&System) -> bool,
{
    while !stop(system) {
        let delta = clock();
        system.advance(delta);
    }
}

/// Points of a closed circular orbit path of the given radius, lying in
/// the horizontal plane. These are computed once at startup and never
/// moved afterwards.
pub fn ring_points(radius: f64, segments: usize) -> Vec<Point3<f64>> {
    let mut pts = Vec::with_capacity(segments + 1);
    for i in 0..segments {
        let theta = 2.0 * PI * (i as f64) / (segments as f64);
        pts.push(Point3::new(
            radius * theta.cos(),
            0.0,
            radius * theta.sin(),
        ));
    }
    // Repeat the first point so the polyline closes exactly.
    pts.push(pts[0]);
    pts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::{catalog, companion, TRACKED_BODY};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_system(seed: u64) -> System {
        let mut rng = StdRng::seed_from_u64(seed);
        System::new(&catalog(), TRACKED_BODY, companion(), &mut rng).unwrap()
    }

    #[test]
    fn test_missing_tracked_body_is_loud() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = System::new(&catalog(), "Pluto", companion(), &mut rng);
        assert!(matches!(result, Err(BuildError::TrackedBodyMissing(_))));
    }

    #[test]
    fn test_companion_shares_planet_pivot() {
        let system = test_system(7);
        let planet = system.get_body(system.tracked());
        let rock = system.bodies().find(|b| b.decorative).unwrap();

        assert_eq!(rock.pivot, planet.pivot);
        assert_eq!(
            rock.local_offset,
            planet.descriptor.orbital_distance + COMPANION_OFFSET
        );
        // A nonzero distance here would double-advance the shared pivot
        // every frame.
        assert_eq!(rock.descriptor.orbital_distance, 0.0);
    }

    #[test]
    fn test_initial_phases_are_in_range() {
        let system = test_system(99);
        for i in 0..system.num_pivots() {
            let angle = system.pivot_angle(PivotID(i));
            assert!((0.0..2.0 * PI).contains(&angle));
        }
    }

    #[test]
    fn test_negative_delta_is_clamped() {
        let mut system = test_system(3);
        let before: Vec<f64> = (0..system.num_pivots())
            .map(|i| system.pivot_angle(PivotID(i)))
            .collect();

        system.advance(-10.0);

        for (i, angle) in before.into_iter().enumerate() {
            assert_eq!(system.pivot_angle(PivotID(i)), angle);
        }
        for body in system.bodies() {
            assert_eq!(body.spin_angle, 0.0);
        }
    }

    #[test]
    fn test_run_with_injected_clock() {
        let mut system = test_system(5);
        let planet = system.tracked();
        let start = system.pivot_angle(system.get_body(planet).pivot);

        // Five fixed-size frames, then stop.
        let mut frames = 0;
        run(
            &mut system,
            || 0.25,
            |_| {
                frames += 1;
                frames > 5
            },
        );

        let expected = start + 0.018 * SPEED_MULTIPLIER * 0.25 * 5.0;
        approx::assert_relative_eq!(
            system.pivot_angle(system.get_body(planet).pivot),
            expected,
            max_relative = 1e-12
        );
    }
}
