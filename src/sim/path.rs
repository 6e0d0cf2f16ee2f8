//! Fuse path generation
//!
//! A fuse path is an ordered polyline of points on the surface of a cube.
//! Order is semantic: the fuse point travels the points in generation order.
//! Generation is fully determined by the RNG seed and the point count.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// The six logical cube faces, in the order remainder points are assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Right,
    Back,
    Left,
    Top,
    Bottom,
}

impl Face {
    /// Fixed processing order for point distribution
    pub const ORDER: [Face; 6] = [
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Left,
        Face::Top,
        Face::Bottom,
    ];

    /// Index (0=x, 1=y, 2=z) and sign of this face's fixed axis
    pub fn fixed_axis(&self) -> (usize, f32) {
        match self {
            Face::Front => (2, 1.0),
            Face::Back => (2, -1.0),
            Face::Right => (0, 1.0),
            Face::Left => (0, -1.0),
            Face::Top => (1, 1.0),
            Face::Bottom => (1, -1.0),
        }
    }

    /// Build a surface point from two free coordinates in [-half, half]
    fn point(&self, a: f32, b: f32, half: f32) -> Vec3 {
        match self {
            Face::Front => Vec3::new(a, b, half),
            Face::Back => Vec3::new(a, b, -half),
            Face::Right => Vec3::new(half, a, b),
            Face::Left => Vec3::new(-half, a, b),
            Face::Top => Vec3::new(a, half, b),
            Face::Bottom => Vec3::new(a, -half, b),
        }
    }
}

/// How many of `point_count` land on each face, in `Face::ORDER`
///
/// Base share is `point_count / 6`; the first `point_count % 6` faces get
/// one extra.
pub fn face_counts(point_count: usize) -> [usize; 6] {
    let base = point_count / 6;
    let extra = point_count % 6;
    let mut counts = [base; 6];
    for c in counts.iter_mut().take(extra) {
        *c += 1;
    }
    counts
}

/// Generate a fuse path across the six faces of a cube
///
/// Every free coordinate is drawn as `(r * 2 - 1) * half_extent` with
/// `r ∈ [0, 1)`, so the same RNG state always reproduces the same path.
/// Paths shorter than 2 points are not traversable; `Fuse::arm` rejects
/// them.
pub fn generate(rng: &mut Pcg32, point_count: usize, half_extent: f32) -> Vec<Vec3> {
    let counts = face_counts(point_count);
    let mut points = Vec::with_capacity(point_count);

    for (face, &count) in Face::ORDER.iter().zip(counts.iter()) {
        for _ in 0..count {
            let a = (rng.random::<f32>() * 2.0 - 1.0) * half_extent;
            let b = (rng.random::<f32>() * 2.0 - 1.0) * half_extent;
            points.push(face.point(a, b, half_extent));
        }
    }

    points
}

/// Seed for cube `index`'s path RNG, from the round's random base
///
/// Distinct per cube so no two fuses in a round look alike.
#[inline]
pub fn path_seed(round_base: u64, index: usize) -> u64 {
    round_base + index as u64 * 1000
}

/// Generate the path for one cube from its derived seed
pub fn generate_for_cube(
    round_base: u64,
    index: usize,
    point_count: usize,
    half_extent: f32,
) -> Vec<Vec3> {
    let mut rng = Pcg32::seed_from_u64(path_seed(round_base, index));
    generate(&mut rng, point_count, half_extent)
}
