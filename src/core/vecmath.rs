//! Small fixed-size vector helpers shared by the detector and the resolver.

/// Spatial dimension of the arena.
pub const DIM: usize = 2;

/// Express `v` in a frame rotated by `angle` radians about the origin.
///
/// Standard 2D rotation matrix: `x' = x cos θ − y sin θ`, `y' = x sin θ + y cos θ`.
#[inline]
pub fn rotate(v: [f64; DIM], angle: f64) -> [f64; DIM] {
    let (sin, cos) = angle.sin_cos();
    [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos]
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    let d = sub(a, b);
    dot(&d, &d).sqrt()
}

#[inline]
pub fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Component-wise `a - b`.
#[inline]
pub fn sub(a: &[f64; DIM], b: &[f64; DIM]) -> [f64; DIM] {
    let mut out = [0.0_f64; DIM];
    for ((o, &ak), &bk) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *o = ak - bk;
    }
    out
}
