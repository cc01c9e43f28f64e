use core::f64::consts::PI;
use crate::field::Field;
use crate::grid::Grid;
use crate::index_space::IndexSpace;




/// Wavenumber of the manufactured solution in y.
pub const E: f64 = 2.0 * PI;

/// Wavenumber of the manufactured solution in z.
pub const F: f64 = PI / 2.0;




/**
 * A partly manufactured exact solution with an exponential layer of width
 * `eps` near `x = 1`:
 *
 * ```text
 * u(x,y,z) = U(x) sin(E (y+1)) sin(F (z+1))
 * U(x) = (exp((x-1)/eps) - C) / (1 - C),   C = exp(-2/eps)
 * ```
 *
 * `U` satisfies `-eps U'' + U' = 0` with `U(-1) = 0` and `U(1) = 1`, so with
 * the wind `<1,0,0>` the source `g = eps (E^2 + F^2) u` makes `u` exact.
 */
#[derive(Clone, Debug, serde::Serialize)]
pub struct BoundaryLayerSolution {
    eps: f64,
    c: f64,
}




// ============================================================================
impl BoundaryLayerSolution {

    pub fn new(eps: f64) -> Self {
        // may underflow to zero, which is harmless
        let c = f64::exp(-2.0 / eps);
        Self { eps, c }
    }

    /**
     * Return the x-profile `U(x)` and its first two derivatives.
     */
    pub fn profile(&self, x: f64) -> (f64, f64, f64) {
        let ex = f64::exp((x - 1.0) / self.eps);
        let u = (ex - self.c) / (1.0 - self.c);
        let du = ex / self.eps / (1.0 - self.c);
        (u, du, du / self.eps)
    }

    fn transverse(y: f64, z: f64) -> f64 {
        f64::sin(E * (y + 1.0)) * f64::sin(F * (z + 1.0))
    }

    pub fn value(&self, x: f64, y: f64, z: f64) -> f64 {
        self.profile(x).0 * Self::transverse(y, z)
    }

    pub fn source(&self, x: f64, y: f64, z: f64) -> f64 {
        self.eps * (E * E + F * F) * self.value(x, y, z)
    }

    pub fn boundary_value(&self, y: f64, z: f64) -> f64 {
        self.value(1.0, y, z)
    }

    /**
     * Return the Laplacian of the exact solution at a point.
     */
    pub fn laplacian(&self, x: f64, y: f64, z: f64) -> f64 {
        let (u, _, d2u) = self.profile(x);
        (d2u - (E * E + F * F) * u) * Self::transverse(y, z)
    }

    /**
     * Return the x-derivative of the exact solution at a point.
     */
    pub fn x_derivative(&self, x: f64, y: f64, z: f64) -> f64 {
        self.profile(x).1 * Self::transverse(y, z)
    }

    /**
     * Sample the exact solution at the grid nodes in the given index space.
     * Guard indexes are sampled at their (unwrapped) coordinates, so the
     * result is not a valid periodic halo.
     */
    pub fn sample(&self, grid: &Grid, space: IndexSpace) -> Field {
        Field::from_function(space, |index| {
            let (x, y, z) = grid.coordinate(index);
            self.value(x, y, z)
        })
    }
}




/**
 * Return the discrete L2 norm of the given values, scaled by the square root
 * of the cell volume so that it approximates the continuous norm.
 */
pub fn discrete_norm<I>(grid: &Grid, values: I) -> f64
where
    I: IntoIterator<Item = f64>
{
    let sum: f64 = values.into_iter().map(|v| v * v).sum();
    f64::sqrt(sum * grid.cell_volume())
}




/**
 * Return `|u - v|_{2,h}` over the given index space.
 */
pub fn error_norm(grid: &Grid, u: &Field, v: &Field, space: &IndexSpace) -> f64 {
    discrete_norm(grid, space.iter().map(|index| u.get(index) - v.get(index)))
}
