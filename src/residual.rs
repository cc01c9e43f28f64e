use log::debug;
use crate::config::ProblemConfig;
use crate::error::Error;
use crate::field::Field;
use crate::grid::GridView;
use crate::index_space::{shift, Axis, IndexSpace};
use crate::problem::FieldFunctions;




/**
 * Evaluates the discrete residual of
 *
 * ```text
 * -eps Laplacian u + w0 div(a u) - g(x,y,z,u) = 0
 * ```
 *
 * on the owned part of a grid view. The diffusive term is a second-order
 * central difference. The advective term is a sum of conservative face
 * fluxes, first-order upwind, optionally blended toward the downwind value by
 * a flux limiter. Dirichlet nodes get the injected residual `u - b`.
 *
 * The assembler is a pure function of the local field: it needs the ghost
 * zones within the limiter's stencil reach to be filled, and it never writes
 * to the field.
 */
pub struct ResidualAssembler<'a, P> {
    view: &'a GridView,
    config: &'a ProblemConfig,
    functions: &'a P,
}




// ============================================================================
impl<'a, P: FieldFunctions> ResidualAssembler<'a, P> {

    /**
     * Create an assembler, failing if the view's halo is narrower than the
     * configured limiter needs.
     */
    pub fn new(view: &'a GridView, config: &'a ProblemConfig, functions: &'a P) -> Result<Self, Error> {
        view.require_reach(config.stencil_reach())?;
        Ok(Self { view, config, functions })
    }


    /**
     * Return the residual on the owned index space. The field `u` must cover
     * the view's ghosted index space, with valid guard zone values.
     */
    pub fn assemble(&self, u: &Field) -> Field {
        assert!(
            u.index_space().contains_space(&self.view.ghosted()),
            "field on {:?} does not cover the ghosted space {:?}",
            u.index_space(), self.view.ghosted());

        let mut residual = self.diffusion_and_source(u);
        self.accumulate_fluxes(u, &mut residual);

        debug!("assembled residual on {:?} with limiter={}", self.view.owned(), self.config.limiter());
        residual
    }


    /**
     * Return the non-advective part of the residual: injection at the
     * Dirichlet nodes, and `-eps Laplacian u - g` elsewhere. Where a stencil
     * neighbor is a Dirichlet node, its known boundary value is used rather
     * than the stored one.
     */
    pub fn diffusion_and_source(&self, u: &Field) -> Field {
        let grid = self.view.grid();
        let (mx, my, _) = grid.size();
        let (hx, hy, hz) = grid.cell_spacing();
        let eps = self.config.eps();
        let f = self.functions;

        Field::from_function(self.view.owned().clone(), |(i, j, k)| {
            let (x, y, z) = grid.coordinate((i, j, k));
            let uu = u.get((i, j, k));

            if i == mx - 1 {
                uu - f.boundary_value(y, z)
            } else if grid.is_dirichlet((i, j, k)) {
                uu
            } else {
                let ue = if i == mx - 2 { f.boundary_value(y, z) } else { u.get((i + 1, j, k)) };
                let uw = if i == 1 { 0.0 } else { u.get((i - 1, j, k)) };
                let un = if j == my - 2 { 0.0 } else { u.get((i, j + 1, k)) };
                let us = if j == 1 { 0.0 } else { u.get((i, j - 1, k)) };
                let ut = u.get((i, j, k + 1));
                let ub = u.get((i, j, k - 1));
                let uxx = (uw - 2.0 * uu + ue) / (hx * hx);
                let uyy = (us - 2.0 * uu + un) / (hy * hy);
                let uzz = (ub - 2.0 * uu + ut) / (hz * hz);
                -(eps * (uxx + uyy + uzz) + f.source(x, y, z, uu))
            }
        })
    }


    /**
     * Add the divergence of the advective face fluxes to the residual. Each
     * face between cells `c` and `c + 1` along an axis is visited once; its
     * flux is added to `c` and subtracted from `c + 1`, for each of the two
     * cells which is owned and not a Dirichlet node.
     */
    pub fn accumulate_fluxes(&self, u: &Field, residual: &mut Field) {
        let grid = self.view.grid();
        let spacing = grid.cell_spacing();

        for &axis in &Axis::ALL {
            let h = axis.component(spacing);

            for c in self.face_space(axis).iter() {
                let d = shift(c, axis, 1);

                if grid.is_dirichlet(c) && grid.is_dirichlet(d) {
                    continue;
                }
                let flux = self.face_flux(u, c, axis);

                if self.accepts(c) {
                    *residual.get_mut(c) += flux / h;
                }
                if self.accepts(d) {
                    *residual.get_mut(d) -= flux / h;
                }
            }
        }
    }


    /**
     * Return the advective flux through the face between `c` and its upper
     * neighbor along `axis`.
     */
    pub fn face_flux(&self, u: &Field, c: (i64, i64, i64), axis: Axis) -> f64 {
        let grid = self.view.grid();
        let d = shift(c, axis, 1);
        let (x, y, z) = grid.coordinate(c);
        let (hx, hy, hz) = grid.cell_spacing();
        let (di, dj, dk) = axis.unit();
        let wind = self.functions.wind(
            x + 0.5 * hx * di as f64,
            y + 0.5 * hy * dj as f64,
            z + 0.5 * hz * dk as f64);
        let a = self.config.w0() * axis.component(wind);

        let (upwind, downwind) = if a >= 0.0 { (c, d) } else { (d, c) };
        let u_up = u.get(upwind);
        let mut flux = a * u_up;

        let limiter = self.config.limiter();

        if limiter.is_active() && grid.is_deep(c) {
            let u_dn = u.get(downwind);

            // a zero denominator in the smoothness ratio means no correction
            if u_dn != u_up {
                let far = if a >= 0.0 { shift(c, axis, -1) } else { shift(c, axis, 2) };
                let psi = limiter.coefficient(|| (u_up - u.get(far)) / (u_dn - u_up));

                if let Some(psi) = psi {
                    flux += a * psi * (u_dn - u_up);
                }
            }
        }
        flux
    }


    /**
     * Return the index space of the lower cells `c` of every face which
     * borders an owned cell along the given axis. On a Dirichlet axis the
     * faces stop at the boundary nodes; on the periodic axis the first face
     * lies between the lower ghost and the first owned cell.
     */
    fn face_space(&self, axis: Axis) -> IndexSpace {
        let owned = self.view.owned();
        let r = owned.range(axis);
        let (lo, hi) = if self.view.is_periodic(axis) {
            (r.start - 1, r.end)
        } else {
            ((r.start - 1).max(0), r.end.min(self.view.grid().extent(axis) - 1))
        };
        let range = |a: Axis| if a == axis { lo..hi } else { owned.range(a) };
        IndexSpace::new(range(Axis::I), range(Axis::J), range(Axis::K))
    }


    fn accepts(&self, index: (i64, i64, i64)) -> bool {
        self.view.is_owned(index) && !self.view.grid().is_dirichlet(index)
    }
}




/**
 * Assemble the residual of the configured problem on a grid view.
 */
pub fn assemble(view: &GridView, u: &Field, config: &ProblemConfig) -> Result<Field, Error> {
    let problem = config.problem();
    Ok(ResidualAssembler::new(view, config, &problem)?.assemble(u))
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{assemble, ResidualAssembler};
    use crate::config::ProblemConfig;
    use crate::exact::BoundaryLayerSolution;
    use crate::field::Field;
    use crate::grid::{Grid, GridView};
    use crate::index_space::{shift, Axis};
    use crate::limiter::Limiter;
    use crate::meshing::{decompose, extend_field};
    use crate::problem::{DoubleGlazing, FieldFunctions, ProblemKind};

    /**
     * A uniform wind with no source or boundary data.
     */
    struct Uniform(f64, f64, f64);

    impl FieldFunctions for Uniform {
        fn wind(&self, _x: f64, _y: f64, _z: f64) -> (f64, f64, f64) {
            (self.0, self.1, self.2)
        }
        fn source(&self, _x: f64, _y: f64, _z: f64, _u: f64) -> f64 {
            0.0
        }
        fn boundary_value(&self, _y: f64, _z: f64) -> f64 {
            0.0
        }
    }

    fn config(eps: f64, w0: f64, limiter: Limiter) -> ProblemConfig {
        ProblemConfig::new(eps, w0, limiter, ProblemKind::Layer).unwrap()
    }

    fn rough(grid: &Grid) -> Field {
        Field::from_function(grid.index_space(), |(i, j, k)| {
            let n = (i * 7919 + j * 104729 + k * 1299709) % 1009;
            n as f64 / 1009.0 - 0.5
        })
    }

    /**
     * A field which vanishes on the Dirichlet nodes and their neighbors.
     */
    fn bump(grid: &Grid) -> Field {
        let (mx, my, _) = grid.size();
        Field::from_function(grid.index_space(), |(i, j, k)| {
            if i < 2 || i > mx - 3 || j < 2 || j > my - 3 {
                0.0
            } else {
                let (x, y, z) = grid.coordinate((i, j, k));
                f64::cos(x + 2.0 * y) * (1.5 + f64::sin(3.0 * z)) + 0.2 * ((i + 2 * j + 3 * k) % 5) as f64
            }
        })
    }

    #[test]
    fn upwind_flux_has_no_correction_without_a_limiter() {
        let grid = Grid::new(9, 8, 6).unwrap();
        let view = GridView::whole(grid, 1);
        let u = extend_field(&rough(&grid), &view);

        for &w0 in &[1.5, -0.75] {
            let config = config(1.0, w0, Limiter::None);
            let wind = Uniform(1.0, -2.0, 0.5);
            let assembler = ResidualAssembler::new(&view, &config, &wind).unwrap();

            for &axis in &Axis::ALL {
                let a = w0 * axis.component((1.0, -2.0, 0.5));
                for c in grid.index_space().iter() {
                    let d = shift(c, axis, 1);
                    if !view.ghosted().contains(d) {
                        continue;
                    }
                    let u_up = if a >= 0.0 { u.get(c) } else { u.get(d) };
                    assert_eq!(assembler.face_flux(&u, c, axis), a * u_up);
                }
            }
        }
    }

    #[test]
    fn equal_upwind_and_downwind_values_skip_the_limiter() {
        let grid = Grid::new(10, 10, 6).unwrap();
        let view = GridView::whole(grid, 2);
        let global = Field::from_function(grid.index_space(), |(i, j, k)| if i < 5 { 1.0 } else { (j + k) as f64 });
        let u = extend_field(&global, &view);

        for &limiter in &[Limiter::Centered, Limiter::VanLeer] {
            let config = config(1.0, 1.0, limiter);
            let wind = Uniform(1.0, 0.0, 0.0);
            let assembler = ResidualAssembler::new(&view, &config, &wind).unwrap();

            for c in grid.index_space().iter().filter(|&(i, _, _)| i < 4) {
                let flux = assembler.face_flux(&u, c, Axis::I);
                assert!(flux.is_finite());
                assert_eq!(flux, u.get(c));
            }
            assert!(assembler.assemble(&u).data().iter().all(|r| r.is_finite()));
        }
    }

    #[test]
    fn flat_far_upwind_data_reduces_van_leer_to_upwind() {
        let grid = Grid::new(10, 10, 6).unwrap();
        let view = GridView::whole(grid, 2);
        let global = Field::from_function(grid.index_space(), |(i, _, _)| if i < 5 { 2.0 } else { 3.0 });
        let u = extend_field(&global, &view);
        let van_leer = config(1.0, 1.0, Limiter::VanLeer);
        let centered = config(1.0, 1.0, Limiter::Centered);
        let wind = Uniform(1.0, 0.0, 0.0);

        // the face between i=4 and i=5 has theta = 0
        let assembler = ResidualAssembler::new(&view, &van_leer, &wind).unwrap();
        assert_eq!(assembler.face_flux(&u, (4, 4, 2), Axis::I), 2.0);

        let assembler = ResidualAssembler::new(&view, &centered, &wind).unwrap();
        assert_eq!(assembler.face_flux(&u, (4, 4, 2), Axis::I), 2.5);
    }

    #[test]
    fn overflowing_smoothness_ratio_gives_a_finite_flux() {
        let grid = Grid::new(10, 10, 6).unwrap();
        let view = GridView::whole(grid, 2);
        let global = Field::from_function(grid.index_space(), |index| match index {
            (3, 4, 2) => -1e10,
            (5, 4, 2) => 1e-300,
            _ => 0.0,
        });
        let u = extend_field(&global, &view);
        let config = config(1.0, 1.0, Limiter::VanLeer);
        let wind = Uniform(1.0, 0.0, 0.0);
        let assembler = ResidualAssembler::new(&view, &config, &wind).unwrap();

        // theta = 1e10 / 1e-300 overflows to infinity
        let flux = assembler.face_flux(&u, (4, 4, 2), Axis::I);
        assert!(flux.is_finite());
        assert_eq!(flux, 1e-300);
        assert!(assembler.assemble(&u).data().iter().all(|r| r.is_finite()));
    }

    #[test]
    fn advective_fluxes_are_conservative() {
        let grid = Grid::new(12, 11, 6).unwrap();
        let global = bump(&grid);

        for &limiter in &[Limiter::None, Limiter::Centered, Limiter::VanLeer] {
            let config = config(1.0, 1.3, limiter);

            for &blocks in &[(1, 1, 1), (2, 2, 2), (3, 1, 3)] {
                let mut total = 0.0;
                let mut scale = 0.0;

                for block in decompose(&grid, blocks).unwrap() {
                    let view = GridView::new(grid, block.clone(), limiter.stencil_reach()).unwrap();
                    let u = extend_field(&global, &view);
                    let assembler = ResidualAssembler::new(&view, &config, &DoubleGlazing).unwrap();
                    let mut residual = Field::zeros(block);
                    assembler.accumulate_fluxes(&u, &mut residual);
                    total += residual.data().iter().sum::<f64>();
                    scale += residual.data().iter().map(|r| r.abs()).sum::<f64>();
                }
                assert!(scale > 1.0);
                assert!(total.abs() < 1e-12 * scale, "limiter={} blocks={:?}: sum={}", limiter, blocks, total);
            }
        }
    }

    #[test]
    fn dirichlet_nodes_get_injected_residuals() {
        let grid = Grid::new(6, 6, 5).unwrap();
        let (mx, my, _) = grid.size();
        let exact = BoundaryLayerSolution::new(1.0);
        let global = Field::from_function(grid.index_space(), |(i, j, k)| {
            let (x, y, z) = grid.coordinate((i, j, k));
            if i == mx - 1 {
                exact.boundary_value(y, z)
            } else if i == 0 || j == 0 || j == my - 1 {
                0.0
            } else {
                exact.value(x, y, z)
            }
        });

        for &limiter in &[Limiter::None, Limiter::Centered, Limiter::VanLeer] {
            let config = config(1.0, 1.0, limiter);
            let view = GridView::whole(grid, limiter.stencil_reach());
            let residual = assemble(&view, &extend_field(&global, &view), &config).unwrap();

            for (index, r) in residual.iter() {
                if grid.is_dirichlet(index) {
                    assert_eq!(r, 0.0, "index {:?}", index);
                }
            }
        }
    }

    #[test]
    fn zero_field_on_the_smallest_grid() {
        let grid = Grid::new(6, 6, 5).unwrap();
        let (mx, my, _) = grid.size();
        let (hx, _, _) = grid.cell_spacing();
        let config = config(1.0, 0.0, Limiter::None);
        let problem = config.problem();
        let view = GridView::whole(grid, 1);
        let u = Field::zeros(view.ghosted());
        let residual = assemble(&view, &u, &config).unwrap();

        for (index, r) in residual.iter() {
            let (i, j, _) = index;
            let (x, y, z) = grid.coordinate(index);
            let expected = if i == mx - 1 {
                -problem.boundary_value(y, z)
            } else if i == 0 || j == 0 || j == my - 1 {
                0.0
            } else if i == mx - 2 {
                -(problem.boundary_value(y, z) / (hx * hx) + problem.source(x, y, z, 0.0))
            } else {
                -problem.source(x, y, z, 0.0)
            };
            assert!((r - expected).abs() < 1e-10, "index {:?}: {} != {}", index, r, expected);
        }
    }

    #[test]
    fn assembler_rejects_a_narrow_halo() {
        let grid = Grid::new(6, 6, 5).unwrap();
        let view = GridView::whole(grid, 1);
        let config = config(1.0, 1.0, Limiter::VanLeer);
        assert!(ResidualAssembler::new(&view, &config, &DoubleGlazing).is_err());
        assert!(assemble(&view, &Field::zeros(view.ghosted()), &config).is_err());
    }

    /**
     * Return the largest difference between the discrete residual of the exact
     * boundary layer solution and the continuous operator applied to it, over
     * the interior nodes which do not straddle the periodic seam (where the
     * z-profile of the exact solution has a kink).
     */
    fn truncation_error(grid: Grid, eps: f64, w0: f64) -> f64 {
        let (mx, my, mz) = grid.size();
        let config = config(eps, w0, Limiter::None);
        let exact = BoundaryLayerSolution::new(eps);
        let view = GridView::whole(grid, 1);
        let global = exact.sample(&grid, grid.index_space());
        let residual = assemble(&view, &extend_field(&global, &view), &config).unwrap();

        residual
            .iter()
            .filter(|&((i, j, k), _)| i > 0 && i < mx - 1 && j > 0 && j < my - 1 && k > 0 && k < mz - 1)
            .map(|(index, r)| {
                let (x, y, z) = grid.coordinate(index);
                let continuous = -eps * exact.laplacian(x, y, z) + w0 * exact.x_derivative(x, y, z) - exact.source(x, y, z);
                (r - continuous).abs()
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn diffusion_is_second_order_accurate() {
        let base = Grid::new(5, 5, 4).unwrap();
        let errors: Vec<_> = (1..4).map(|n| truncation_error(base.refine(n), 1.0, 0.0)).collect();
        assert!(errors[0] / errors[1] > 3.0, "{:?}", errors);
        assert!(errors[1] / errors[2] > 3.0, "{:?}", errors);
    }

    #[test]
    fn upwind_advection_is_first_order_accurate() {
        let base = Grid::new(5, 5, 4).unwrap();
        let errors: Vec<_> = (1..4).map(|n| truncation_error(base.refine(n), 1.0, 1.0)).collect();
        assert!(errors[0] / errors[1] > 1.7, "{:?}", errors);
        assert!(errors[1] / errors[2] > 1.7, "{:?}", errors);
    }

    #[test]
    fn exact_solution_has_small_residual_with_matching_wind() {
        let base = Grid::new(5, 5, 4).unwrap();
        let config = config(1.0, 1.0, Limiter::None);
        let norms: Vec<_> = (1..4)
            .map(|n| {
                let grid = base.refine(n);
                let (mx, my, mz) = grid.size();
                let exact = BoundaryLayerSolution::new(1.0);
                let view = GridView::whole(grid, 1);
                let u = extend_field(&exact.sample(&grid, grid.index_space()), &view);
                let residual = assemble(&view, &u, &config).unwrap();
                residual
                    .iter()
                    .filter(|&((i, j, k), _)| i > 0 && i < mx - 1 && j > 0 && j < my - 1 && k > 0 && k < mz - 1)
                    .map(|(_, r)| r.abs())
                    .fold(0.0, f64::max)
            })
            .collect();
        assert!(norms[0] > norms[1] && norms[1] > norms[2], "{:?}", norms);
    }
}
