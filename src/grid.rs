use crate::error::Error;
use crate::index_space::{range3d, Axis, IndexSpace};




/**
 * The global structured grid on `[-1,1]^3`. The x and y axes carry Dirichlet
 * conditions, and their first and last indexes lie on the boundary planes.
 * The z axis is periodic and cell-centered.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Grid {
    mx: i64,
    my: i64,
    mz: i64,
}




// ============================================================================
impl Grid {

    pub fn new(mx: i64, my: i64, mz: i64) -> Result<Self, Error> {
        if mx < 3 {
            Err(Error::InvalidGridSize(Axis::I, mx))
        } else if my < 3 {
            Err(Error::InvalidGridSize(Axis::J, my))
        } else if mz < 1 {
            Err(Error::InvalidGridSize(Axis::K, mz))
        } else {
            Ok(Self { mx, my, mz })
        }
    }


    /**
     * Return a grid with the spacing halved `levels` times on every axis. The
     * boundary nodes on the Dirichlet axes are kept.
     */
    pub fn refine(&self, levels: u32) -> Self {
        (0..levels).fold(*self, |g, _| Self {
            mx: 2 * (g.mx - 1) + 1,
            my: 2 * (g.my - 1) + 1,
            mz: 2 * g.mz,
        })
    }


    /**
     * Return the number of indexes on each axis.
     */
    pub fn size(&self) -> (i64, i64, i64) {
        (self.mx, self.my, self.mz)
    }


    pub fn index_space(&self) -> IndexSpace {
        range3d(0..self.mx, 0..self.my, 0..self.mz)
    }


    pub fn cell_spacing(&self) -> (f64, f64, f64) {
        (2.0 / (self.mx - 1) as f64,
         2.0 / (self.my - 1) as f64,
         2.0 / self.mz as f64)
    }


    pub fn cell_volume(&self) -> f64 {
        let (hx, hy, hz) = self.cell_spacing();
        hx * hy * hz
    }


    /**
     * Return the coordinates of the given index. The boundary nodes map to
     * exactly `±1`. Guard indexes outside the grid are mapped linearly.
     */
    pub fn coordinate(&self, index: (i64, i64, i64)) -> (f64, f64, f64) {
        let x = -1.0 + 2.0 * index.0 as f64 / (self.mx - 1) as f64;
        let y = -1.0 + 2.0 * index.1 as f64 / (self.my - 1) as f64;
        let z = -1.0 + (index.2 as f64 + 0.5) * 2.0 / self.mz as f64;
        (x, y, z)
    }


    pub fn is_periodic(&self, axis: Axis) -> bool {
        axis == Axis::K
    }


    /**
     * Return the number of indexes along an axis.
     */
    pub fn extent(&self, axis: Axis) -> i64 {
        axis.component(self.size())
    }


    /**
     * Determine whether the given index is a Dirichlet node, whose residual
     * is fixed by injection of the boundary value.
     */
    pub fn is_dirichlet(&self, index: (i64, i64, i64)) -> bool {
        let (i, j, _) = index;
        i == 0 || i == self.mx - 1 || j == 0 || j == self.my - 1
    }


    /**
     * Determine whether a limited face flux may be evaluated from the cell
     * at this index: the cell must be at least two nodes from the Dirichlet
     * boundaries, so both the far-upwind and the downwind values are
     * interior.
     */
    pub fn is_deep(&self, index: (i64, i64, i64)) -> bool {
        let (i, j, _) = index;
        i > 1 && i < self.mx - 2 && j > 1 && j < self.my - 2
    }
}




/**
 * The part of the grid local to one subdomain: an owned index box, plus a halo
 * of guard zones whose values are supplied by the halo exchange before the
 * residual is assembled.
 */
#[derive(Clone, Debug, serde::Serialize)]
pub struct GridView {
    grid: Grid,
    owned: IndexSpace,
    halo: i64,
}




// ============================================================================
impl GridView {

    pub fn new(grid: Grid, owned: IndexSpace, halo: i64) -> Result<Self, Error> {
        if owned.is_empty() || !grid.index_space().contains_space(&owned) {
            Err(Error::OwnedBoxOutsideGrid)
        } else {
            Ok(Self { grid, owned, halo })
        }
    }


    /**
     * A view which owns the whole grid.
     */
    pub fn whole(grid: Grid, halo: i64) -> Self {
        Self { grid, owned: grid.index_space(), halo }
    }


    pub fn grid(&self) -> &Grid {
        &self.grid
    }


    pub fn owned(&self) -> &IndexSpace {
        &self.owned
    }


    pub fn halo(&self) -> i64 {
        self.halo
    }


    /**
     * Return the owned box extended by the halo on every axis. Local fields
     * are stored over this index space.
     */
    pub fn ghosted(&self) -> IndexSpace {
        self.owned.extend_all(self.halo)
    }


    /**
     * Determine whether an index is owned. Indexes are not wrapped: on the
     * periodic axis, `k = -1` is a ghost even when `mz - 1` is owned.
     */
    pub fn is_owned(&self, index: (i64, i64, i64)) -> bool {
        self.owned.contains(index)
    }


    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.grid.is_periodic(axis)
    }


    /**
     * Fail unless the halo is wide enough for a stencil of the given reach.
     */
    pub fn require_reach(&self, reach: i64) -> Result<(), Error> {
        if self.halo < reach {
            Err(Error::InsufficientHalo(self.halo, reach))
        } else {
            Ok(())
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{Grid, GridView};
    use crate::index_space::{range3d, Axis};

    #[test]
    fn boundary_nodes_map_to_unit_planes() {
        let grid = Grid::new(7, 11, 5).unwrap();
        assert_eq!(grid.coordinate((0, 0, 0)).0, -1.0);
        assert_eq!(grid.coordinate((6, 0, 0)).0, 1.0);
        assert_eq!(grid.coordinate((0, 10, 0)).1, 1.0);
        let (_, _, hz) = grid.cell_spacing();
        assert!((grid.coordinate((0, 0, 4)).2 - (1.0 - 0.5 * hz)).abs() < 1e-15);
    }

    #[test]
    fn small_grids_are_rejected() {
        assert!(Grid::new(2, 6, 5).is_err());
        assert!(Grid::new(6, 2, 5).is_err());
        assert!(Grid::new(6, 6, 0).is_err());
    }

    #[test]
    fn refinement_keeps_boundary_nodes() {
        let grid = Grid::new(6, 6, 5).unwrap().refine(2);
        assert_eq!(grid.size(), (21, 21, 20));
        let (hx, hy, hz) = grid.cell_spacing();
        assert!((hx - 0.1).abs() < 1e-15 && (hy - 0.1).abs() < 1e-15 && (hz - 0.1).abs() < 1e-15);
    }

    #[test]
    fn ownership_is_not_wrapped() {
        let grid = Grid::new(6, 6, 5).unwrap();
        let view = GridView::new(grid, range3d(0..3, 0..6, 0..5), 2).unwrap();
        assert!(view.is_owned((2, 5, 4)));
        assert!(!view.is_owned((3, 0, 0)));
        assert!(!view.is_owned((0, 0, -1)));
        assert!(view.is_periodic(Axis::K) && !view.is_periodic(Axis::I));
        assert_eq!(view.ghosted(), range3d(-2..5, -2..8, -2..7));
        assert!(view.require_reach(2).is_ok());
        assert!(GridView::whole(grid, 1).require_reach(2).is_err());
        assert!(GridView::new(grid, range3d(0..7, 0..6, 0..5), 1).is_err());
    }
}
