use core::ops::Range;
use crate::error::Error;
use crate::field::Field;
use crate::grid::{Grid, GridView};
use crate::index_space::{Axis, IndexSpace};




/// Split `n` cells into `parts` contiguous ranges whose lengths differ by at
/// most one. The lowest ranges get the remainder. Zero parts gives no ranges.
///
pub fn split_range(n: i64, parts: usize) -> Vec<Range<i64>> {
    if parts == 0 {
        return Vec::new()
    }
    let parts = parts as i64;
    let base = n / parts;
    let rem = n % parts;
    let mut start = 0;

    (0..parts)
        .map(|p| {
            let len = base + if p < rem { 1 } else { 0 };
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}




/// Partition the grid into `blocks.0 x blocks.1 x blocks.2` disjoint owned
/// boxes which together cover it. Fails if an axis has fewer cells than
/// blocks.
///
pub fn decompose(grid: &Grid, blocks: (usize, usize, usize)) -> Result<Vec<IndexSpace>, Error> {
    for &axis in &Axis::ALL {
        let b = axis.component(blocks);
        let n = grid.extent(axis);
        if b == 0 || b as i64 > n {
            return Err(Error::InvalidDecomposition(axis, b, n))
        }
    }
    let (mx, my, mz) = grid.size();
    let di = split_range(mx, blocks.0);
    let dj = split_range(my, blocks.1);
    let dk = split_range(mz, blocks.2);
    let (dj, dk) = (&dj, &dk);

    Ok(di.iter()
        .flat_map(|ri| dj.iter().flat_map(move |rj| dk.iter().map(move |rk| (ri, rj, rk))))
        .map(|(ri, rj, rk)| IndexSpace::new(ri.clone(), rj.clone(), rk.clone()))
        .collect())
}




/// Return the regions of the `source` box (in grid indexes) that appear in
/// the `target` index space, together with the offset along the periodic
/// axis at which each appears there. A target box which extends past the
/// ends of the periodic axis sees the source through its periodic images.
///
pub fn periodic_images(grid: &Grid, source: &IndexSpace, target: &IndexSpace) -> Vec<(IndexSpace, i64)> {
    let mz = grid.extent(Axis::K);
    let dk = target.range(Axis::K);

    (dk.start.div_euclid(mz)..=(dk.end - 1).div_euclid(mz))
        .map(|n| n * mz)
        .filter_map(|offset| {
            target
                .translate(-offset, Axis::K)
                .intersect(source)
                .map(|region| (region, offset))
        })
        .collect()
}




/// Return a local field on the view's ghosted index space, with values
/// taken from a field covering the whole grid. Guard zones across the
/// periodic axis get the periodic image. Guard zones outside the grid on the
/// Dirichlet axes are zero; the residual never reads them.
///
/// This is the single-process counterpart of the halo exchange done by
/// subdomain tasks.
///
pub fn extend_field(global: &Field, view: &GridView) -> Field {
    let grid = view.grid();
    let (_, _, mz) = grid.size();
    let space = grid.index_space();

    Field::from_function(view.ghosted(), |(i, j, k)| {
        let wrapped = (i, j, k.rem_euclid(mz));
        if space.contains(wrapped) {
            global.get(wrapped)
        } else {
            0.0
        }
    })
}
