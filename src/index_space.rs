use core::ops::Range;




/**
 * Identifier for a Cartesian axis
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Axis {
    I,
    J,
    K,
}




// ============================================================================
impl Axis {

    pub const ALL: [Axis; 3] = [Axis::I, Axis::J, Axis::K];


    /**
     * Return the unit offset along this axis, as an index triple.
     */
    pub fn unit(self) -> (i64, i64, i64) {
        match self {
            Axis::I => (1, 0, 0),
            Axis::J => (0, 1, 0),
            Axis::K => (0, 0, 1),
        }
    }


    /**
     * Pick the component of an index (or any triple) along this axis.
     */
    pub fn component<T: Copy>(self, triple: (T, T, T)) -> T {
        match self {
            Axis::I => triple.0,
            Axis::J => triple.1,
            Axis::K => triple.2,
        }
    }
}




/**
 * Offset an index by `n` steps along the given axis.
 */
pub fn shift(index: (i64, i64, i64), axis: Axis, n: i64) -> (i64, i64, i64) {
    let (di, dj, dk) = axis.unit();
    (index.0 + n * di, index.1 + n * dj, index.2 + n * dk)
}




/**
 * Represents a box-shaped region in a discrete 3D index space
 */
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct IndexSpace {
    di: Range<i64>,
    dj: Range<i64>,
    dk: Range<i64>,
}




/**
 * Describes a box-shaped index space. The index type is signed 64-bit integer,
 * so that guard zones below the origin can be addressed directly.
 */
impl IndexSpace {


    pub fn new(di: Range<i64>, dj: Range<i64>, dk: Range<i64>) -> Self {

        assert!(
            di.start <= di.end && dj.start <= dj.end && dk.start <= dk.end,
            "index space has negative volume");

        Self { di, dj, dk }
    }


    /**
     * Return the number of indexes on each axis.
     */
    pub fn dim(&self) -> (usize, usize, usize) {
        ((self.di.end - self.di.start) as usize,
         (self.dj.end - self.dj.start) as usize,
         (self.dk.end - self.dk.start) as usize)
    }


    /**
     * Return the number of elements in this index space.
     */
    pub fn len(&self) -> usize {
        let (l, m, n) = self.dim();
        l * m * n
    }


    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /**
     * Return the minimum index (inclusive).
     */
    pub fn start(&self) -> (i64, i64, i64) {
        (self.di.start, self.dj.start, self.dk.start)
    }


    /**
     * Return the maximum index (exclusive).
     */
    pub fn end(&self) -> (i64, i64, i64) {
        (self.di.end, self.dj.end, self.dk.end)
    }


    /**
     * Return the index range along one axis.
     */
    pub fn range(&self, axis: Axis) -> Range<i64> {
        match axis {
            Axis::I => self.di.clone(),
            Axis::J => self.dj.clone(),
            Axis::K => self.dk.clone(),
        }
    }


    /**
     * Determine whether this index space contains the given index.
     */
    pub fn contains(&self, index: (i64, i64, i64)) -> bool {
        self.di.contains(&index.0) && self.dj.contains(&index.1) && self.dk.contains(&index.2)
    }


    /**
     * Determine whether another index space is a subset of this one.
     */
    pub fn contains_space(&self, other: &Self) -> bool {
        other.di.start >= self.di.start && other.di.end <= self.di.end &&
        other.dj.start >= self.dj.start && other.dj.end <= self.dj.end &&
        other.dk.start >= self.dk.start && other.dk.end <= self.dk.end
    }


    /**
     * Expand this index space by the given number of elements on each axis.
     */
    pub fn extend_all(&self, delta: i64) -> Self {
        Self::new(
            self.di.start - delta .. self.di.end + delta,
            self.dj.start - delta .. self.dj.end + delta,
            self.dk.start - delta .. self.dk.end + delta)
    }


    /**
     * Shift this index space by `delta` elements along the given axis.
     */
    pub fn translate(&self, delta: i64, axis: Axis) -> Self {
        let mut result = self.clone();
        let r = match axis {
            Axis::I => &mut result.di,
            Axis::J => &mut result.dj,
            Axis::K => &mut result.dk,
        };
        r.start += delta;
        r.end += delta;
        result
    }


    /**
     * Return the overlap of this index space with another one, or `None` if
     * the two do not overlap.
     */
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let clip = |a: &Range<i64>, b: &Range<i64>| a.start.max(b.start) .. a.end.min(b.end);
        let di = clip(&self.di, &other.di);
        let dj = clip(&self.dj, &other.dj);
        let dk = clip(&self.dk, &other.dk);

        if di.start < di.end && dj.start < dj.end && dk.start < dk.end {
            Some(Self { di, dj, dk })
        } else {
            None
        }
    }


    /**
     * Return the linear offset for the given index, in a row-major memory
     * buffer aligned with the start of this index space.
     */
    pub fn row_major_offset(&self, index: (i64, i64, i64)) -> usize {
        let i = (index.0 - self.di.start) as usize;
        let j = (index.1 - self.dj.start) as usize;
        let k = (index.2 - self.dk.start) as usize;
        let (_, m, n) = self.dim();
        (i * m + j) * n + k
    }


    /**
     * Return an iterator which traverses the index space in row-major order
     * (C-like; the final index increases fastest).
     */
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64, i64)> + '_ {
        self.di.clone().flat_map(move |i| {
            self.dj.clone().flat_map(move |j| self.dk.clone().map(move |k| (i, j, k)))
        })
    }
}




/**
 * Less imposing factory function to construct an IndexSpace object.
 */
pub fn range3d(di: Range<i64>, dj: Range<i64>, dk: Range<i64>) -> IndexSpace {
    IndexSpace::new(di, dj, dk)
}
