use crate::index_space::IndexSpace;




/**
 * A field is a mapping from a box-shaped region of the grid's index space to
 * one scalar value per index. The mapping is backed by a row-major array
 * aligned with the start of the region. A field may cover indexes outside the
 * grid (guard zones), in which case the grid-level meaning of those indexes
 * (e.g. a periodic image) is decided by whoever fills them.
 */
#[derive(Clone, Debug, serde::Serialize)]
pub struct Field {
    space: IndexSpace,
    data: Vec<f64>,
}




// ============================================================================
impl Field {


    /**
     * Generate a field covering the given index space, with values defined
     * from a closure.
     */
    pub fn from_function<F>(space: IndexSpace, f: F) -> Self
    where
        F: Fn((i64, i64, i64)) -> f64
    {
        let data = space.iter().map(f).collect();
        Self { space, data }
    }


    /**
     * Generate a field of zeros over the given index space.
     */
    pub fn zeros(space: IndexSpace) -> Self {
        let data = vec![0.0; space.len()];
        Self { space, data }
    }


    /**
     * Return the index space covered by this field.
     */
    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }


    /**
     * Return the backing data, in row-major order.
     */
    pub fn data(&self) -> &[f64] {
        &self.data
    }


    pub fn get(&self, index: (i64, i64, i64)) -> f64 {
        self.validate_index(index);
        self.data[self.space.row_major_offset(index)]
    }


    pub fn get_mut(&mut self, index: (i64, i64, i64)) -> &mut f64 {
        self.validate_index(index);
        let n = self.space.row_major_offset(index);
        &mut self.data[n]
    }


    /**
     * Iterate over index-value pairs in row-major order.
     */
    pub fn iter(&self) -> impl Iterator<Item = ((i64, i64, i64), f64)> + '_ {
        self.space.iter().zip(self.data.iter().cloned())
    }


    /**
     * Return a new field with values copied from this one over a subset of
     * its index space.
     */
    pub fn extract(&self, subspace: IndexSpace) -> Self {
        assert!(
            self.space.contains_space(&subspace),
            "cannot extract {:?} from field on {:?}", subspace, self.space);
        Self::from_function(subspace, |index| self.get(index))
    }


    /**
     * Copy the values of another field into this one, where the two overlap.
     * The `offset` is added to the source indexes before they are written
     * here, which is how periodic images are placed into guard zones.
     */
    pub fn insert(&mut self, source: &Field, offset: (i64, i64, i64)) {
        for ((i, j, k), value) in source.iter() {
            let target = (i + offset.0, j + offset.1, k + offset.2);
            if self.space.contains(target) {
                *self.get_mut(target) = value;
            }
        }
    }


    fn validate_index(&self, index: (i64, i64, i64)) {
        if !self.space.contains(index) {
            let (i0, j0, k0) = self.space.start();
            let (i1, j1, k1) = self.space.end();
            panic!("index ({} {} {}) out of range on field ({}..{} {}..{} {}..{})",
                index.0,
                index.1,
                index.2,
                i0, i1,
                j0, j1,
                k0, k1);
        }
    }
}
