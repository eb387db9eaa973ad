//! N-dimensional indexing over a flat contiguous store (component A).
//!
//! A [`Shape`] describes the rank and extent of a user-facing array of model elements
//! (variables, expressions, or constraints); a [`MultiArray`] owns the flat value/name
//! storage and converts between multi-indices and flat offsets.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultiArrayError {
    #[error("index rank {given} does not match declared rank {expected}")]
    RankMismatch { expected: usize, given: usize },
    #[error("index {index} is out of range for extent {extent} on axis {axis}")]
    OutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },
    #[error("operation requires a singleton (rank-0) array, found rank {rank}")]
    NotSingleton { rank: usize },
}

/// Row-major shape descriptor with precomputed strides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    extents: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl Shape {
    pub fn new(extents: Vec<usize>) -> Self {
        let mut strides = vec![0usize; extents.len()];
        let mut acc = 1usize;
        for axis in (0..extents.len()).rev() {
            strides[axis] = acc;
            acc *= extents[axis].max(1);
        }
        let len = extents.iter().product::<usize>().max(if extents.is_empty() { 1 } else { 0 });
        Shape {
            extents,
            strides,
            len,
        }
    }

    pub fn scalar() -> Self {
        Shape::new(vec![])
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn flat(&self, index: &[usize]) -> Result<usize, MultiArrayError> {
        if index.len() != self.extents.len() {
            return Err(MultiArrayError::RankMismatch {
                expected: self.extents.len(),
                given: index.len(),
            });
        }
        let mut flat = 0usize;
        for (axis, (&i, &extent)) in index.iter().zip(self.extents.iter()).enumerate() {
            if i >= extent {
                return Err(MultiArrayError::OutOfRange {
                    axis,
                    index: i,
                    extent,
                });
            }
            flat += i * self.strides[axis];
        }
        Ok(flat)
    }

    pub fn unflat(&self, mut flat: usize) -> Vec<usize> {
        let mut index = vec![0usize; self.extents.len()];
        for axis in 0..self.extents.len() {
            index[axis] = flat / self.strides[axis];
            flat %= self.strides[axis];
        }
        index
    }
}

/// A contiguous array of model-element handles addressed by [`Shape`], each carrying
/// a generated display name (`{prefix}[{i0},{i1},...]`, or bare `prefix` when scalar).
#[derive(Debug, Clone)]
pub struct MultiArray<T> {
    shape: Shape,
    prefix: String,
    values: Vec<T>,
}

impl<T: Clone> MultiArray<T> {
    pub fn new(prefix: impl Into<String>, shape: Shape, fill: T) -> Self {
        let len = shape.len();
        MultiArray {
            shape,
            prefix: prefix.into(),
            values: vec![fill; len],
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn name_at(&self, flat: usize) -> String {
        if self.shape.rank() == 0 {
            return self.prefix.clone();
        }
        let idx = self.shape.unflat(flat);
        let joined = idx
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}[{}]", self.prefix, joined)
    }

    pub fn get(&self, index: &[usize]) -> Result<&T, MultiArrayError> {
        let flat = self.shape.flat(index)?;
        Ok(&self.values[flat])
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Result<&mut T, MultiArrayError> {
        let flat = self.shape.flat(index)?;
        Ok(&mut self.values[flat])
    }

    pub fn as_scalar(&self) -> Result<&T, MultiArrayError> {
        if self.shape.rank() != 0 {
            return Err(MultiArrayError::NotSingleton {
                rank: self.shape.rank(),
            });
        }
        Ok(&self.values[0])
    }

    pub fn fill(&mut self, value: T) {
        for v in self.values.iter_mut() {
            *v = value.clone();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_unflat_roundtrip() {
        let shape = Shape::new(vec![3, 4, 2]);
        for flat in 0..shape.len() {
            let idx = shape.unflat(flat);
            assert_eq!(shape.flat(&idx).unwrap(), flat);
        }
    }

    #[test]
    fn rank_mismatch_is_rejected() {
        let shape = Shape::new(vec![3, 4]);
        assert_eq!(
            shape.flat(&[1]),
            Err(MultiArrayError::RankMismatch {
                expected: 2,
                given: 1
            })
        );
    }

    #[test]
    fn scalar_access() {
        let arr = MultiArray::new("x", Shape::scalar(), 7i64);
        assert_eq!(*arr.as_scalar().unwrap(), 7);
        assert_eq!(arr.name_at(0), "x");
    }

    #[test]
    fn named_cells_use_multi_index() {
        let arr = MultiArray::new("y", Shape::new(vec![2, 2]), 0i64);
        assert_eq!(arr.name_at(1), "y[0,1]");
        assert_eq!(arr.name_at(2), "y[1,0]");
    }
}
