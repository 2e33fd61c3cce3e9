use std::collections::BTreeSet;

/// A sparse boolean matrix, represented as one sorted set of column indices
/// per row.
///
/// `nnz()` is authoritative for detecting fixed points in the closure loops
/// throughout this crate: callers repeat `c = c + c @ c` (or similar) until
/// `nnz` stops growing, never by comparing matrix contents directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolMatrix {
    rows: usize,
    cols: usize,
    data: Vec<BTreeSet<usize>>,
}

impl BoolMatrix {
    /// Creates a new, all-zero `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        BoolMatrix {
            rows,
            cols,
            data: vec![BTreeSet::new(); rows],
        }
    }

    /// Builds the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = BoolMatrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i);
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Reads the entry at `(i, j)`.
    ///
    /// # Panics
    /// If `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> bool {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i].contains(&j)
    }

    /// Sets the entry at `(i, j)` to `true`.
    ///
    /// # Panics
    /// If `i` or `j` is out of bounds.
    pub fn set(&mut self, i: usize, j: usize) {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i].insert(j);
    }

    /// Number of true entries.
    pub fn nnz(&self) -> usize {
        self.data.iter().map(BTreeSet::len).sum()
    }

    /// Iterates nonzero `(row, col)` coordinates in row-major order.
    pub fn nonzeros(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.data
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().map(move |&j| (i, j)))
    }

    /// The set of nonzero columns in row `i`.
    pub fn row(&self, i: usize) -> &BTreeSet<usize> {
        &self.data[i]
    }

    /// Elementwise OR. Shapes must match — a shape mismatch here is an
    /// internal bug, not a user-facing error.
    pub fn or(&self, other: &BoolMatrix) -> BoolMatrix {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "shape mismatch in BoolMatrix::or"
        );
        let mut out = self.clone();
        out.or_assign(other);
        out
    }

    /// In-place elementwise OR.
    pub fn or_assign(&mut self, other: &BoolMatrix) {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "shape mismatch in BoolMatrix::or_assign"
        );
        for (row, other_row) in self.data.iter_mut().zip(other.data.iter()) {
            row.extend(other_row.iter().copied());
        }
    }

    /// Boolean matrix product: `self` is `m x k`, `other` is `k x n`, result
    /// is `m x n`.
    pub fn matmul(&self, other: &BoolMatrix) -> BoolMatrix {
        assert_eq!(
            self.cols, other.rows,
            "shape mismatch in BoolMatrix::matmul"
        );
        let mut out = BoolMatrix::zeros(self.rows, other.cols);
        for (i, row) in self.data.iter().enumerate() {
            for &k in row {
                for &j in &other.data[k] {
                    out.data[i].insert(j);
                }
            }
        }
        out
    }

    /// Kronecker product: `(a.rows*b.rows) x (a.cols*b.cols)`, with
    /// `(i1*b.rows + i2, j1*b.cols + j2) = a[i1,j1] && b[i2,j2]`.
    pub fn kron(&self, other: &BoolMatrix) -> BoolMatrix {
        let mut out = BoolMatrix::zeros(self.rows * other.rows, self.cols * other.cols);
        for (i1, row1) in self.data.iter().enumerate() {
            for &j1 in row1 {
                for (i2, row2) in other.data.iter().enumerate() {
                    for &j2 in row2 {
                        out.set(i1 * other.rows + i2, j1 * other.cols + j2);
                    }
                }
            }
        }
        out
    }

    /// Square block-diagonal combination of the given matrices, in order.
    pub fn block_diag(blocks: &[BoolMatrix]) -> BoolMatrix {
        let n: usize = blocks.iter().map(|b| b.rows).sum();
        let mut out = BoolMatrix::zeros(n, n);
        let mut offset = 0;
        for block in blocks {
            assert_eq!(block.rows, block.cols, "block_diag requires square blocks");
            for (i, j) in block.nonzeros() {
                out.set(offset + i, offset + j);
            }
            offset += block.rows;
        }
        out
    }

    /// Repeatedly replaces `self` with `self + self @ self` until `nnz`
    /// stops growing, returning the transitive closure.
    pub fn transitive_closure(&self) -> BoolMatrix {
        assert_eq!(self.rows, self.cols, "transitive_closure requires a square matrix");
        let mut closure = self.clone();
        loop {
            let before = closure.nnz();
            let squared = closure.matmul(&closure);
            closure.or_assign(&squared);
            if closure.nnz() == before {
                break;
            }
        }
        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_diagonal_entries_only() {
        let id = BoolMatrix::identity(3);
        assert_eq!(id.nnz(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(id.get(i, j), i == j);
            }
        }
    }

    #[test]
    fn or_unions_entries() {
        let mut a = BoolMatrix::zeros(2, 2);
        a.set(0, 0);
        let mut b = BoolMatrix::zeros(2, 2);
        b.set(1, 1);
        let c = a.or(&b);
        assert_eq!(c.nnz(), 2);
        assert!(c.get(0, 0));
        assert!(c.get(1, 1));
    }

    #[test]
    fn matmul_computes_boolean_path_composition() {
        // 0 -> 1 -> 2
        let mut a = BoolMatrix::zeros(3, 3);
        a.set(0, 1);
        let mut b = BoolMatrix::zeros(3, 3);
        b.set(1, 2);
        let c = a.matmul(&b);
        assert!(c.get(0, 2));
        assert_eq!(c.nnz(), 1);
    }

    #[test]
    fn kron_shape_and_entries() {
        let mut a = BoolMatrix::zeros(2, 2);
        a.set(0, 1);
        let mut b = BoolMatrix::zeros(2, 2);
        b.set(1, 0);
        let k = a.kron(&b);
        assert_eq!((k.rows(), k.cols()), (4, 4));
        // a[0,1] && b[1,0] -> (0*2+1, 1*2+0) = (1, 2)
        assert!(k.get(1, 2));
        assert_eq!(k.nnz(), 1);
    }

    #[test]
    fn block_diag_keeps_blocks_isolated() {
        let mut a = BoolMatrix::zeros(2, 2);
        a.set(0, 1);
        let mut b = BoolMatrix::zeros(2, 2);
        b.set(1, 0);
        let d = BoolMatrix::block_diag(&[a, b]);
        assert_eq!((d.rows(), d.cols()), (4, 4));
        assert!(d.get(0, 1));
        assert!(d.get(3, 2));
        assert_eq!(d.nnz(), 2);
    }

    #[test]
    fn transitive_closure_on_cycle_plus_tail() {
        // spec fixture: 0->1->2->0, 3->2
        let mut m = BoolMatrix::zeros(4, 4);
        m.set(0, 1);
        m.set(1, 2);
        m.set(2, 0);
        m.set(3, 2);
        let tc = m.transitive_closure();
        for i in 0..4 {
            for j in 0..3 {
                assert!(tc.get(i, j), "expected reachability {i} -> {j}");
            }
            assert!(!tc.get(i, 3), "vertex 3 should be unreachable from {i}");
        }
    }
}
