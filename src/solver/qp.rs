//! QP assembly: builds the matrices (P, q, A, b) and cone layout
//! required by Clarabel.
//!
//! Constraints are collected by kind and emitted in Clarabel's required
//! row order: zero cone (equalities), then nonnegative cone
//! (inequalities), then second-order cones.

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;

use crate::sparse::{csc_from_triplets, upper_triangle_csc};

/// Cone layout for Clarabel, in row order.
#[derive(Debug, Clone, Default)]
pub struct ConeLayout {
    /// Number of zero cone (equality) rows.
    pub zero: usize,
    /// Number of nonnegative cone rows.
    pub nonneg: usize,
    /// Second-order cone dimensions (each entry is one cone).
    pub soc: Vec<usize>,
}

impl ConeLayout {
    /// Total number of constraint rows.
    pub fn rows(&self) -> usize {
        self.zero + self.nonneg + self.soc.iter().sum::<usize>()
    }
}

/// A sparse constraint row: (variable index, coefficient) terms.
type Row = Vec<(usize, f64)>;

/// One second-order cone block: `||rows * x|| <= bound`.
struct SocBlock {
    bound: f64,
    rows: Vec<Row>,
}

/// Stuffed problem ready for Clarabel.
#[derive(Debug)]
pub struct QpProblem {
    /// Quadratic cost matrix P (n x n, upper triangle), in Clarabel's
    /// `(1/2) x' P x + q' x` convention.
    pub p: CscMatrix<f64>,
    /// Linear cost vector q (n).
    pub q: Vec<f64>,
    /// Constraint matrix A (m x n).
    pub a: CscMatrix<f64>,
    /// Constraint vector b (m).
    pub b: Vec<f64>,
    /// Cone layout matching the rows of A.
    pub cones: ConeLayout,
}

/// Incremental builder for a conic QP over a single decision vector.
pub struct QpBuilder {
    num_vars: usize,
    p: Option<DMatrix<f64>>,
    q: Vec<f64>,
    equalities: Vec<(Row, f64)>,
    inequalities: Vec<(Row, f64)>,
    socs: Vec<SocBlock>,
}

impl QpBuilder {
    /// Start a problem over `num_vars` decision variables.
    pub fn new(num_vars: usize) -> Self {
        QpBuilder {
            num_vars,
            p: None,
            q: vec![0.0; num_vars],
            equalities: Vec::new(),
            inequalities: Vec::new(),
            socs: Vec::new(),
        }
    }

    /// Set the quadratic cost `(1/2) x' P x`.
    ///
    /// P must be symmetric; only its upper triangle is passed to the
    /// solver.
    pub fn quadratic_cost(&mut self, p: DMatrix<f64>) -> &mut Self {
        self.p = Some(p);
        self
    }

    /// Set the linear cost `q' x`.
    pub fn linear_cost(&mut self, q: &[f64]) -> &mut Self {
        self.q[..q.len()].copy_from_slice(q);
        self
    }

    /// Add an equality constraint `sum(coeff_i * x_i) == rhs`.
    pub fn equality(&mut self, terms: &[(usize, f64)], rhs: f64) -> &mut Self {
        self.equalities.push((terms.to_vec(), rhs));
        self
    }

    /// Add an inequality constraint `sum(coeff_i * x_i) <= rhs`.
    pub fn less_equal(&mut self, terms: &[(usize, f64)], rhs: f64) -> &mut Self {
        self.inequalities.push((terms.to_vec(), rhs));
        self
    }

    /// Bound every variable in `lo <= x_i <= hi`.
    pub fn box_bounds(&mut self, lo: f64, hi: f64) -> &mut Self {
        for i in 0..self.num_vars {
            self.less_equal(&[(i, 1.0)], hi);
            self.less_equal(&[(i, -1.0)], -lo);
        }
        self
    }

    /// Add a second-order cone constraint `||rows * x||_2 <= bound`.
    ///
    /// Each entry of `rows` is one coordinate of the vector inside the
    /// norm, given as sparse (index, coefficient) terms.
    pub fn second_order(&mut self, bound: f64, rows: Vec<Vec<(usize, f64)>>) -> &mut Self {
        self.socs.push(SocBlock { bound, rows });
        self
    }

    /// Assemble A, b, P, q and the cone layout.
    ///
    /// Clarabel's constraint form is `A x + s = b` with `s` in the cone
    /// product, so equalities stuff rows as-is (s = 0), inequalities
    /// stuff `a x <= b` directly (s >= 0), and each SOC block becomes
    /// `s = [bound; rows * x]` via negated coefficient rows.
    pub fn build(self) -> QpProblem {
        let n = self.num_vars;

        let cones = ConeLayout {
            zero: self.equalities.len(),
            nonneg: self.inequalities.len(),
            soc: self.socs.iter().map(|s| 1 + s.rows.len()).collect(),
        };

        let mut triplets = Vec::new();
        let mut b = vec![0.0; cones.rows()];
        let mut row = 0;

        for (terms, rhs) in &self.equalities {
            for &(col, val) in terms {
                triplets.push((row, col, val));
            }
            b[row] = *rhs;
            row += 1;
        }

        for (terms, rhs) in &self.inequalities {
            for &(col, val) in terms {
                triplets.push((row, col, val));
            }
            b[row] = *rhs;
            row += 1;
        }

        for block in &self.socs {
            // Leading row carries the constant bound: s_0 = bound.
            b[row] = block.bound;
            row += 1;
            // Remaining rows: s_k = (rows * x)_k, so A_k = -rows_k, b_k = 0.
            for terms in &block.rows {
                for &(col, val) in terms {
                    triplets.push((row, col, -val));
                }
                row += 1;
            }
        }

        let a = csc_from_triplets(cones.rows(), n, &triplets);

        let p = match &self.p {
            Some(dense) => upper_triangle_csc(dense),
            None => CscMatrix::zeros(n, n),
        };

        QpProblem {
            p,
            q: self.q,
            a,
            b,
            cones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_layout_rows() {
        let layout = ConeLayout {
            zero: 2,
            nonneg: 3,
            soc: vec![4, 5],
        };
        assert_eq!(layout.rows(), 14);
    }

    #[test]
    fn test_build_orders_cones() {
        let mut builder = QpBuilder::new(2);
        builder.second_order(1.0, vec![vec![(0, 1.0)], vec![(1, 1.0)]]);
        builder.less_equal(&[(0, 1.0)], 5.0);
        builder.equality(&[(0, 1.0), (1, 1.0)], 1.0);
        let problem = builder.build();

        assert_eq!(problem.cones.zero, 1);
        assert_eq!(problem.cones.nonneg, 1);
        assert_eq!(problem.cones.soc, vec![3]);
        // Equality row first, then the inequality, then the cone bound.
        assert_eq!(problem.b[0], 1.0);
        assert_eq!(problem.b[1], 5.0);
        assert_eq!(problem.b[2], 1.0);
        assert_eq!(problem.a.nrows(), 5);
    }

    #[test]
    fn test_build_without_quadratic_cost() {
        let mut builder = QpBuilder::new(3);
        builder.linear_cost(&[1.0, 2.0, 3.0]);
        let problem = builder.build();
        assert_eq!(problem.p.nnz(), 0);
        assert_eq!(problem.q, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_box_bounds_row_count() {
        let mut builder = QpBuilder::new(4);
        builder.box_bounds(0.0, 1.0);
        let problem = builder.build();
        assert_eq!(problem.cones.nonneg, 8);
    }
}
