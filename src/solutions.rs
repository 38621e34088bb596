//! Doomsday Fuel: terminal-state probabilities of an absorbing Markov chain.
//!
//! With the transient states `Q` and the terminal states `T`, the canonical form of the
//! normalized matrix is
//!
//! ```text
//!          T    Q
//!     T | I    0 |
//!     Q | A    B |
//! ```
//!
//! and the absorption probabilities are the rows of `F * A` where `F = (I - B)^-1` is the
//! fundamental matrix.

use anyhow::{bail, ensure, Context, Result};
use num::{BigInt, BigRational, Integer, One, ToPrimitive, Zero};
use petgraph::{graph::NodeIndex, visit::Dfs, Graph};
use tracing::debug;

use crate::matrix::{self, Matrix};

/// Returns the probability of ending in each terminal state when starting in state 0, as the
/// numerators (ascending state order) followed by their shared denominator.
pub fn solve<R: AsRef<[u32]>>(m: &[R]) -> Result<Vec<u64>> {
    let n = m.len();
    ensure!(n > 0, "transition matrix is empty");
    for (i, row) in m.iter().enumerate() {
        let len = row.as_ref().len();
        ensure!(
            len == n,
            "transition matrix is not square: row {i} has {len} entries, expected {n}"
        );
    }

    if n == 1 {
        return Ok(vec![1, 1]);
    }

    let (terminal, transient) = partition(m);
    debug!(
        terminal = terminal.len(),
        transient = transient.len(),
        "partitioned states"
    );

    if terminal.first() == Some(&0) {
        // Nothing ever leaves the start state.
        let mut ret: Vec<u64> = terminal.iter().map(|&s| u64::from(s == 0)).collect();
        ret.push(1);
        return Ok(ret);
    }

    check_absorbing(m, &terminal)?;

    let p = normalize(m);
    let b = submatrix(&p, &transient, &transient);
    let a = submatrix(&p, &transient, &terminal);

    let f = matrix::invert(&matrix::subtract(&matrix::identity(transient.len()), &b)?)
        .context("computing the fundamental matrix")?;
    let fa = matrix::multiply(&f, &a)?;

    // State 0 is transient here and transient states are in index order.
    let probabilities = &fa[0];
    common_denominator(probabilities)
}

/// Splits the state indices into (terminal, transient), both ascending.
fn partition<R: AsRef<[u32]>>(m: &[R]) -> (Vec<usize>, Vec<usize>) {
    (0..m.len()).partition(|&i| m[i].as_ref().iter().all(|&x| x == 0))
}

/// Every transient state has to reach a terminal state, otherwise `I - B` is singular. Walks the
/// reversed transition graph from all terminal states.
fn check_absorbing<R: AsRef<[u32]>>(m: &[R], terminal: &[usize]) -> Result<()> {
    let mut graph = Graph::<(), ()>::with_capacity(m.len(), 0);
    let nodes: Vec<NodeIndex> = (0..m.len()).map(|_| graph.add_node(())).collect();
    for (from, row) in m.iter().enumerate() {
        for (to, &count) in row.as_ref().iter().enumerate() {
            if count > 0 && from != to {
                graph.add_edge(nodes[to], nodes[from], ());
            }
        }
    }

    let mut absorbed = vec![false; m.len()];
    let mut dfs = Dfs::empty(&graph);
    for &t in terminal {
        dfs.move_to(nodes[t]);
        while let Some(node) = dfs.next(&graph) {
            absorbed[node.index()] = true;
        }
    }

    if let Some(state) = absorbed.iter().position(|&a| !a) {
        bail!("state {state} has no path to a terminal state");
    }
    Ok(())
}

/// Each non-zero row divided by its sum. Terminal rows stay zero.
fn normalize<R: AsRef<[u32]>>(m: &[R]) -> Matrix {
    m.iter()
        .map(|row| {
            let row = row.as_ref();
            let sum: u64 = row.iter().map(|&x| u64::from(x)).sum();
            row.iter()
                .map(|&x| {
                    if x == 0 {
                        BigRational::zero()
                    } else {
                        BigRational::new(BigInt::from(x), BigInt::from(sum))
                    }
                })
                .collect()
        })
        .collect()
}

fn submatrix(p: &Matrix, rows: &[usize], cols: &[usize]) -> Matrix {
    rows.iter()
        .map(|&i| cols.iter().map(|&j| p[i][j].clone()).collect())
        .collect()
}

fn common_denominator(probabilities: &[BigRational]) -> Result<Vec<u64>> {
    let lcm = probabilities
        .iter()
        .filter(|p| !p.is_zero())
        .fold(BigInt::one(), |acc, p| acc.lcm(p.denom()));
    debug!(%lcm, "common denominator");

    let mut ret = probabilities
        .iter()
        .map(|p| {
            let numer = p.numer() * (&lcm / p.denom());
            numer
                .to_u64()
                .with_context(|| format!("numerator {numer} does not fit in u64"))
        })
        .collect::<Result<Vec<_>>>()?;
    ret.push(
        lcm.to_u64()
            .with_context(|| format!("denominator {lcm} does not fit in u64"))?,
    );
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    fn check_sums(ret: &[u64]) {
        let (denominator, numerators) = ret.split_last().unwrap();
        assert_eq!(numerators.iter().sum::<u64>(), *denominator);
    }

    #[test]
    fn test_single_state() -> Result<()> {
        assert_eq!(solve(&[[0]])?, [1, 1]);
        assert_eq!(solve(&[[5]])?, [1, 1]);
        Ok(())
    }

    #[test]
    fn test_examples() -> Result<()> {
        let m = vec![
            vec![0, 1, 0, 0, 0, 1],
            vec![4, 0, 0, 3, 2, 0],
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0],
        ];
        // s2 is never reached.
        assert_eq!(solve(&m)?, [0, 3, 2, 9, 14]);

        let m = [
            [0, 2, 1, 0, 0],
            [0, 0, 0, 3, 4],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ];
        let ret = solve(&m)?;
        check_sums(&ret);
        assert_eq!(ret, [7, 6, 8, 21]);
        Ok(())
    }

    #[test]
    fn test_sample_chains() -> Result<()> {
        for (&chain, &expected) in SAMPLE_CHAINS.iter().zip(SAMPLE_ANSWERS) {
            let ret = solve(chain)?;
            check_sums(&ret);
            assert_eq!(ret, expected);
        }
        Ok(())
    }

    #[test]
    fn test_self_loops() -> Result<()> {
        assert_eq!(solve(&[[1, 1], [0, 0]])?, [1, 1]);
        assert_eq!(solve(&[[2, 1, 1], [0, 0, 0], [0, 0, 0]])?, [1, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_terminal_start() -> Result<()> {
        assert_eq!(solve(&[[0, 0], [1, 1]])?, [1, 1]);
        assert_eq!(solve(&[[0, 0, 0], [1, 0, 1], [0, 0, 0]])?, [1, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_input_untouched() -> Result<()> {
        let m = vec![vec![0, 2, 1, 0], vec![1, 0, 0, 3], vec![0; 4], vec![0; 4]];
        let copy = m.clone();
        let first = solve(&m)?;
        assert_eq!(m, copy);
        assert_eq!(solve(&m)?, first);
        Ok(())
    }

    #[test]
    fn test_invalid_input() {
        let empty: [[u32; 0]; 0] = [];
        assert!(solve(&empty).is_err());

        let err = solve(&[vec![0, 1], vec![0]]).unwrap_err();
        assert!(err.to_string().contains("not square"));

        let err = solve(&[[1, 0], [0, 0]]).unwrap_err();
        assert!(err.to_string().contains("state 0"));

        // s1 and s2 only trade with each other.
        let err = solve(&[[0, 1, 0, 1], [0, 0, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]]).unwrap_err();
        assert!(err.to_string().contains("state 1"));

        assert!(solve(&[[0, 1], [1, 0]]).is_err());
    }

    #[test]
    fn test_common_denominator() -> Result<()> {
        let frac = |n: i64, d: i64| BigRational::new(n.into(), d.into());
        assert_eq!(
            common_denominator(&[frac(0, 1), frac(3, 14), frac(1, 7), frac(9, 14)])?,
            [0, 3, 2, 9, 14]
        );
        assert_eq!(common_denominator(&[])?, [1]);
        Ok(())
    }
}
