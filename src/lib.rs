pub mod matrix;
pub mod solutions;

use anyhow::Result;
use rayon::prelude::*;

pub use solutions::solve;

/// Known chains, each paired with the entry of [`SAMPLE_ANSWERS`] at the same index.
pub const SAMPLE_CHAINS: &[&[&[u32]]] = &[
    &[
        &[0, 1, 0, 0, 0, 1],
        &[4, 0, 0, 3, 2, 0],
        &[0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0],
    ],
    &[
        &[0, 2, 1, 0, 0],
        &[0, 0, 0, 3, 4],
        &[0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0],
    ],
    &[
        &[1, 2, 3, 0, 0, 0],
        &[4, 5, 6, 0, 0, 0],
        &[7, 8, 9, 1, 0, 0],
        &[0, 0, 0, 0, 1, 2],
        &[0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0],
    ],
    &[
        &[0, 86, 61, 189, 0, 18, 12, 33, 66, 39],
        &[0, 0, 2, 0, 0, 1, 0, 0, 0, 0],
        &[15, 187, 0, 0, 18, 23, 0, 0, 0, 0],
        &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ],
    &[
        &[0, 0, 0, 0, 3, 5, 0, 0, 0, 2],
        &[0, 0, 4, 0, 0, 0, 1, 0, 0, 0],
        &[0, 0, 0, 4, 4, 0, 0, 0, 1, 1],
        &[13, 0, 0, 0, 0, 0, 2, 0, 0, 0],
        &[0, 1, 8, 7, 0, 0, 0, 1, 3, 0],
        &[1, 7, 0, 0, 0, 0, 0, 2, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ],
    &[&[0]],
];

pub const SAMPLE_ANSWERS: &[&[u64]] = &[
    &[0, 3, 2, 9, 14],
    &[7, 6, 8, 21],
    &[1, 2, 3],
    &[6, 44, 4, 11, 22, 13, 100],
    &[1, 1, 1, 2, 5],
    &[1, 1],
];

/// Solves independent chains in parallel. Results keep the input order.
pub fn solve_many<M>(chains: &[M]) -> Vec<Result<Vec<u64>>>
where
    M: AsRef<[Vec<u32>]> + Sync,
{
    chains.par_iter().map(|m| solve(m.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_many() -> Result<()> {
        let chains: Vec<Vec<Vec<u32>>> = SAMPLE_CHAINS
            .iter()
            .map(|chain| chain.iter().map(|row| row.to_vec()).collect())
            .collect();

        let results = solve_many(&chains);
        assert_eq!(results.len(), SAMPLE_ANSWERS.len());
        for (ret, &expected) in results.into_iter().zip(SAMPLE_ANSWERS) {
            assert_eq!(ret?, expected);
        }

        let mixed: Vec<Vec<Vec<u32>>> = vec![vec![vec![0]], vec![vec![1, 0], vec![0, 0]]];
        let results = solve_many(&mixed);
        assert_eq!(results[0].as_ref().ok(), Some(&vec![1, 1]));
        assert!(results[1].is_err());
        Ok(())
    }
}
