use serde::{Deserialize, Serialize};

use crate::utilities::simulation::cracking::bond_positions;

/// Every bond equally likely.
pub fn random_scission(m: &[u8]) -> Vec<f64> {
    vec![1.0; bond_positions(m).len()]
}

/// Bonds near either chain end preferred, weight `exp(-decay * d)` with `d`
/// the bond's distance (in bonds) to the nearer end.
pub fn end_chain_scission(decay: f64) -> impl Fn(&[u8]) -> Vec<f64> {
    move |m| {
        let n = bond_positions(m).len();
        (0..n)
            .map(|i| {
                let d = i.min(n - 1 - i) as f64;
                (-decay * d).exp()
            })
            .collect()
    }
}

/// Bonds near the middle preferred: Gaussian in bond index with standard
/// deviation `width` times the bond count.
pub fn mid_chain_scission(width: f64) -> impl Fn(&[u8]) -> Vec<f64> {
    move |m| {
        let n = bond_positions(m).len();
        let centre = (n as f64 - 1.0) / 2.0;
        let sigma = (width * n as f64).max(f64::MIN_POSITIVE);
        (0..n)
            .map(|i| (-(i as f64 - centre).powi(2) / (2.0 * sigma * sigma)).exp())
            .map(|w| w.max(1e-300))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScissionModel {
    #[default]
    Random,
    EndChain { decay: f64 },
    MidChain { width: f64 },
}

impl ScissionModel {
    pub fn weights(&self, m: &[u8]) -> Vec<f64> {
        match *self {
            ScissionModel::Random => random_scission(m),
            ScissionModel::EndChain { decay } => end_chain_scission(decay)(m),
            ScissionModel::MidChain { width } => mid_chain_scission(width)(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_chain_prefers_ends() {
        let m = [1, 0, 1, 0, 1, 0, 1, 0, 1];
        let w = end_chain_scission(1.0)(&m);
        assert_eq!(w.len(), 4);
        assert!(w[0] > w[1]);
        assert!((w[0] - w[3]).abs() < 1e-12);
    }

    #[test]
    fn mid_chain_prefers_centre() {
        let m = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        let w = mid_chain_scission(0.2)(&m);
        assert!(w[2] > w[0]);
        assert!(w[2] > w[4]);
    }
}
