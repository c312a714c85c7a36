use rand::{Rng, distributions::WeightedIndex, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::utilities::errors::{LabError, Result};

/// Chain of units: `BOND` marks a breakable bond, any other value is the mass
/// of a monomer unit.
pub type Molecule = Vec<u8>;

pub const BOND: u8 = 0;

pub fn bond_positions(m: &[u8]) -> Vec<usize> {
    m.iter()
        .enumerate()
        .filter(|(_, u)| **u == BOND)
        .map(|(i, _)| i)
        .collect()
}

#[inline]
pub fn molecule_mass(m: &[u8]) -> u64 {
    m.iter().map(|u| *u as u64).sum()
}

/// Breaks one bond in the reactor.
///
/// A molecule is drawn with weight equal to its bond count, then one of its
/// bonds with the weights returned by `model`. The part after the bond takes
/// the molecule's place and the part before it is appended. Returns `false`
/// when no bond is left.
pub fn crack_molecules<F, R>(reactor: &mut Vec<Molecule>, model: F, rng: &mut R) -> Result<bool>
where
    F: Fn(&[u8]) -> Vec<f64>,
    R: Rng + ?Sized,
{
    let counts: Vec<usize> = reactor.iter().map(|m| bond_positions(m).len()).collect();
    if counts.iter().all(|c| *c == 0) {
        return Ok(false);
    }
    let pick = WeightedIndex::new(&counts)
        .map_err(|e| LabError::invalid(format!("molecule weights: {e}")))?;
    let idx = pick.sample(rng);

    let bonds = bond_positions(&reactor[idx]);
    let weights = model(&reactor[idx]);
    if weights.len() != bonds.len() {
        return Err(LabError::invalid(format!(
            "scission model returned {} weights for {} bonds",
            weights.len(),
            bonds.len()
        )));
    }
    let bond = WeightedIndex::new(&weights)
        .map_err(|e| LabError::invalid(format!("scission weights: {e}")))?;
    let at = bonds[bond.sample(rng)];

    let before = reactor[idx][..at].to_vec();
    let after = reactor[idx][at + 1..].to_vec();
    reactor[idx] = after;
    reactor.push(before);
    Ok(true)
}

/// Splits the reactor into molecules with mass `<= min_length` and the rest.
pub fn remove_short_molecules(
    reactor: Vec<Molecule>,
    min_length: u64,
) -> (Vec<Molecule>, Vec<Molecule>) {
    reactor
        .into_iter()
        .partition(|m| molecule_mass(m) <= min_length)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub count: usize,
    pub mass: u64,
    /// Number-average mass, 0 for an empty list.
    pub mn: f64,
}

pub fn status(molecules: &[Molecule]) -> Status {
    let count = molecules.len();
    let mass: u64 = molecules.iter().map(|m| molecule_mass(m)).sum();
    let mn = if count == 0 {
        0.0
    } else {
        mass as f64 / count as f64
    };
    Status { count, mass, mn }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn splits_at_the_only_bond() {
        let mut reactor = vec![vec![14, 14, 0, 14]];
        let mut rng = StdRng::seed_from_u64(1);
        let cracked =
            crack_molecules(&mut reactor, |m| vec![1.0; bond_positions(m).len()], &mut rng)
                .unwrap();
        assert!(cracked);
        assert_eq!(reactor, vec![vec![14], vec![14, 14]]);
    }

    #[test]
    fn no_bonds_is_a_no_op() {
        let mut reactor = vec![vec![14, 14], vec![28]];
        let mut rng = StdRng::seed_from_u64(1);
        let cracked = crack_molecules(&mut reactor, |_| Vec::new(), &mut rng).unwrap();
        assert!(!cracked);
        assert_eq!(reactor.len(), 2);
    }
}
