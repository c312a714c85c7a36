use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::utilities::{
    errors::{LabError, Result},
    simulation::{
        cracking::{
            BOND, Molecule, Status, crack_molecules, molecule_mass, remove_short_molecules, status,
        },
        models::ScissionModel,
    },
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Monomer units per starting chain.
    pub chain_length: usize,
    pub monomer_mass: u8,
    pub n_molecules: usize,
    /// Molecules with mass at or below this leave the reactor as products.
    pub min_length: u64,
    pub steps: usize,
    pub seed: u64,
    pub record_every: usize,
    pub model: ScissionModel,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            chain_length: 500,
            monomer_mass: 14,
            n_molecules: 50,
            min_length: 280,
            steps: 5000,
            seed: 42,
            record_every: 100,
            model: ScissionModel::Random,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: usize,
    pub reactor: Status,
    pub products: Status,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationResult {
    pub snapshots: Vec<Snapshot>,
    pub reactor: Vec<Molecule>,
    pub products: Vec<Molecule>,
}

/// Linear chain `m 0 m 0 ... m` of `units` monomers.
pub fn make_chain(units: usize, monomer_mass: u8) -> Molecule {
    let mut m = Vec::with_capacity(units.saturating_mul(2).saturating_sub(1));
    for i in 0..units {
        if i > 0 {
            m.push(BOND);
        }
        m.push(monomer_mass);
    }
    m
}

/// Count of molecules per mass.
pub fn mass_distribution(molecules: &[Molecule]) -> BTreeMap<u64, usize> {
    let mut out = BTreeMap::new();
    for m in molecules {
        *out.entry(molecule_mass(m)).or_insert(0) += 1;
    }
    out
}

/// Cracks a reactor of identical chains, moving short molecules to the
/// products after every step. Stops early once no bond is left.
pub fn simulate(options: Option<SimulationOptions>) -> Result<SimulationResult> {
    let o = options.unwrap_or_default();
    if o.monomer_mass == 0 {
        return Err(LabError::invalid("monomer mass must be non-zero"));
    }
    if o.record_every == 0 {
        return Err(LabError::invalid("record_every must be positive"));
    }

    let mut rng = StdRng::seed_from_u64(o.seed);
    let mut reactor: Vec<Molecule> = (0..o.n_molecules)
        .map(|_| make_chain(o.chain_length, o.monomer_mass))
        .collect();
    let mut products: Vec<Molecule> = Vec::new();
    let mut snapshots = vec![Snapshot {
        step: 0,
        reactor: status(&reactor),
        products: status(&products),
    }];

    let model = o.model;
    for step in 1..=o.steps {
        let cracked = crack_molecules(&mut reactor, |m| model.weights(m), &mut rng)?;
        let (short, remains) = remove_short_molecules(reactor, o.min_length);
        products.extend(short);
        reactor = remains;

        if step % o.record_every == 0 || !cracked {
            snapshots.push(Snapshot {
                step,
                reactor: status(&reactor),
                products: status(&products),
            });
            debug!(step, molecules = reactor.len(), products = products.len(), "snapshot");
        }
        if !cracked {
            break;
        }
    }

    info!(
        steps = snapshots.last().map_or(0, |s| s.step),
        reactor = reactor.len(),
        products = products.len(),
        "cracking simulation finished"
    );
    Ok(SimulationResult {
        snapshots,
        reactor,
        products,
    })
}
