pub mod cracking;
pub use cracking::{
    BOND, Molecule, Status, bond_positions, crack_molecules, molecule_mass,
    remove_short_molecules, status,
};

pub mod models;
pub use models::{ScissionModel, end_chain_scission, mid_chain_scission, random_scission};

pub mod run;
pub use run::{
    SimulationOptions, SimulationResult, Snapshot, make_chain, mass_distribution, simulate,
};
