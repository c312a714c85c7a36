use labut::utilities::simulation::{
    ScissionModel, SimulationOptions, crack_molecules, make_chain, mass_distribution,
    molecule_mass, random_scission, remove_short_molecules, simulate, status,
};
use rand::{SeedableRng, rngs::StdRng};

mod helpers;
use helpers::approx_eq;

fn small(model: ScissionModel) -> SimulationOptions {
    SimulationOptions {
        chain_length: 40,
        monomer_mass: 14,
        n_molecules: 10,
        min_length: 70,
        steps: 40,
        seed: 7,
        record_every: 10,
        model,
    }
}

#[test]
fn chain_layout() {
    assert_eq!(make_chain(3, 14), vec![14, 0, 14, 0, 14]);
    assert_eq!(molecule_mass(&make_chain(3, 14)), 42);
}

// one scission keeps the mass and adds one molecule
#[test]
fn cracking_conserves_mass() {
    let mut reactor = vec![make_chain(50, 14), make_chain(20, 14)];
    let before = status(&reactor);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        assert!(crack_molecules(&mut reactor, random_scission, &mut rng).unwrap());
    }
    let after = status(&reactor);
    assert_eq!(after.count, before.count + 10);
    assert_eq!(after.mass, before.mass);
    assert!(after.mn < before.mn);
}

#[test]
fn wrong_weight_count_is_an_error() {
    let mut reactor = vec![make_chain(5, 14)];
    let mut rng = StdRng::seed_from_u64(3);
    assert!(crack_molecules(&mut reactor, |_| vec![1.0], &mut rng).is_err());
}

#[test]
fn short_molecules_leave_as_products() {
    let reactor = vec![vec![14, 0, 14], vec![14; 10], vec![28]];
    let (products, remains) = remove_short_molecules(reactor, 28);
    assert_eq!(products, vec![vec![14, 0, 14], vec![28]]);
    assert_eq!(remains.len(), 1);
}

#[test]
fn status_of_empty_list() {
    let s = status(&[]);
    assert_eq!(s.count, 0);
    assert_eq!(s.mass, 0);
    assert_eq!(s.mn, 0.0);
}

// same seed, same run; total mass is conserved across reactor and products
#[test]
fn seeded_runs_repeat() {
    let a = simulate(Some(small(ScissionModel::Random))).unwrap();
    let b = simulate(Some(small(ScissionModel::Random))).unwrap();
    assert_eq!(a.reactor, b.reactor);
    assert_eq!(a.products, b.products);

    let total = status(&a.reactor).mass + status(&a.products).mass;
    assert_eq!(total, 10 * 40 * 14);
    assert!(a.products.iter().all(|m| molecule_mass(m) <= 70));
    let steps: Vec<usize> = a.snapshots.iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![0, 10, 20, 30, 40]);
}

// the run stops once every bond is broken
#[test]
fn stops_when_no_bonds_remain() {
    let opts = SimulationOptions {
        chain_length: 20,
        n_molecules: 5,
        min_length: 0,
        steps: 1000,
        record_every: 100,
        ..SimulationOptions::default()
    };
    let res = simulate(Some(opts)).unwrap();
    assert_eq!(res.reactor.len(), 100);
    assert_eq!(res.snapshots.last().unwrap().step, 96);
    assert!(approx_eq(res.snapshots.last().unwrap().reactor.mn, 14.0, 1e-12));
}

// end-chain scission makes small products faster than mid-chain scission
#[test]
fn end_chain_yields_more_products() {
    let end = simulate(Some(small(ScissionModel::EndChain { decay: 1.0 }))).unwrap();
    let mid = simulate(Some(small(ScissionModel::MidChain { width: 0.1 }))).unwrap();
    assert!(end.products.len() > mid.products.len());
    let dist = mass_distribution(&end.products);
    assert_eq!(dist.values().sum::<usize>(), end.products.len());
}

#[test]
fn zero_monomer_mass_is_rejected() {
    let opts = SimulationOptions {
        monomer_mass: 0,
        ..SimulationOptions::default()
    };
    assert!(simulate(Some(opts)).is_err());
}
