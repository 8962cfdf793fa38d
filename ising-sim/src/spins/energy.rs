use crate::geometry::Lattice;

/// Sum of the `2 * n_dims` neighbor spins of site `i`.
#[inline]
pub fn local_field(lattice: &Lattice, spins: &[i8], i: usize) -> i32 {
    let mut h = 0i32;
    for d in 0..lattice.n_dims {
        h += spins[lattice.neighbor_fwd(i, d)] as i32;
        h += spins[lattice.neighbor_bwd(i, d)] as i32;
    }
    h
}

/// `sum_i sum_d s_i * s_fwd(i, d)`: every nearest-neighbor bond exactly once.
///
/// The Hamiltonian is `-J` times this value.
pub fn bond_sum(lattice: &Lattice, spins: &[i8]) -> i64 {
    let mut total = 0i64;
    for i in 0..lattice.n_spins {
        let si = spins[i] as i64;
        for d in 0..lattice.n_dims {
            total += si * spins[lattice.neighbor_fwd(i, d)] as i64;
        }
    }
    total
}

/// Mean spin, in `[-1, 1]`.
pub fn magnetization(spins: &[i8]) -> f64 {
    let sum: i64 = spins.iter().map(|&s| s as i64).sum();
    sum as f64 / spins.len() as f64
}
