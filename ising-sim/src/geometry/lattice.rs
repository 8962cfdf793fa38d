use super::offsets::hypercubic;
use crate::error::{IsingError, Result};

/// Periodic hypercubic lattice with a precomputed neighbor table.
///
/// Sites are addressed by a single linear index in mixed-radix order with
/// axis 0 varying fastest: `index = sum_k coords[k] * strides[k]`.
#[derive(Debug, Clone)]
pub struct Lattice {
    /// Extent along each axis (e.g. `[10, 10]`).
    pub shape: Vec<usize>,
    /// Mixed-radix strides: `strides[0] = 1`, `strides[k] = strides[k-1] * shape[k-1]`.
    pub strides: Vec<usize>,
    /// Total number of sites (`shape.iter().product()`).
    pub n_spins: usize,
    /// Number of axes (`shape.len()`).
    pub n_dims: usize,
    /// Layout: `neighbors[(i * n_dims + d) * 2 + dir]` where `dir = 0` is
    /// forward and `dir = 1` is backward along axis `d`.
    neighbors: Vec<u32>,
    /// Even-parity sites followed by odd-parity sites. `None` when some axis
    /// has odd length, since the wraparound bond then joins equal parities.
    checkerboard: Option<Vec<u32>>,
}

impl Lattice {
    /// Create a periodic lattice with the given shape (e.g. `vec![16, 16]`).
    pub fn new(shape: Vec<usize>) -> Result<Self> {
        let n_dims = shape.len();
        if n_dims == 0 {
            return Err(IsingError::InvalidShape(
                "shape must have at least one axis".to_string(),
            ));
        }
        if let Some(d) = shape.iter().position(|&l| l == 0) {
            return Err(IsingError::InvalidShape(format!("axis {d} has size 0")));
        }
        let n_spins = shape
            .iter()
            .try_fold(1usize, |acc, &l| acc.checked_mul(l))
            .filter(|&n| n <= u32::MAX as usize)
            .ok_or_else(|| {
                IsingError::InvalidShape(format!("{shape:?} has too many sites"))
            })?;
        let table_len = n_spins
            .checked_mul(n_dims * 2)
            .ok_or_else(|| IsingError::InvalidShape(format!("{shape:?} has too many sites")))?;

        let mut strides = vec![1usize; n_dims];
        for d in 1..n_dims {
            strides[d] = strides[d - 1] * shape[d - 1];
        }

        let offsets = hypercubic(n_dims);
        let mut neighbors = vec![0u32; table_len];

        for i in 0..n_spins {
            let coords: Vec<usize> = (0..n_dims).map(|d| (i / strides[d]) % shape[d]).collect();

            for (d, off) in offsets.iter().enumerate() {
                for (dir, sign) in [(0, 1isize), (1, -1isize)] {
                    let mut flat = 0usize;
                    for dim in 0..n_dims {
                        let c = (coords[dim] as isize + sign * off[dim])
                            .rem_euclid(shape[dim] as isize)
                            as usize;
                        flat += c * strides[dim];
                    }
                    neighbors[(i * n_dims + d) * 2 + dir] = flat as u32;
                }
            }
        }

        let checkerboard = if shape.iter().all(|&l| l % 2 == 0) {
            let parity = |i: usize| (0..n_dims).map(|d| (i / strides[d]) % shape[d]).sum::<usize>() % 2;
            let (mut even, odd): (Vec<u32>, Vec<u32>) =
                (0..n_spins as u32).partition(|&i| parity(i as usize) == 0);
            even.extend(odd);
            Some(even)
        } else {
            None
        };

        Ok(Self {
            shape,
            strides,
            n_spins,
            n_dims,
            neighbors,
            checkerboard,
        })
    }

    /// Decompose a linear index into per-axis coordinates.
    pub fn coordinates_of(&self, flat_idx: usize) -> Vec<usize> {
        debug_assert!(flat_idx < self.n_spins, "site {flat_idx} out of range");
        self.strides
            .iter()
            .zip(self.shape.iter())
            .map(|(&stride, &len)| (flat_idx / stride) % len)
            .collect()
    }

    /// Encode coordinates into a linear index. Each component is reduced
    /// modulo its axis length.
    pub fn index_of(&self, coords: &[usize]) -> usize {
        assert_eq!(
            coords.len(),
            self.n_dims,
            "coordinates have length {}, expected {}",
            coords.len(),
            self.n_dims,
        );
        coords
            .iter()
            .zip(self.shape.iter().zip(self.strides.iter()))
            .map(|(&c, (&len, &stride))| (c % len) * stride)
            .sum()
    }

    /// Return the neighbor of site `flat_idx` along axis `dim`.
    /// `forward = true` means `+1`, `forward = false` means `-1`.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dim: usize, forward: bool) -> usize {
        self.neighbors[(flat_idx * self.n_dims + dim) * 2 + (!forward as usize)] as usize
    }

    #[inline]
    pub fn neighbor_fwd(&self, flat_idx: usize, dim: usize) -> usize {
        self.neighbor(flat_idx, dim, true)
    }

    #[inline]
    pub fn neighbor_bwd(&self, flat_idx: usize, dim: usize) -> usize {
        self.neighbor(flat_idx, dim, false)
    }

    pub fn checkerboard_order(&self) -> Option<&[u32]> {
        self.checkerboard.as_deref()
    }
}
