/// Unit displacement along each axis of a hypercubic lattice.
///
/// For `n_dims = 3` this returns `[[1,0,0], [0,1,0], [0,0,1]]`. The backward
/// neighbor along an axis is the negated offset.
pub fn hypercubic(n_dims: usize) -> Vec<Vec<isize>> {
    (0..n_dims)
        .map(|d| {
            let mut v = vec![0isize; n_dims];
            v[d] = 1;
            v
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hypercubic_is_identity() {
        let offs = hypercubic(3);
        assert_eq!(offs, vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]);
        assert!(hypercubic(0).is_empty());
    }
}
