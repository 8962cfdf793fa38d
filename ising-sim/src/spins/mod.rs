pub mod energy;
pub mod state;

pub use state::IsingLattice;
