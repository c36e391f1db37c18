// Thin re-export module: the unspent-output set lives in `chain/state.rs`,
// the node tree and block admission in `chain/tree.rs`.

pub mod state;
pub mod tree;

pub use state::*;
pub use tree::*;
