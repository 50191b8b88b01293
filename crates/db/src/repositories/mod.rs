//! Repository layer.
//!
//! Each repository borrows the connection pool it is constructed with and
//! provides async storage methods. Repositories do no business validation;
//! records arrive already reconciled by the models layer.

pub mod build_repo;
pub mod piece_repo;

pub use build_repo::BuildRepo;
pub use piece_repo::PieceRepo;
