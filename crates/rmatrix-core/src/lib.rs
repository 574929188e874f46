pub mod common;
pub mod domain;
pub mod endf;
pub mod numerics;
pub mod rmatrix;
