pub mod domain;
pub mod error;
pub mod export;
pub mod kegg;
