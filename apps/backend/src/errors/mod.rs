pub mod domain;

pub use domain::DraftError;
