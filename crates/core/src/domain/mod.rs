pub mod material;
pub mod measurement;
pub mod quote;
pub mod spec;
