pub mod dsl;
pub mod gaps;
pub mod model;
