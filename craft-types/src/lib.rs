pub mod feature;
pub mod plan;
pub mod decision;

pub use feature::*;
pub use plan::*;
pub use decision::*;
