mod chain;
mod clip;
mod curve;
mod mixer;
mod navigator;
mod track;

pub use chain::*;
pub use clip::*;
pub use mixer::*;
pub use navigator::*;
pub use track::*;
