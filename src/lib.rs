pub mod boundaries;
mod aggregate;
mod columns;
mod fips;
mod ioutil;
mod pipeline;
mod progress;
mod registry;
mod resolve;

pub use aggregate::*;
pub use columns::*;
pub use fips::*;
pub use ioutil::*;
pub use pipeline::*;
pub use progress::*;
pub use registry::*;
pub use resolve::*;
