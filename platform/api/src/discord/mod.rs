mod stats;
mod webhook;

pub use stats::*;
pub use webhook::*;
