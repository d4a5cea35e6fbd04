pub mod annotation;
pub mod graph;
pub mod report;
pub mod transcript;
pub mod turn;

pub use annotation::*;
pub use graph::*;
pub use report::*;
pub use transcript::*;
pub use turn::*;
