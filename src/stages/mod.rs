pub mod pipeline;
pub mod stage0_store;
pub mod stage1_expand;
pub mod stage2_resolve;
pub mod stage3_aggregate;
pub mod stage4_assemble;

pub use pipeline::*;
pub use stage0_store::*;
pub use stage1_expand::*;
pub use stage2_resolve::*;
pub use stage3_aggregate::*;
pub use stage4_assemble::*;
