pub mod classifier;
pub mod types;

pub use classifier::{classify, normalize};
pub use types::{SlippageResult, SlippageTier};
