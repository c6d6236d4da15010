pub mod interval;
pub mod rule;
pub mod sample;

pub use interval::ActivityInterval;
pub use rule::{CategoryRule, TitleSuffixRule};
pub use sample::ActivitySample;
