//! Reusable network building blocks.

pub mod basics;
pub mod conv;
pub mod losses;
pub mod similarity;

pub use basics::FeedForward;
pub use conv::{ConvPoolBlock, ConvStack};
pub use similarity::Similarity;
