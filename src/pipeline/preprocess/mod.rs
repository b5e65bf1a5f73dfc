//! Text preprocessing ahead of the model calls.
//!
//! Everything here is pure string work: whitespace collapse and lowercasing,
//! character cleanup, sentence segmentation and section bucketing.

pub mod clean;
pub mod normalize;
pub mod sections;
pub mod sentences;

pub use clean::*;
pub use normalize::*;
pub use sections::*;
pub use sentences::*;
