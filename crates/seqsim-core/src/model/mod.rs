//! Model definitions.

pub mod cnn;

pub use cnn::CnnSiameseNet;
