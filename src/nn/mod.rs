pub mod mlp;

pub use mlp::{MLPConfig, MLP};
