pub mod github;
pub mod handler;
pub mod renderer;
pub mod source;
pub mod stats;
