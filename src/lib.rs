pub mod api;
pub mod error;
pub mod join;
pub mod models;
pub mod normalize;
pub mod pipeline;
