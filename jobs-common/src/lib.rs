pub mod metrics;
pub mod normalize;
pub mod posting;
pub mod store;
