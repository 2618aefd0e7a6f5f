pub mod analyzer;
pub mod bucketize;
pub mod capture;
pub mod energy;
pub mod frame_ring;
pub mod pipeline;
pub mod smoothing;
pub mod spectral;
