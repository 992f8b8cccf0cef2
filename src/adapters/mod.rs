// Adapters layer: concrete implementations for the external systems (the
// remote geography catalog and the local filesystem).

pub mod geo;
pub mod storage;
