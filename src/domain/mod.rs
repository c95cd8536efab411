// Domain layer: row/record models and ports (storage, config, transformers).

pub mod model;
pub mod ports;
