// Domain layer: request/response models and the map service port.

pub mod model;
pub mod ports;
