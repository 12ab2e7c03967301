// Domain layer: payment models and the gateway port.

pub mod model;
pub mod ports;
