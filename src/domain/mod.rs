// Domain layer: the CCP value types and the ports the batch pipeline is written against.

pub mod model;
pub mod ports;
