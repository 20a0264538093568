// Domain layer: core models and ports (interfaces) shared by the resolver, the guard and the adapters.

pub mod model;
pub mod ports;
