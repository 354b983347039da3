// Domain layer: order models and ports (interfaces).

pub mod model;
pub mod ports;

/// Country used for ship-to addresses when the export says nothing else.
pub const DEFAULT_COUNTRY: &str = "NL";
