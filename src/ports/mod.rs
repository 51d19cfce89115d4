/// Ports module defining interfaces for hexagonal architecture
///
/// The analysis is driven from the CLI directly, so only outbound
/// (driven) ports are defined here.
pub mod outbound;
