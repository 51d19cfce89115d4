/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// reading record documents, rendering reports and talking to the console.
pub mod outbound;
