// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
//
//   matrix.rs     — host-side dense data matrix
//   corruption.rs — corruption scheme names and parameters
//   traits.rs     — DataSource / DataSink abstractions
//
// No Burn types and no file I/O live here.

/// Dense row-major data matrix
pub mod matrix;

/// Corruption scheme configuration
pub mod corruption;

/// Core abstractions that other layers implement
pub mod traits;
