/// Request middleware
///
/// - `session`: the session gate (dual-branch validator) and the Admin
///   role gate

pub mod session;
