/// Domain models for Opsboard
///
/// Plain immutable value records. Persistence lives behind the store traits
/// in [`crate::store`]; the records themselves carry no database handle.
///
/// # Models
///
/// - `user`: accounts, the `Role` enum, and the Admin listing projection
/// - `task`: task assignments and their lifecycle status

pub mod task;
pub mod user;
