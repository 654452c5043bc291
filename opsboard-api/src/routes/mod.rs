/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: local authentication (signup, login, logout)
/// - `oauth`: federated authentication (consent flow + session status)
/// - `admin`: user management and task assignment
/// - `user`: dashboard and task status updates

pub mod admin;
pub mod auth;
pub mod health;
pub mod oauth;
pub mod user;
