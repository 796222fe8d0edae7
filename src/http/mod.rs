//! HTTP interface: demo routes and router wiring.

pub mod handlers;
pub mod router;

pub use router::create_router;
