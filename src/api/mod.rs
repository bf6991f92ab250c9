pub mod handlers;
pub mod router;
pub mod wsdl;

pub use router::create_router;
