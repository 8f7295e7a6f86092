//! Remote interaction with the dream service.

pub mod http_dream_gateway;

pub use http_dream_gateway::HttpDreamGateway;
