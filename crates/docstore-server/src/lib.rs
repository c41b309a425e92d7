//! HTTP server for docstore.
//!
//! Exposes the collections under one storage root so that remote peers can
//! use them as if they were local:
//!
//! | Method | Path | Behavior |
//! |---|---|---|
//! | GET | `/` | collection registry |
//! | POST | `/{collection}` | persist the body, respond `{"ID": ...}` |
//! | GET | `/{collection}` | list, or query when filter parameters are present |
//! | GET | `/{collection}/{id}` | load one entry |
//! | DELETE | `/{collection}/{id}` | delete one entry |

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{parse_size, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, IdResponse, MessageResponse};
pub use router::build_router;
pub use server::DocstoreServer;
