//! External service integrations.

pub mod webhook_client {
    pub use crate::webhook_client::*;
}
