//! Bank Feedback Intake API Library
//!
//! This library provides the core functionality for the bank feedback
//! intake service: collecting a flat customer feedback record, deriving
//! a sentiment label for its free-text review through a hosted
//! pretrained model, and forwarding the merged record to the
//! workflow-automation webhook that appends it to an online spreadsheet.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Feedback record and response models.
//! - `pipeline`: Submission pipeline orchestration.
//! - `sentiment`: Sentiment labels, model seam, and classifier.
//! - `webhook_client`: Sheet webhook delivery client.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod sentiment;
pub mod webhook_client;
