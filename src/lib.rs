//! Chat aggregator: an in-memory view over a scraped chat stream.
//!
//! This crate ingests messages scraped from a third-party chat page and
//! maintains a bounded, de-duplicated view of them: a flat recent-message
//! buffer, per-conversation threads, and a cache of the channel and
//! direct-message catalogs. It notifies observers once per genuinely new
//! message.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types with no infrastructure dependencies
//! - **Ports**: Trait interfaces collaborators implement
//! - **Adapters**: Concrete implementations of ports
//! - **Services**: The aggregation store itself
//!
//! # Modules
//!
//! - [`chat`]: Message ingestion, conversation threads, and catalogs

pub mod chat;
