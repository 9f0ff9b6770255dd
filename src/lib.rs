//! # Contactpack
//!
//! A conversational assistant for contact-list files. A user talks to it
//! through a chat transport, one message at a time, and it converts, edits,
//! merges, splits and inspects phone lists in four formats:
//!
//! - **txt**: one number per line
//! - **csv**: first field of every record
//! - **xlsx / xls**: every cell of every sheet (behind the `xlsx` feature)
//! - **vcf**: vCard 3.0, one card per contact
//!
//! The chat network itself stays outside. The [`engine::Engine`] consumes
//! [`transport::Event`]s and answers through the traits in [`transport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use contactpack::prelude::*;
//! # async fn run(responder: Arc<dyn Responder>) {
//!
//! let config = EngineConfig::new("/tmp/contactpack");
//! let storage = Arc::new(LocalStorage::new("/tmp/contactpack/uploads"));
//! let engine = Engine::new(config, responder, storage);
//!
//! let me = UserId(42);
//! engine.handle(Event::text(me, 1, "/to_vcf")).await;
//! engine.handle(Event::file(me, 2, IncomingFile::from_path("phones.txt"))).await;
//! engine.handle(Event::text(me, 3, "/done")).await;
//! engine.handle(Event::text(me, 4, "Kontak")).await;   // contact name
//! engine.handle(Event::text(me, 5, "hasil")).await;    // file name
//! engine.handle(Event::text(me, 6, "semua")).await;    // one file, no split
//! # }
//! ```
//!
//! ## Pure helpers
//!
//! The codecs and transforms work without the engine:
//!
//! ```rust
//! use contactpack::codec::vcard;
//! use contactpack::number::extract_unique;
//! use contactpack::naming::contact_names;
//!
//! let numbers = extract_unique(["0812-3456-7890", "0812 3456 7890", "hello"]);
//! let names = contact_names("Teman", numbers.len(), 0, 1);
//! let card = vcard::encode_named(&names, &numbers);
//! assert!(card.contains("FN:Teman 01"));
//! ```
//!
//! ## Module Structure
//!
//! - [`engine`]: event routing and session lifecycle
//! - [`workflow`]: one state machine per command, plus [`Command`](workflow::Command)
//! - [`session`], [`batch`]: per-user state, uploads and output directories
//! - [`transport`]: boundary traits ([`Responder`](transport::Responder),
//!   [`Storage`](transport::Storage), [`MembershipGate`](transport::MembershipGate),
//!   [`AuditSink`](transport::AuditSink)); [`local`] has filesystem implementations
//! - [`codec`]: format decoders and encoders, retried file I/O
//! - [`number`], [`record`], [`naming`], [`format`]: normalization, records,
//!   output naming and format detection
//! - [`transform`]: add, delete, merge, split, dedupe, rename, count
//! - [`delivery`], [`retry`]: result delivery with fixed-delay retries
//! - [`prompts`]: every user-facing message
//! - [`config`], [`error`]: settings and the unified error type
//! - [`cli`]: the console driver (feature `cli`)

pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod codec;
pub mod config;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod format;
pub mod local;
pub mod naming;
pub mod number;
pub mod prompts;
pub mod record;
pub mod retry;
pub mod session;
pub mod transform;
pub mod transport;
pub mod workflow;

// Re-export the main types at the crate root for convenience
pub use engine::Engine;
pub use error::{ContactpackError, Result};
pub use format::FileFormat;
pub use number::PhoneNumber;
pub use record::Record;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use contactpack::prelude::*;
/// ```
pub mod prelude {
    // Engine and its boundary
    pub use crate::engine::Engine;
    pub use crate::transport::{
        AuditEntry, AuditSink, Choice, Event, EventKind, FileHandle, IncomingFile, MembershipGate, OpenGate,
        Responder, Storage, UserId,
    };

    // Local implementations
    pub use crate::local::{CsvAuditLog, LocalStorage};

    // Configuration
    pub use crate::config::{EngineConfig, RetryPolicy};

    // Error types
    pub use crate::error::{ContactpackError, Result};

    // Data model
    pub use crate::format::FileFormat;
    pub use crate::number::PhoneNumber;
    pub use crate::record::Record;
    pub use crate::workflow::Command;
}
