//! Numen HTTP session client
//!
//! A client for the Numen numerology API. All business logic lives on the
//! server; this crate owns the session: bearer-token injection, refresh-token
//! rotation on 401 and uniform user-facing error notification.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod events;
pub mod notify;
pub mod store;
pub mod types;

pub use client::attempt::{ApiRequest, Attempt};
pub use client::error::ClientError;
pub use client::{SessionClient, SessionClientBuilder};
pub use config::ClientConfig;
pub use events::{InvalidationReason, SessionEvent};
pub use notify::{Notice, NoticeVariant, Notifier, RecordingNotifier, TracingNotifier};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
