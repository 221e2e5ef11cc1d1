//! # outreach-core — Domain Core for the Outreach Session Stack
//!
//! Foundational types and pure logic for recording school outreach sessions:
//! participant counts, geolocation, photo attachments, and the statistics
//! shown on the dashboard.
//!
//! ## Modules
//!
//! - [`session`] — session record types and the year-group vocabulary
//! - [`photo`] — photo attachment record, allowed extensions, size cap
//! - [`input`] — the loosely-typed submission shape accepted from clients
//! - [`validate`] — field validation rules over [`input::SessionInput`]
//! - [`stats`] — trailing-7-day participation aggregation
//!
//! ## Crate Policy
//!
//! - Pure and synchronous: no I/O, no shared mutable state, every function
//!   reentrant. Persistence and file storage live in `outreach-api`.
//! - Validation collects every violation in one pass and reports them in a
//!   stable order; a record failing any rule is rejected as a unit.
//! - Time-dependent logic (date bounds, the stats window) takes the reference
//!   date as an explicit parameter so results are deterministic.

pub mod input;
pub mod photo;
pub mod session;
pub mod stats;
pub mod validate;

pub use input::{FieldValue, SessionInput};
pub use photo::{allowed_photo_extension, PhotoAttachment, MAX_PHOTO_BYTES};
pub use session::{SessionFields, SessionRecord, YearGroup};
pub use stats::{aggregate, DayStat, ParticipationStats};
