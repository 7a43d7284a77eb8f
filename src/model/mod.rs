//! Typed record model
//!
//! Rows arrive from the data source as loosely-typed string-keyed maps. This
//! module converts them once, at the boundary, into typed records whose fields
//! are never null:
//! - `row` - the raw `Row` type and defaulting field accessors
//! - `message` - chat history records
//! - `lead` - outreach lead records
//! - `thread` - per-counterparty conversation threads built by the reconciler

pub mod lead;
pub mod message;
pub mod row;
pub mod thread;

pub use lead::LeadRecord;
pub use message::MessageRecord;
pub use row::Row;
pub use thread::ConversationThread;
