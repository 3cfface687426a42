//! Saju Intake Core
//!
//! Shared types for the Saju Intake workspace. Both the server and the
//! polling client depend on this crate, so the field normalization that
//! forms the lookup key lives in exactly one place.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `intake` - Intake form, field normalization, lookup key
//! - `sections` - The six result sections and the lenient section parser
//! - `lookup` - Job status, tagged job state and wire payloads

pub mod error;
pub mod intake;
pub mod lookup;
pub mod sections;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Intake ─────────────────────────────────────────────────────────────
pub use intake::{
    calendar_label, gender_label, normalize_birthdate, normalize_phone, source_label,
    truncate_user_agent, IntakeForm, LookupKey,
};

// ── Sections ───────────────────────────────────────────────────────────
pub use sections::{extract_section, parse_sections, ParsedSections, SectionLabel};

// ── Lookup ─────────────────────────────────────────────────────────────
pub use lookup::{
    JobState, JobStatus, LivenessPayload, LookupResponse, SubmitResponse, ACTION_GET_RESULT,
    SERVICE_NAME,
};
