/// Database models for TaskFlow
///
/// This module contains the persisted entities and their CRUD operations
/// against PostgreSQL.
///
/// # Models
///
/// - `user`: User accounts and authentication data
/// - `project`: Projects owned by a single user
/// - `task`: Tasks belonging to a single project
///
/// # Status Enums
///
/// Status values travel over the wire as upper-case strings (`"OPEN"`,
/// `"IN_PROGRESS"`, ...). Every status enum implements [`WireEnum`] and is
/// parsed through [`parse_enum`], so projects and tasks reject unknown values
/// the same way.
///
/// # Example
///
/// ```
/// use taskflow_shared::models::{parse_enum, project::ProjectStatus};
///
/// let status: ProjectStatus = parse_enum("IN_PROGRESS").unwrap();
/// assert_eq!(status, ProjectStatus::InProgress);
///
/// // Matching is exact and case-sensitive
/// assert!(parse_enum::<ProjectStatus>("in_progress").is_err());
/// ```

pub mod project;
pub mod task;
pub mod user;

/// An enum with a fixed set of upper-case wire names
pub trait WireEnum: Sized + Copy + 'static {
    /// Human-readable kind used in error messages (e.g. "task status")
    const KIND: &'static str;

    /// All variants, in declaration order
    const VARIANTS: &'static [Self];

    /// Wire name of this variant
    fn as_str(&self) -> &'static str;
}

/// Error returned when a raw string names no variant of a [`WireEnum`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct InvalidEnumValue {
    /// Kind of enum that failed to parse
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}

/// Parses a wire string into a [`WireEnum`] variant
///
/// Matching is an exact, case-sensitive comparison against each variant's
/// [`WireEnum::as_str`].
///
/// # Errors
///
/// Returns [`InvalidEnumValue`] if `raw` matches no variant.
pub fn parse_enum<E: WireEnum>(raw: &str) -> Result<E, InvalidEnumValue> {
    E::VARIANTS
        .iter()
        .copied()
        .find(|variant| variant.as_str() == raw)
        .ok_or_else(|| InvalidEnumValue {
            kind: E::KIND,
            value: raw.to_string(),
        })
}
