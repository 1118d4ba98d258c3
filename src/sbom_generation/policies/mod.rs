mod license_priority;
mod metadata_precedence;

pub use license_priority::LicensePriority;
pub use metadata_precedence::{ComponentFields, MetadataPrecedence};
