//! YAML DSL schema types with serde deserialization.
//!
//! A rule file is a YAML sequence of [`Rule`] records. Unknown fields are
//! ignored so documents can carry annotations for other tools.

mod capture;
mod one_or_many;
mod rule;

pub use capture::CaptureOn;
pub use rule::{Observe, Rule, When};
