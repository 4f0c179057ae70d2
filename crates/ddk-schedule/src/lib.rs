//! ddk-schedule
//!
//! Template-to-reminder expansion engine.
//!
//! A [`TemplateDefinition`] declares recurring obligations. For one target
//! year, [`ReminderGenerator::generate`] expands every [`TemplateItem`]
//! through the [`RecurrenceResolver`] and returns [`GeneratedReminder`]s
//! ordered by deadline.
//!
//! Skip policy: items missing fields their recurrence needs, and occurrences
//! on dates that do not exist, produce nothing rather than failing the whole
//! generation. Malformed input (unknown recurrence, out-of-range year) fails
//! at the boundary with a [`ScheduleError`].

mod builtin;
mod error;
mod generator;
mod loader;
mod model;
mod resolver;

pub use builtin::{builtin_template, builtin_templates, BUILTIN_TEMPLATE_KEYS};
pub use error::ScheduleError;
pub use generator::{validate_year, ReminderGenerator, MAX_YEAR, MIN_YEAR};
pub use loader::{load_template_file, load_template_yaml};
pub use model::*;
pub use resolver::RecurrenceResolver;
