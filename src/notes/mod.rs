//! Note business rules: slug resolution and form validation.

pub mod form;
pub mod slug;
