//! Unsigned credentials submitted to issuers under test.

mod template;

pub use template::{credential_template, CREDENTIALS_V1_CONTEXT, SUBJECT_ID};
