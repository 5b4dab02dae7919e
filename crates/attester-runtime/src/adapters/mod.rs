//! Port implementations wired by the runtime.

pub mod digest_validator;
pub mod logging_submitter;

pub use digest_validator::DigestValidator;
pub use logging_submitter::LoggingSubmitter;
