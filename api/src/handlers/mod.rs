pub mod error;

pub use error::{handle_domain_error, html, plain_text, render_failure, status_for, Phase};
