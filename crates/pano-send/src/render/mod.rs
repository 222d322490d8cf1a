//! HTML rendering for the send page.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic XSS protection (all dynamic values are escaped).

pub mod components;
pub mod send_form;

pub use send_form::{FormValues, render as render_send_page};
