//! CLI library components for the SIRS cohort builder.

pub mod logging;
pub mod pipeline;
