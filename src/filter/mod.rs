//! Output stage: turns logical pixels into what is actually sent.
//!
//! Per channel brightness is applied first, then the global current
//! limiting factor shared by all channels.

mod brightness;
mod current_limit;

pub use brightness::apply_output_scaling;
pub use current_limit::{CurrentLimiter, compute_scale_factor, predicted_current_ma};
