//! Farmer domain module.
//!
//! # Module Structure
//!
//! - `model`: Farmer account, registration payload, session projection and
//!   security questions

mod model;

pub use model::{Farmer, NewFarmer, SecurityQuestion, SessionProjection, mask_mobile};
