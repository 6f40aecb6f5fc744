//! Data Transfer Objects (DTOs) for the lookup services.
//!
//! These mirror the JSON returned by third-party endpoints. They are private
//! to the infrastructure layer and are converted into domain types before
//! leaving it.

mod geolocation;
mod postal;

pub use geolocation::GeolocationResponse;
pub use postal::{PostOfficeDTO, PostalResponse};
