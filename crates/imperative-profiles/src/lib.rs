//! Profiles loaded for a command, grouped by profile type.

mod error;
mod profiles;

pub use error::ProfilesError;
pub use profiles::{CommandProfiles, Profile};
