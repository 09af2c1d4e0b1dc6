use imperative_profiles::CommandProfiles;

use crate::config::ProfilesConfig;
use crate::error::Result;

pub(crate) fn list(config: &ProfilesConfig, profile_type: &str) -> Result<()> {
    let profiles = CommandProfiles::load(&config.file)?;
    let records = profiles.get_all(profile_type)?;

    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

pub(crate) fn get(
    config: &ProfilesConfig,
    profile_type: &str,
    name: Option<&str>,
    optional: bool,
) -> Result<()> {
    let profiles = CommandProfiles::load(&config.file)?;

    if let Some(profile) = profiles.get(profile_type, !optional, name)? {
        println!("{}", serde_json::to_string_pretty(profile)?);
    }
    Ok(())
}
