mod plugins;
mod profiles;

use clap::Subcommand;

use crate::config::CliConfig;
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Inspect installed plugins
    #[command(subcommand)]
    Plugins(PluginsCommand),
    /// Look up the profiles available to commands
    #[command(subcommand)]
    Profiles(ProfilesCommand),
}

#[derive(Subcommand)]
pub(crate) enum PluginsCommand {
    /// Validate installed plugins and report their issues
    Validate {
        /// Plugins to validate (default: every installed plugin)
        plugin: Vec<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ProfilesCommand {
    /// Print every profile of a type
    List {
        /// Profile type
        #[arg(value_name = "TYPE")]
        profile_type: String,
    },
    /// Print one profile of a type
    Get {
        /// Profile type
        #[arg(value_name = "TYPE")]
        profile_type: String,
        /// Profile name (default: the first profile of the type)
        #[arg(long)]
        name: Option<String>,
        /// Print nothing instead of failing when the profile does not exist
        #[arg(long)]
        optional: bool,
    },
}

impl Commands {
    pub(crate) fn execute(self, config: &CliConfig) -> Result<()> {
        match self {
            Self::Plugins(PluginsCommand::Validate { plugin }) => {
                plugins::validate(&config.plugins, &plugin)
            }
            Self::Profiles(ProfilesCommand::List { profile_type }) => {
                profiles::list(&config.profiles, &profile_type)
            }
            Self::Profiles(ProfilesCommand::Get {
                profile_type,
                name,
                optional,
            }) => profiles::get(&config.profiles, &profile_type, name.as_deref(), optional),
        }
    }
}
