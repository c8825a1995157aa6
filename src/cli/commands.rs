//! CLI subcommand definitions

use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Start an interactive chat (default)
    Chat {
        /// Continue an existing session instead of starting a new one
        #[arg(short = 'S', long, value_name = "ID")]
        session: Option<String>,
    },
    /// Send a single message and print the reply
    Ask {
        /// Message text
        message: String,
        /// Session id to continue (a new one is created if omitted)
        #[arg(short = 'S', long, value_name = "ID")]
        session: Option<String>,
    },
    /// Show the stored turns of a session
    History {
        /// Session id
        session: String,
    },
    /// List stored sessions
    Sessions,
}

impl Commands {
    /// Session id passed on the command line, if any
    pub(crate) fn session_arg(&self) -> Option<&str> {
        match self {
            Commands::Chat { session } | Commands::Ask { session, .. } => session.as_deref(),
            Commands::History { session } => Some(session.as_str()),
            Commands::Sessions => None,
        }
    }
}
