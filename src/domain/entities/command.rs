use crate::application::errors::ParseError;

/// The closed set of commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Register,
    Profile,
    Events,
    Recommend,
    Stats,
    Members,
    Announce,
    Event,
    Backup,
}

impl CommandKind {
    pub const ALL: [CommandKind; 10] = [
        CommandKind::Help,
        CommandKind::Register,
        CommandKind::Profile,
        CommandKind::Events,
        CommandKind::Recommend,
        CommandKind::Stats,
        CommandKind::Members,
        CommandKind::Announce,
        CommandKind::Event,
        CommandKind::Backup,
    ];

    /// Resolve a command token (prefix already removed). Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Help => "help",
            CommandKind::Register => "register",
            CommandKind::Profile => "profile",
            CommandKind::Events => "events",
            CommandKind::Recommend => "recommend",
            CommandKind::Stats => "stats",
            CommandKind::Members => "members",
            CommandKind::Announce => "announce",
            CommandKind::Event => "event",
            CommandKind::Backup => "backup",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::Help => "Show this message",
            CommandKind::Register => "Register or update your profile",
            CommandKind::Profile => "Show your profile",
            CommandKind::Events => "Show upcoming events",
            CommandKind::Recommend => "Get a music recommendation",
            CommandKind::Stats => "Show group statistics",
            CommandKind::Members => "List all members",
            CommandKind::Announce => "Make an announcement",
            CommandKind::Event => "Create an event",
            CommandKind::Backup => "Back up club data",
        }
    }

    /// Arguments shown after the command name in help text
    pub fn usage(&self) -> Option<&'static str> {
        match self {
            CommandKind::Register => Some("[name] [genre] [role]"),
            CommandKind::Recommend => Some("[genre]"),
            CommandKind::Announce => Some("[message]"),
            CommandKind::Event => Some("create [date] [time] [name]"),
            _ => None,
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            CommandKind::Announce | CommandKind::Event | CommandKind::Backup
        )
    }
}

/// A fully validated command, ready to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Register { name: String, genre: String, role: String },
    Profile,
    Events,
    Recommend { genre: Option<String> },
    Stats,
    Members,
    Announce { text: String },
    CreateEvent { date: String, time: String, name: String },
    Backup,
}

impl Command {
    /// Validate `args` for an already resolved `kind`
    pub fn from_args(kind: CommandKind, args: &[String]) -> Result<Self, ParseError> {
        match kind {
            CommandKind::Help => Ok(Command::Help),
            CommandKind::Register => match args {
                [name, genre, role @ ..] if !role.is_empty() => Ok(Command::Register {
                    name: name.clone(),
                    genre: genre.clone(),
                    role: role.join(" "),
                }),
                _ => Err(ParseError::Usage(kind)),
            },
            CommandKind::Profile => Ok(Command::Profile),
            CommandKind::Events => Ok(Command::Events),
            CommandKind::Recommend => Ok(Command::Recommend {
                genre: args.first().cloned(),
            }),
            CommandKind::Stats => Ok(Command::Stats),
            CommandKind::Members => Ok(Command::Members),
            CommandKind::Announce => {
                if args.is_empty() {
                    Err(ParseError::Usage(kind))
                } else {
                    Ok(Command::Announce {
                        text: args.join(" "),
                    })
                }
            }
            CommandKind::Event => match args {
                [verb, date, time, name @ ..] if verb == "create" && !name.is_empty() => {
                    Ok(Command::CreateEvent {
                        date: date.clone(),
                        time: time.clone(),
                        name: name.join(" ").replace('_', " "),
                    })
                }
                _ => Err(ParseError::Usage(kind)),
            },
            CommandKind::Backup => Ok(Command::Backup),
        }
    }

    /// Resolve and validate in one step
    pub fn parse(name: &str, args: &[String]) -> Result<Self, ParseError> {
        if name.is_empty() {
            return Err(ParseError::Empty);
        }
        let kind = CommandKind::from_name(name).ok_or_else(|| ParseError::Unknown(name.to_string()))?;
        Self::from_args(kind, args)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Help => CommandKind::Help,
            Command::Register { .. } => CommandKind::Register,
            Command::Profile => CommandKind::Profile,
            Command::Events => CommandKind::Events,
            Command::Recommend { .. } => CommandKind::Recommend,
            Command::Stats => CommandKind::Stats,
            Command::Members => CommandKind::Members,
            Command::Announce { .. } => CommandKind::Announce,
            Command::CreateEvent { .. } => CommandKind::Event,
            Command::Backup => CommandKind::Backup,
        }
    }
}
