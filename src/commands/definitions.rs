//! Declarative metadata for the built-in meta-commands.
//!
//! Used for the `\?` listing and by consumers that want command discovery
//! (e.g. shell autocompletion).

/// Definition of a meta-command.
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Leading token, including the backslash.
    pub name: &'static str,
    /// Short description shown in help.
    pub description: &'static str,
    /// Usage line.
    pub usage: &'static str,
}

/// All built-in command definitions.
pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "\\dt",
        description: "List tables",
        usage: "\\dt",
    },
    CommandDef {
        name: "\\d",
        description: "Describe a table's columns, or list tables",
        usage: "\\d [table]",
    },
    CommandDef {
        name: "\\l",
        description: "List databases",
        usage: "\\l",
    },
    CommandDef {
        name: "\\?",
        description: "Show this command listing",
        usage: "\\?",
    },
];
