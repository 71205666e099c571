//! Command help text

/// A group of commands shown together in the help output
pub struct CommandCategory {
    pub name: &'static str,
    pub commands: Vec<CommandHelp>,
}

/// A single command for display
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

/// Returns categorized commands for the help output
pub fn commands_help() -> Vec<CommandCategory> {
    vec![
        CommandCategory {
            name: "Tickets",
            commands: vec![
                CommandHelp {
                    usage: "buy <product>",
                    description: "Buy a product and open its ticket",
                },
                CommandHelp {
                    usage: "open <id>",
                    description: "Show a ticket and mark it read",
                },
                CommandHelp {
                    usage: "send <text>",
                    description: "Message support on the open ticket",
                },
                CommandHelp {
                    usage: "close",
                    description: "Close the open ticket",
                },
            ],
        },
        CommandCategory {
            name: "Polling",
            commands: vec![
                CommandHelp {
                    usage: "hide",
                    description: "Pretend the window is hidden (pauses polling)",
                },
                CommandHelp {
                    usage: "show",
                    description: "Window visible again, poll soon",
                },
                CommandHelp {
                    usage: "refresh",
                    description: "Poll soon at the fastest cadence",
                },
            ],
        },
        CommandCategory {
            name: "Help",
            commands: vec![
                CommandHelp {
                    usage: "help",
                    description: "Show this help",
                },
                CommandHelp {
                    usage: "quit",
                    description: "Exit",
                },
            ],
        },
    ]
}

pub fn format_help() -> String {
    let categories = commands_help();
    let width = categories
        .iter()
        .flat_map(|c| c.commands.iter())
        .map(|c| c.usage.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for category in categories {
        out.push_str(category.name);
        out.push('\n');
        for command in category.commands {
            out.push_str(&format!(
                "  {:width$}  {}\n",
                command.usage,
                command.description,
                width = width
            ));
        }
    }
    out
}
