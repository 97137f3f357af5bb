use anyhow::Result;
use clap::CommandFactory;
use owo_colors::OwoColorize;

use crate::commands::Cli;
use depgraph_constants::{BIN_NAME, COMMANDS, DESCRIPTION, EXAMPLES, VERSION};

pub struct HelpHandler;

impl HelpHandler {
    pub fn handle_help(command: Option<&str>) -> Result<()> {
        match command {
            Some(cmd) => Self::show_command_help(cmd),
            None => {
                Self::show_custom_help();
                Ok(())
            }
        }
    }

    fn show_command_help(command: &str) -> Result<()> {
        let mut cmd = Cli::command();

        if let Some(subcommand) = cmd.find_subcommand_mut(command) {
            subcommand.print_help()?;
        } else {
            println!(
                "{}: Unknown command '{}'",
                "Error".bright_red().bold(),
                command
            );
            println!();
            Self::show_custom_help();
        }

        println!();
        Ok(())
    }

    fn show_custom_help() {
        println!("{}", DESCRIPTION.bright_white().bold());
        println!(
            "{} {}",
            "Version:".bright_white().bold(),
            VERSION.bright_black().bold()
        );
        println!();

        println!("{}", "Usage:".bright_magenta().bold());
        println!(
            "  {} {} {} {}",
            BIN_NAME.bright_cyan().bold(),
            "<COMMAND>".bright_white(),
            "<OPTIONS>".bright_black().bold(),
            "[ARGS]".bright_black().bold()
        );
        println!();

        println!("{}", "Commands:".bright_magenta().bold());
        let rows: Vec<(String, String)> = COMMANDS
            .iter()
            .map(|(cmd, _, aliases)| {
                let alias_str = if aliases.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", aliases.join(", "))
                };
                (cmd.to_string(), alias_str)
            })
            .collect();
        let width = rows
            .iter()
            .map(|(cmd, aliases)| cmd.len() + aliases.len())
            .max()
            .unwrap_or(0);

        for ((cmd, alias_str), (_, desc, _)) in rows.iter().zip(COMMANDS) {
            let padding = width - (cmd.len() + alias_str.len());
            println!(
                "  {}{}{}  # {}",
                cmd.bright_cyan().bold(),
                alias_str.bright_black().bold(),
                " ".repeat(padding),
                desc.bright_black().bold()
            );
        }
        println!();

        println!("{}", "Options:".bright_magenta().bold());
        println!(
            "  {}  # {}",
            "-V, --version".bright_cyan().bold(),
            "Print version".bright_black().bold(),
        );
        println!();

        Self::show_examples();
    }

    fn show_examples() {
        println!("{}", "Examples:".bright_magenta().bold());

        let width = EXAMPLES.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);

        for (cmd, desc) in EXAMPLES {
            let formatted_cmd = cmd
                .split_whitespace()
                .enumerate()
                .map(|(idx, part)| {
                    if idx == 0 {
                        part.bright_cyan().bold().to_string()
                    } else if part.starts_with('-') {
                        part.bright_black().bold().to_string()
                    } else {
                        part.bright_white().to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");

            println!(
                "  {}{}  # {}",
                formatted_cmd,
                " ".repeat(width - cmd.len()),
                desc.bright_black().bold()
            );
        }

        println!();
        println!(
            "{}",
            "For more information about a specific command, use:".bright_magenta()
        );
        println!(
            "  {} {} {}",
            BIN_NAME.bright_cyan().bold(),
            "help".bright_white(),
            "<command>".bright_black().bold()
        );
    }
}
