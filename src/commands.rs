//! Slash-command parsing and execution.
//!
//! Commands cover what the browsable settings surfaces would: mode tags,
//! knowledge stacks, appearance, transcript logging. Anything that is not a
//! command is handed back to the chat loop as a message.

use std::path::PathBuf;

use crate::core::app::App;
use crate::core::config::{ThemeColor, THEME_COLORS};
use crate::core::knowledge::DEFAULT_STACK_ID;
use crate::core::session::ModeTag;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

const HELP_TEXT: &str = "\
Commands:
  /mode <think|explore>        Toggle a mode tag
  /stack list                  List knowledge stacks
  /stack new <name>            Create and activate a stack
  /stack rm <id>               Delete a stack (not the default)
  /stack use <id>              Toggle a stack's active state
  /upload <id> <file>...       Attach files to a stack and upload them
  /theme <color>               Set the accent color
  /dark                        Toggle dark mode
  /rtl                         Toggle text direction
  /log [filename]              Enable transcript logging, or toggle pause
  /help                        Show this help";

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "/help" => app.session.add_notice(HELP_TEXT),
        "/mode" => mode_command(app, &args),
        "/stack" => stack_command(app, &args),
        "/upload" => upload_command(app, &args),
        "/theme" => theme_command(app, &args),
        "/dark" => {
            let dark = app.toggle_dark_mode();
            app.session
                .add_notice(if dark { "Dark mode on" } else { "Dark mode off" });
        }
        "/rtl" => {
            let direction = app.toggle_direction();
            app.session
                .add_notice(format!("Text direction: {}", direction.as_str()));
        }
        "/log" => log_command(app, &args),
        _ => app
            .session
            .add_notice(format!("Unknown command: {command}. Try /help.")),
    }

    CommandResult::Continue
}

fn mode_command(app: &mut App, args: &[&str]) {
    match args.first().and_then(|name| ModeTag::from_name(name)) {
        Some(mode) => {
            let active = app.session.toggle_mode(mode);
            let state = if active { "on" } else { "off" };
            app.session
                .add_notice(format!("Mode '{}' {}", mode.as_str(), state));
        }
        None => app
            .session
            .add_notice("Usage: /mode <think|explore>".to_string()),
    }
}

fn stack_command(app: &mut App, args: &[&str]) {
    match args.first().copied() {
        None | Some("list") => {
            let mut lines = vec!["Knowledge stacks:".to_string()];
            for stack in app.session.stacks.stacks() {
                let marker = if app.session.stacks.is_active(&stack.id) {
                    "*"
                } else {
                    " "
                };
                lines.push(format!(
                    "{} {} - {} ({} file{})",
                    marker,
                    stack.id,
                    stack.name,
                    stack.files.len(),
                    if stack.files.len() == 1 { "" } else { "s" }
                ));
            }
            app.session.add_notice(lines.join("\n"));
        }
        Some("new") => {
            let name = args[1..].join(" ");
            let created = app
                .session
                .stacks
                .create(&name)
                .map(|stack| (stack.name.clone(), stack.id.clone()));
            match created {
                Some((name, id)) => app
                    .session
                    .add_notice(format!("Created and activated stack '{name}' ({id})")),
                None => app
                    .session
                    .add_notice("Stack names cannot be empty. Usage: /stack new <name>"),
            }
        }
        Some("rm") => match args.get(1) {
            Some(&id) if id == DEFAULT_STACK_ID => {
                app.session.add_notice("The default stack cannot be deleted.");
            }
            Some(&id) => {
                if app.session.stacks.delete(id) {
                    app.session.add_notice(format!("Deleted stack '{id}'"));
                } else {
                    app.session.add_notice(format!("No such stack: {id}"));
                }
            }
            None => app.session.add_notice("Usage: /stack rm <id>"),
        },
        Some("use") => match args.get(1) {
            Some(&id) => match app.session.stacks.toggle_active(id) {
                Some(true) => app.session.add_notice(format!("Stack '{id}' activated")),
                Some(false) => app.session.add_notice(format!("Stack '{id}' deactivated")),
                None => app.session.add_notice(format!("No such stack: {id}")),
            },
            None => app.session.add_notice("Usage: /stack use <id>"),
        },
        Some(other) => app.session.add_notice(format!(
            "Unknown stack subcommand: {other}. Try /stack list, new, rm, or use."
        )),
    }
}

fn upload_command(app: &mut App, args: &[&str]) {
    let Some((&stack_id, paths)) = args.split_first() else {
        app.session
            .add_notice("Usage: /upload <stack-id> <file>...");
        return;
    };

    if paths.is_empty() {
        app.session
            .add_notice("Usage: /upload <stack-id> <file>...");
        return;
    }

    if app.session.stacks.get(stack_id).is_none() {
        app.session.add_notice(format!("No such stack: {stack_id}"));
        return;
    }

    let files: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
    let count = files.len();
    app.session.stacks.attach_files(stack_id, files.clone());
    app.spawn_upload(stack_id.to_string(), files);

    app.session.add_notice(format!(
        "Uploading {count} file{} to stack '{stack_id}'",
        if count == 1 { "" } else { "s" }
    ));
}

fn theme_command(app: &mut App, args: &[&str]) {
    match args.first().and_then(|name| ThemeColor::from_name(name)) {
        Some(color) => {
            app.set_theme_color(color);
            app.session
                .add_notice(format!("Theme color set to {}", color.as_str()));
        }
        None => {
            let palette: Vec<&str> = THEME_COLORS.iter().map(|c| c.as_str()).collect();
            app.session
                .add_notice(format!("Usage: /theme <{}>", palette.join("|")));
        }
    }
}

fn log_command(app: &mut App, args: &[&str]) {
    match args {
        [] => {
            // Just "/log" - toggle logging if a file is set
            let notice = match app.session.logging.toggle_logging() {
                Ok(message) => message,
                Err(e) => format!("Error: {e}"),
            };
            app.session.add_notice(notice);
        }
        [filename] => {
            let notice = match app.session.logging.set_log_file(filename.to_string()) {
                Ok(message) => message,
                Err(e) => format!("Error setting log file: {e}"),
            };
            app.session.add_notice(notice);
        }
        _ => app.session.add_notice(
            "Usage: /log [filename] - Enable logging to file, or /log to toggle pause/resume",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::tests::test_app;
    use crate::core::message::Role;

    fn last_notice(app: &App) -> String {
        app.session
            .messages()
            .filter(|m| m.role == Role::App)
            .last()
            .map(|m| m.content.clone())
            .expect("notice")
    }

    #[test]
    fn plain_text_is_passed_through_as_a_message() {
        let mut app = test_app();
        match process_input(&mut app, "hello there") {
            CommandResult::ProcessAsMessage(text) => assert_eq!(text, "hello there"),
            CommandResult::Continue => panic!("expected message pass-through"),
        }
        assert_eq!(app.session.message_count(), 1);
    }

    #[test]
    fn mode_command_toggles_tags() {
        let mut app = test_app();
        process_input(&mut app, "/mode think");
        assert_eq!(app.session.active_modes(), vec!["think".to_string()]);
        process_input(&mut app, "/mode think");
        assert!(app.session.active_modes().is_empty());
        process_input(&mut app, "/mode ponder");
        assert!(last_notice(&app).starts_with("Usage: /mode"));
    }

    #[test]
    fn stack_commands_manage_the_registry() {
        let mut app = test_app();
        process_input(&mut app, "/stack new Research Papers");
        let id = app
            .session
            .stacks
            .stacks()
            .last()
            .expect("stack")
            .id
            .clone();
        assert!(app.session.stacks.is_active(&id));
        assert_eq!(
            app.session.stacks.get(&id).expect("stack").name,
            "Research Papers"
        );

        process_input(&mut app, &format!("/stack use {id}"));
        assert!(!app.session.stacks.is_active(&id));

        process_input(&mut app, &format!("/stack rm {id}"));
        assert!(app.session.stacks.get(&id).is_none());

        process_input(&mut app, "/stack rm default");
        assert!(last_notice(&app).contains("cannot be deleted"));
        assert_eq!(app.session.stacks.stacks().len(), 1);
    }

    #[test]
    fn blank_stack_names_are_rejected() {
        let mut app = test_app();
        process_input(&mut app, "/stack new");
        assert!(last_notice(&app).contains("cannot be empty"));
        assert_eq!(app.session.stacks.stacks().len(), 1);
    }

    #[tokio::test]
    async fn upload_attaches_files_before_dispatch() {
        let mut app = test_app();
        process_input(&mut app, "/upload default notes.txt refs.md");
        let files = &app.session.stacks.get("default").expect("stack").files;
        assert_eq!(files.len(), 2);

        process_input(&mut app, "/upload nowhere notes.txt");
        assert!(last_notice(&app).contains("No such stack"));
    }

    #[test]
    fn theme_command_accepts_palette_colors_only() {
        let mut app = test_app();
        process_input(&mut app, "/theme rose");
        assert_eq!(app.config.theme_color, Some(ThemeColor::Rose));
        process_input(&mut app, "/theme chartreuse");
        assert!(last_notice(&app).starts_with("Usage: /theme"));
    }

    #[test]
    fn unknown_commands_are_reported() {
        let mut app = test_app();
        match process_input(&mut app, "/frobnicate") {
            CommandResult::Continue => {}
            CommandResult::ProcessAsMessage(_) => panic!("should not pass through"),
        }
        assert!(last_notice(&app).contains("Unknown command"));
    }
}
