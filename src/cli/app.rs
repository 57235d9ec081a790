//! CLI module for the organizer application
//!
//! Each invocation is turned into the same intents a graphical front end
//! would emit (select a view, open a dialog, save, delete) and routed through
//! the [`ViewCoordinator`]. Output is plain text or JSON on stdout.
use std::{
    fs::{read_to_string, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use chrono::Datelike;
use console::{style, Color, Style};
use log::{debug, info};
use shell_words::split;
use tempfile::Builder;

use crate::{
    content_preview, dates, parse_date, parse_month, parse_time, require_title, Backend,
    Commands, Config, Event, EventColor, EventCommand, EventFields, EventPatch, FileBackend,
    Note, NoteCommand, NotePatch, OrganizerError, Priority, Result, SaveOutcome, Todo,
    TodoCommand, TodoFilter, TodoPatch, View, ViewCoordinator,
};

/// CLI Application handler - processes CLI commands and drives the coordinator
pub struct App<B: Backend = FileBackend> {
    coordinator: ViewCoordinator<B>,

    /// Application configuration
    config: Config,

    /// Where `config --set/--reset` writes to
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl<B: Backend> App<B> {
    pub fn new(
        coordinator: ViewCoordinator<B>,
        config: Config,
        config_path: PathBuf,
        verbose: bool,
    ) -> Self {
        Self {
            coordinator,
            config,
            config_path,
            verbose,
        }
    }

    pub fn coordinator(&self) -> &ViewCoordinator<B> {
        &self.coordinator
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        debug!("Running command: {:?}", command);
        match command {
            Commands::Calendar {
                month,
                day,
                prev,
                next,
            } => self.handle_calendar(month, day, prev, next)?,
            Commands::Event(command) => self.handle_event(command)?,
            Commands::Todo(command) => self.handle_todo(command)?,
            Commands::Note(command) => self.handle_note(command)?,
            Commands::Config { show, set, reset } => self.handle_config(show, set, reset)?,
        }
        Ok(())
    }

    // Calendar and events

    fn handle_calendar(
        &mut self,
        month: Option<String>,
        day: Option<String>,
        prev: bool,
        next: bool,
    ) -> Result<()> {
        self.coordinator.select_view(View::Calendar);

        if let Some(day) = day {
            let day = parse_date(&day)?;
            let events = self.coordinator.events_on(day);
            println!("{}", style(day.format("%A, %B %-d %Y")).bold());
            if events.is_empty() {
                println!("No events on this day.");
            }
            for event in events {
                print_event_line(event);
            }
            return Ok(());
        }

        let month = match month {
            Some(month) => parse_month(&month)?,
            None => dates::today(),
        };
        self.coordinator.go_to_month(month);
        if prev {
            self.coordinator.previous_month();
        }
        if next {
            self.coordinator.next_month();
        }

        self.display_month();
        Ok(())
    }

    fn display_month(&self) {
        let grid = self.coordinator.month_grid(dates::today());
        println!("{}", style(grid.title()).bold());
        println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");

        for week in &grid.weeks {
            let row: Vec<String> = week
                .iter()
                .map(|cell| {
                    let marker = match cell.events.len() {
                        0 => " ".to_string(),
                        n if n > 9 => "+".to_string(),
                        n => n.to_string(),
                    };
                    let text = format!("{:>3}{} ", cell.date.day(), marker);
                    if cell.is_today {
                        style(text).reverse().to_string()
                    } else if !cell.in_month {
                        style(text).dim().to_string()
                    } else {
                        text
                    }
                })
                .collect();
            println!("{}", row.join(""));
        }

        let in_month = self.coordinator.events().in_month(grid.month);
        if !in_month.is_empty() {
            println!();
            let mut sorted = in_month;
            sorted.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
            for event in sorted {
                print_event_line(event);
            }
        }
    }

    fn handle_event(&mut self, command: EventCommand) -> Result<()> {
        self.coordinator.select_view(View::Calendar);

        match command {
            EventCommand::Add(fields) => {
                let title = require_title(fields.title.as_deref().unwrap_or_default())?;
                let mut form = event_form(fields)?;
                form.title = Some(title);

                self.coordinator.create_event(form.date);
                report_save("Event", self.coordinator.save_event(form));
            }

            EventCommand::Edit {
                id,
                fields,
                clear_description,
            } => {
                let mut form = event_form(fields)?;
                if let Some(title) = form.title.take() {
                    form.title = Some(require_title(&title)?);
                }
                if clear_description {
                    form.description = Some(None);
                }

                if !self.coordinator.edit_event(&id) {
                    return report_missing("event", &id);
                }
                report_save("Event", self.coordinator.save_event(form));
            }

            EventCommand::Show { id, json } => match self.coordinator.events().get(&id) {
                Some(event) if json => println!("{}", serde_json::to_string_pretty(event)?),
                Some(event) => {
                    print_event_line(event);
                    if let Some(description) = &event.description {
                        println!("\n{}", description);
                    }
                    println!("\nID: {}", event.id);
                }
                None => return report_missing("event", &id),
            },

            EventCommand::Delete { id } => match self.coordinator.delete_event(&id) {
                Some(event) => println!("Deleted event '{}'", event.title),
                None => return report_missing("event", &id),
            },
        }
        Ok(())
    }

    // Todos

    fn handle_todo(&mut self, command: TodoCommand) -> Result<()> {
        self.coordinator.select_view(View::Todos);

        match command {
            TodoCommand::List { filter, json } => {
                self.coordinator.set_todo_filter(filter);
                let todos = self.coordinator.visible_todos();
                if json {
                    println!("{}", serde_json::to_string_pretty(&todos)?);
                    return Ok(());
                }
                self.display_todos(&todos, filter);
            }

            TodoCommand::Add {
                title,
                priority,
                due,
            } => {
                let form = TodoPatch {
                    title: Some(require_title(&title)?),
                    priority: priority.as_deref().map(str::parse::<Priority>).transpose()?,
                    due_date: due.as_deref().map(parse_date).transpose()?.map(Some),
                    ..TodoPatch::default()
                };

                self.coordinator.create_todo();
                report_save("Todo", self.coordinator.save_todo(form));
            }

            TodoCommand::Edit {
                id,
                title,
                priority,
                due,
                clear_due,
            } => {
                let form = TodoPatch {
                    title: title.as_deref().map(require_title).transpose()?,
                    priority: priority
                        .as_deref()
                        .map(str::parse::<Priority>)
                        .transpose()?,
                    due_date: if clear_due {
                        Some(None)
                    } else {
                        due.as_deref().map(parse_date).transpose()?.map(Some)
                    },
                    ..TodoPatch::default()
                };

                if !self.coordinator.edit_todo(&id) {
                    return report_missing("todo", &id);
                }
                report_save("Todo", self.coordinator.save_todo(form));
            }

            TodoCommand::Toggle { id } => match self.coordinator.toggle_todo(&id) {
                Some(true) => println!("Todo {} marked as completed", id),
                Some(false) => println!("Todo {} marked as pending", id),
                None => return report_missing("todo", &id),
            },

            TodoCommand::Delete { id } => match self.coordinator.delete_todo(&id) {
                Some(todo) => println!("Deleted todo '{}'", todo.title),
                None => return report_missing("todo", &id),
            },
        }
        Ok(())
    }

    fn display_todos(&self, todos: &[&Todo], filter: TodoFilter) {
        let counts = self.coordinator.todo_counts();
        println!(
            "All ({})  Pending ({})  Completed ({})",
            counts.all, counts.pending, counts.completed
        );
        println!("{}", separator());

        if todos.is_empty() {
            let message = match filter {
                TodoFilter::All => "No todos yet. Create your first one!",
                TodoFilter::Pending => "No pending todos. Great job!",
                TodoFilter::Completed => "No completed todos yet.",
            };
            println!("{}", message);
            return;
        }

        for todo in todos {
            let check = if todo.completed { "[x]" } else { "[ ]" };
            let title = if todo.completed {
                style(&todo.title).dim().to_string()
            } else {
                todo.title.clone()
            };
            let priority = match todo.priority {
                Priority::Low => style(todo.priority).green(),
                Priority::Medium => style(todo.priority).yellow(),
                Priority::High => style(todo.priority).red(),
            };
            let due = todo
                .due_date
                .map(|due| format!("  due {}", due.format("%b %-d")))
                .unwrap_or_default();

            println!("{} {}  ({}){}", check, title, priority, due);
            if self.verbose {
                println!("    ID: {}", todo.id);
            }
        }
    }

    // Notes

    fn handle_note(&mut self, command: NoteCommand) -> Result<()> {
        self.coordinator.select_view(View::Notes);

        match command {
            NoteCommand::List {
                search,
                json,
                detailed,
            } => {
                self.coordinator.set_note_search(search.unwrap_or_default());
                let notes = self.coordinator.visible_notes();
                if json {
                    println!("{}", serde_json::to_string_pretty(&notes)?);
                } else {
                    self.display_notes(&notes, detailed);
                }
            }

            NoteCommand::Add {
                title,
                content,
                edit,
            } => {
                let content = match content {
                    Some(content) => content,
                    None if edit => {
                        self.open_editor_for_content(title.as_deref().unwrap_or_default(), "")?
                    }
                    None => String::new(),
                };
                let form = NotePatch {
                    title: Some(title.unwrap_or_default()),
                    content: Some(content),
                    ..NotePatch::default()
                };

                self.coordinator.create_note();
                report_save("Note", self.coordinator.save_note(form));
            }

            NoteCommand::Edit {
                id,
                title,
                content,
                edit,
            } => {
                let Some(existing) = self.coordinator.notes().get(&id).cloned() else {
                    return report_missing("note", &id);
                };
                let content = match content {
                    Some(content) => Some(content),
                    None if edit => Some(self.open_editor_for_content(
                        title.as_deref().unwrap_or(&existing.title),
                        &existing.content,
                    )?),
                    None => None,
                };
                let form = NotePatch {
                    title,
                    content,
                    ..NotePatch::default()
                };

                self.coordinator.edit_note(&id);
                report_save("Note", self.coordinator.save_note(form));
            }

            NoteCommand::Show { id, json } => match self.coordinator.notes().get(&id) {
                Some(note) if json => println!("{}", serde_json::to_string_pretty(note)?),
                Some(note) => {
                    println!("{}", style(&note.title).bold());
                    println!(
                        "ID: {} | Created: {} | Updated: {}",
                        note.id,
                        note.created_at.format("%Y-%m-%d %H:%M"),
                        note.updated_at.format("%Y-%m-%d %H:%M")
                    );
                    println!("\n{}", note.content);
                }
                None => return report_missing("note", &id),
            },

            NoteCommand::Delete { id } => match self.coordinator.delete_note(&id) {
                Some(note) => println!("Deleted note '{}'", note.title),
                None => return report_missing("note", &id),
            },
        }
        Ok(())
    }

    fn display_notes(&self, notes: &[&Note], detailed: bool) {
        if notes.is_empty() {
            if self.coordinator.note_search().is_empty() {
                println!("No notes yet. Create your first one!");
            } else {
                println!("No notes found matching your search.");
            }
            return;
        }

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", separator());
            }

            println!(
                "{}  {}",
                style(&note.title).bold(),
                style(note.updated_at.format("%b %-d, %Y")).dim()
            );
            println!("ID: {}", note.id);

            if detailed {
                println!("\n{}", note.content);
            } else {
                let preview = content_preview(&note.content, 150);
                if !preview.is_empty() {
                    println!("{}", preview);
                }
            }
        }

        println!(
            "\nFound {} note{}",
            notes.len(),
            if notes.len() == 1 { "" } else { "s" }
        );
    }

    fn open_editor_for_content(&self, title: &str, existing: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        let editor_cmd = self.config.get_editor_command();
        self.write_editor_template(&temp_path, title, existing)?;

        info!("Opening editor to write note content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(process_editor_content(&content))
    }

    fn write_editor_template(&self, path: &Path, title: &str, existing: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;

        writeln!(file, "<!-- ")?;
        writeln!(file, "Writing: {}", title)?;
        writeln!(
            file,
            "Lines between <!-- and --> are comments and will be ignored."
        )?;
        writeln!(file, "Save and exit the editor when you're done.")?;
        writeln!(file, "-->")?;
        write!(file, "{}", existing)?;

        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| OrganizerError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(OrganizerError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program).args(rest).arg(file_path).status()?;

        if !status.success() {
            return Err(OrganizerError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    // Config

    fn handle_config(&mut self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        let show = show || (set.is_none() && !reset);

        if reset {
            self.config = Config::default();
            self.config.save(&self.config_path)?;
            println!("Configuration reset to defaults");
        }

        if let Some(assignment) = set {
            self.config.set(&assignment)?;
            self.config.save(&self.config_path)?;
            println!("Updated {}", assignment);
        }

        if show {
            println!("# {}", self.config_path.display());
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }

        Ok(())
    }
}

/// Drops the `<!-- ... -->` comment block written by the editor template.
fn process_editor_content(content: &str) -> String {
    let mut in_comment = false;
    let mut kept = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if !in_comment && trimmed.starts_with("<!--") {
            in_comment = !trimmed.ends_with("-->");
            continue;
        }
        if in_comment {
            if trimmed.ends_with("-->") {
                in_comment = false;
            }
            continue;
        }
        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}

/// Builds a validated event form from raw CLI fields.
fn event_form(fields: EventFields) -> Result<EventPatch> {
    Ok(EventPatch {
        id: None,
        title: fields.title,
        description: fields.description.map(Some),
        date: fields.date.as_deref().map(parse_date).transpose()?,
        start_time: fields.start.as_deref().map(parse_time).transpose()?,
        end_time: fields.end.as_deref().map(parse_time).transpose()?,
        color: fields
            .color
            .as_deref()
            .map(str::parse::<EventColor>)
            .transpose()?,
    })
}

fn print_event_line(event: &Event) {
    let swatch = Style::new().fg(palette_color(event.color)).apply_to("●");
    println!(
        "{} {}  {}-{}  {}",
        swatch,
        event.date.format("%a %b %-d"),
        event.start_time,
        event.end_time,
        style(&event.title).bold()
    );
}

fn palette_color(color: EventColor) -> Color {
    match color {
        EventColor::Orange => Color::Color256(208),
        EventColor::Yellow => Color::Yellow,
        EventColor::Lime => Color::Green,
        EventColor::Cyan => Color::Cyan,
        EventColor::Violet => Color::Magenta,
        EventColor::Pink => Color::Color256(205),
    }
}

fn separator() -> String {
    let term_width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);
    "-".repeat(term_width.min(50))
}

fn report_save(kind: &str, outcome: Option<SaveOutcome>) {
    match outcome {
        Some(SaveOutcome::Created(id)) => println!("{} created with ID: {}", kind, id),
        Some(SaveOutcome::Updated(id)) => println!("{} {} updated", kind, id),
        Some(SaveOutcome::Unmatched(id)) => {
            println!("{} {} no longer exists, nothing saved", kind, id)
        }
        None => debug!("No {} dialog open, save ignored", kind.to_lowercase()),
    }
}

fn report_missing(kind: &str, id: &str) -> Result<()> {
    println!("{}", style(format!("No {} with id {}", kind, id)).yellow());
    Ok(())
}
