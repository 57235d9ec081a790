//! View coordinator.
//!
//! Tracks which of the three views is active, the single dialog slot shared
//! by all views, and the per-view presentation state (displayed month, todo
//! filter, note search term). User intents come in here and are routed to
//! the [`AppState`].
use chrono::NaiveDate;
use log::debug;

use crate::{
    dates, AppState, Backend, Collection, Event, EventPatch, FileBackend, MonthGrid, Note,
    NotePatch, SaveOutcome, Todo, TodoCounts, TodoFilter, TodoPatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum View {
    #[default]
    Calendar,
    Todos,
    Notes,
}

/// The one dialog that may be open at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dialog {
    #[default]
    Closed,
    /// New event, optionally seeded with the day that was picked.
    CreateEvent { date: Option<NaiveDate> },
    EditEvent(Event),
    CreateTodo,
    EditTodo(Todo),
    CreateNote,
    EditNote(Note),
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Closed)
    }

    /// Id of the record being edited, if any.
    pub fn editing(&self) -> Option<&str> {
        match self {
            Dialog::EditEvent(event) => Some(&event.id),
            Dialog::EditTodo(todo) => Some(&todo.id),
            Dialog::EditNote(note) => Some(&note.id),
            _ => None,
        }
    }
}

pub struct ViewCoordinator<B: Backend = FileBackend> {
    state: AppState<B>,
    view: View,
    dialog: Dialog,
    month: NaiveDate,
    todo_filter: TodoFilter,
    note_search: String,
}

impl<B: Backend> ViewCoordinator<B> {
    pub fn new(state: AppState<B>) -> Self {
        Self {
            state,
            view: View::default(),
            dialog: Dialog::Closed,
            month: dates::start_of_month(dates::today()),
            todo_filter: TodoFilter::default(),
            note_search: String::new(),
        }
    }

    pub fn state(&self) -> &AppState<B> {
        &self.state
    }

    pub fn into_state(self) -> AppState<B> {
        self.state
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn select_view(&mut self, view: View) {
        if self.view != view {
            debug!("Switching view {:?} -> {:?}", self.view, view);
            self.view = view;
        }
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Closes whatever dialog is open without saving.
    pub fn cancel(&mut self) {
        self.dialog = Dialog::Closed;
    }

    fn open(&mut self, dialog: Dialog) {
        if self.dialog.is_open() {
            debug!("Replacing open dialog {:?}", self.dialog);
        }
        self.dialog = dialog;
    }

    // Calendar

    /// First day of the displayed month.
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn go_to_month(&mut self, day: NaiveDate) {
        self.month = dates::start_of_month(day);
    }

    pub fn previous_month(&mut self) {
        self.month = dates::shift_months(self.month, -1);
    }

    pub fn next_month(&mut self) {
        self.month = dates::shift_months(self.month, 1);
    }

    pub fn month_grid(&self, today: NaiveDate) -> MonthGrid<'_> {
        MonthGrid::build(self.state.events(), self.month, today)
    }

    pub fn events_on(&self, day: NaiveDate) -> Vec<&Event> {
        self.state.events().on_day(day)
    }

    pub fn create_event(&mut self, date: Option<NaiveDate>) {
        self.open(Dialog::CreateEvent { date });
    }

    /// Opens the edit dialog for an existing event. Returns false and leaves
    /// the dialog closed if there is no such event.
    pub fn edit_event(&mut self, id: &str) -> bool {
        match self.state.events().get(id).cloned() {
            Some(event) => {
                self.open(Dialog::EditEvent(event));
                true
            }
            None => false,
        }
    }

    /// Saves the open event dialog. Returns `None` if no event dialog is open.
    pub fn save_event(&mut self, mut form: EventPatch) -> Option<SaveOutcome> {
        match &self.dialog {
            Dialog::CreateEvent { date } => {
                form.id = None;
                form.date = form.date.or(*date);
            }
            Dialog::EditEvent(event) => form.id = Some(event.id.clone()),
            _ => return None,
        }
        self.dialog = Dialog::Closed;
        Some(self.state.save_event(form))
    }

    pub fn delete_event(&mut self, id: &str) -> Option<Event> {
        self.close_if_editing(id);
        self.state.delete_event(id)
    }

    // Todos

    pub fn todo_filter(&self) -> TodoFilter {
        self.todo_filter
    }

    pub fn set_todo_filter(&mut self, filter: TodoFilter) {
        self.todo_filter = filter;
    }

    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.state.todos().by_filter(self.todo_filter)
    }

    pub fn todo_counts(&self) -> TodoCounts {
        self.state.todos().counts()
    }

    pub fn create_todo(&mut self) {
        self.open(Dialog::CreateTodo);
    }

    pub fn edit_todo(&mut self, id: &str) -> bool {
        match self.state.todos().get(id).cloned() {
            Some(todo) => {
                self.open(Dialog::EditTodo(todo));
                true
            }
            None => false,
        }
    }

    pub fn save_todo(&mut self, mut form: TodoPatch) -> Option<SaveOutcome> {
        match &self.dialog {
            Dialog::CreateTodo => form.id = None,
            Dialog::EditTodo(todo) => form.id = Some(todo.id.clone()),
            _ => return None,
        }
        self.dialog = Dialog::Closed;
        Some(self.state.save_todo(form))
    }

    pub fn toggle_todo(&mut self, id: &str) -> Option<bool> {
        self.state.toggle_todo(id)
    }

    pub fn delete_todo(&mut self, id: &str) -> Option<Todo> {
        self.close_if_editing(id);
        self.state.delete_todo(id)
    }

    // Notes

    pub fn note_search(&self) -> &str {
        &self.note_search
    }

    pub fn set_note_search(&mut self, term: impl Into<String>) {
        self.note_search = term.into();
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.state.notes().search(&self.note_search)
    }

    pub fn create_note(&mut self) {
        self.open(Dialog::CreateNote);
    }

    pub fn edit_note(&mut self, id: &str) -> bool {
        match self.state.notes().get(id).cloned() {
            Some(note) => {
                self.open(Dialog::EditNote(note));
                true
            }
            None => false,
        }
    }

    pub fn save_note(&mut self, mut form: NotePatch) -> Option<SaveOutcome> {
        match &self.dialog {
            Dialog::CreateNote => form.id = None,
            Dialog::EditNote(note) => form.id = Some(note.id.clone()),
            _ => return None,
        }
        self.dialog = Dialog::Closed;
        Some(self.state.save_note(form))
    }

    pub fn delete_note(&mut self, id: &str) -> Option<Note> {
        self.close_if_editing(id);
        self.state.delete_note(id)
    }

    /// Deletes the record open in the edit dialog and closes it.
    pub fn delete_in_dialog(&mut self) -> bool {
        let dialog = std::mem::take(&mut self.dialog);
        match dialog {
            Dialog::EditEvent(event) => self.state.delete_event(&event.id).is_some(),
            Dialog::EditTodo(todo) => self.state.delete_todo(&todo.id).is_some(),
            Dialog::EditNote(note) => self.state.delete_note(&note.id).is_some(),
            _ => false,
        }
    }

    pub fn events(&self) -> &Collection<Event> {
        self.state.events()
    }

    pub fn todos(&self) -> &Collection<Todo> {
        self.state.todos()
    }

    pub fn notes(&self) -> &Collection<Note> {
        self.state.notes()
    }

    fn close_if_editing(&mut self, id: &str) {
        if self.dialog.editing() == Some(id) {
            self.dialog = Dialog::Closed;
        }
    }
}
