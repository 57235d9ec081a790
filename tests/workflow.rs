use chrono::NaiveDate;
use organizer::{
    AppState, Dialog, EventColor, EventPatch, FileBackend, NotePatch, PersistedStore, Priority,
    StorageKeys, TodoFilter, TodoPatch, View, ViewCoordinator, UNTITLED_NOTE,
};
use tempfile::{tempdir, TempDir};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn coordinator() -> (TempDir, ViewCoordinator<FileBackend>) {
    let dir = tempdir().unwrap();
    let store = PersistedStore::new(FileBackend::open(dir.path()).unwrap());
    let state = AppState::load(store, StorageKeys::default());
    (dir, ViewCoordinator::new(state))
}

fn reopen(dir: &TempDir) -> AppState<FileBackend> {
    let store = PersistedStore::new(FileBackend::open(dir.path()).unwrap());
    AppState::load(store, StorageKeys::default())
}

#[test]
fn picking_a_day_and_saving_an_event() {
    let (dir, mut app) = coordinator();
    app.go_to_month(ymd(2024, 6, 15));
    app.create_event(Some(ymd(2024, 6, 3)));
    assert_eq!(app.view(), View::Calendar);

    let outcome = app
        .save_event(EventPatch {
            title: Some("Standup".to_string()),
            start_time: Some("09:00".to_string()),
            end_time: Some("09:15".to_string()),
            ..EventPatch::default()
        })
        .unwrap();
    assert!(outcome.changed());
    assert!(!app.dialog().is_open());

    let grid = app.month_grid(ymd(2024, 6, 3));
    assert_eq!(grid.title(), "June 2024");
    assert_eq!(grid.event_count(), 1);
    let cell = grid.days().find(|cell| cell.date == ymd(2024, 6, 3)).unwrap();
    assert!(cell.is_today);
    assert_eq!(cell.events[0].title, "Standup");
    assert_eq!(cell.events[0].color, EventColor::Orange);

    let stored = reopen(&dir);
    assert_eq!(stored.events().on_day(ymd(2024, 6, 3)).len(), 1);
}

#[test]
fn editing_an_event_keeps_its_identity() {
    let (_dir, mut app) = coordinator();
    app.create_event(Some(ymd(2024, 6, 3)));
    let id = app
        .save_event(EventPatch {
            title: Some("Standup".to_string()),
            ..EventPatch::default()
        })
        .unwrap()
        .id()
        .to_string();
    let created_at = app.events().get(&id).unwrap().created_at;

    assert!(app.edit_event(&id));
    // A stray id in the form must not redirect the save.
    app.save_event(EventPatch {
        id: Some("someone-else".to_string()),
        date: Some(ymd(2024, 6, 4)),
        color: Some(EventColor::Pink),
        ..EventPatch::default()
    });

    assert_eq!(app.events().len(), 1);
    let event = app.events().get(&id).unwrap();
    assert_eq!(event.title, "Standup");
    assert_eq!(event.date, ymd(2024, 6, 4));
    assert_eq!(event.color, EventColor::Pink);
    assert_eq!(event.created_at, created_at);
    assert!(app.events_on(ymd(2024, 6, 3)).is_empty());
}

#[test]
fn deleting_the_edited_record_closes_the_dialog() {
    let (dir, mut app) = coordinator();
    app.create_todo();
    let id = app
        .save_todo(TodoPatch {
            title: Some("Water plants".to_string()),
            ..TodoPatch::default()
        })
        .unwrap()
        .id()
        .to_string();

    assert!(app.edit_todo(&id));
    assert!(app.delete_in_dialog());
    assert_eq!(app.dialog(), &Dialog::Closed);
    assert!(app.todos().is_empty());
    assert!(reopen(&dir).todos().is_empty());
}

#[test]
fn todo_filters_and_counts() {
    let (_dir, mut app) = coordinator();
    app.select_view(View::Todos);
    let mut ids = Vec::new();
    for (title, priority) in [
        ("Pay rent", Priority::High),
        ("Buy milk", Priority::Low),
        ("Call mom", Priority::Medium),
    ] {
        app.create_todo();
        let outcome = app
            .save_todo(TodoPatch {
                title: Some(title.to_string()),
                priority: Some(priority),
                ..TodoPatch::default()
            })
            .unwrap();
        ids.push(outcome.id().to_string());
    }

    assert_eq!(app.toggle_todo(&ids[1]), Some(true));
    assert_eq!(app.toggle_todo("missing"), None);

    let counts = app.todo_counts();
    assert_eq!((counts.all, counts.pending, counts.completed), (3, 2, 1));

    app.set_todo_filter(TodoFilter::Completed);
    let done: Vec<_> = app.visible_todos().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(done, vec!["Buy milk"]);

    app.set_todo_filter(TodoFilter::Pending);
    assert_eq!(app.visible_todos().len(), 2);

    assert_eq!(app.toggle_todo(&ids[1]), Some(false));
    assert_eq!(app.visible_todos().len(), 3);
}

#[test]
fn notes_are_titled_searched_and_touched() {
    let (_dir, mut app) = coordinator();
    app.select_view(View::Notes);

    app.create_note();
    let blank = app
        .save_note(NotePatch {
            title: Some("   ".to_string()),
            content: Some("Groceries: eggs, Milk".to_string()),
            ..NotePatch::default()
        })
        .unwrap()
        .id()
        .to_string();
    app.create_note();
    app.save_note(NotePatch {
        title: Some("Reading list".to_string()),
        content: Some("Dune".to_string()),
        ..NotePatch::default()
    });

    assert_eq!(app.notes().get(&blank).unwrap().title, UNTITLED_NOTE);

    app.set_note_search("MILK");
    let found: Vec<_> = app.visible_notes().iter().map(|n| n.id.clone()).collect();
    assert_eq!(found, vec![blank.clone()]);
    app.set_note_search("");
    assert_eq!(app.visible_notes().len(), 2);

    let before = app.notes().get(&blank).unwrap().updated_at;
    assert!(app.edit_note(&blank));
    app.save_note(NotePatch {
        content: Some("Groceries: eggs".to_string()),
        ..NotePatch::default()
    });
    let note = app.notes().get(&blank).unwrap();
    assert!(note.updated_at > before);
    assert_eq!(note.title, UNTITLED_NOTE);
}

#[test]
fn switching_views_keeps_the_dialog_and_month() {
    let (_dir, mut app) = coordinator();
    app.go_to_month(ymd(2024, 1, 20));
    app.previous_month();
    assert_eq!(app.month(), ymd(2023, 12, 1));

    app.create_note();
    app.select_view(View::Todos);
    assert_eq!(app.dialog(), &Dialog::CreateNote);
    assert_eq!(app.month(), ymd(2023, 12, 1));

    // A save aimed at a different kind of dialog is ignored.
    assert!(app
        .save_todo(TodoPatch {
            title: Some("Nope".to_string()),
            ..TodoPatch::default()
        })
        .is_none());
    assert!(app.todos().is_empty());

    app.cancel();
    assert!(!app.dialog().is_open());
}
