use std::fs;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};

use picpick::view::{Focus, PromptKind};
use picpick::{App, Controller, Model, Sorter, Tag, TerminalView, TransferMode};

fn app(images: &[&Path], sorter: Option<Sorter>) -> App {
    let mut controller = Controller::new(Model::new(), TerminalView::new());
    controller.add_images(images.iter().map(|path| path.to_path_buf()));
    App::new(controller, sorter)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn test_add_and_toggle_tags() {
    let mut app = app(&[Path::new("one.jpg")], None);

    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "red");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('1'));

    let red = Tag::new("red").unwrap();
    let view = app.controller().view();
    assert_eq!(view.tags(), [red.clone()]);
    assert!(view.is_checked(&red));
    assert!(app.controller().current_image().unwrap().has_tag(&red));
    assert!(screen(&app).contains("[x] 1 red"));

    press(&mut app, KeyCode::Char('1'));
    assert!(!app.controller().current_image().unwrap().has_tag(&red));
}

#[test]
fn test_rename_highlighted_tag() {
    let mut app = app(&[Path::new("one.jpg")], None);
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "red");
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char('r'));
    for _ in 0.."red".len() {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "crimson");
    press(&mut app, KeyCode::Enter);

    let names: Vec<&str> = app.controller().tags().into_iter().map(|tag| tag.name()).collect();
    assert_eq!(names, ["crimson"]);
}

#[test]
fn test_business_error_shows_overlay() {
    let mut app = app(&[], None);
    for _ in 0..2 {
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "red");
        press(&mut app, KeyCode::Enter);
    }

    let message = app.controller().view().error_message().unwrap();
    assert!(message.contains("already present"));

    // other keys are swallowed until the error is dismissed
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit());
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.controller().view().error_message(), None);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit());
}

#[test]
fn test_save_asks_for_location_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&[Path::new("one.jpg"), Path::new("two.jpg")], None);

    press(&mut app, KeyCode::Char('s'));
    assert_eq!(
        app.controller().view().prompt().map(|prompt| &prompt.kind),
        Some(&PromptKind::SaveAs)
    );

    type_text(&mut app, dir.path().join("holiday").to_str().unwrap());
    press(&mut app, KeyCode::Enter);

    let saved = dir.path().join("holiday.picpick");
    assert!(saved.is_file());
    assert_eq!(app.controller().save_location(), Some(saved.as_path()));
    assert!(!app.controller().view().is_dirty());

    // afterwards plain save writes without asking
    press(&mut app, KeyCode::Char('n'));
    assert!(app.controller().view().is_dirty());
    press(&mut app, KeyCode::Char('s'));
    assert!(app.controller().view().prompt().is_none());
    assert!(!app.controller().view().is_dirty());
}

#[test]
fn test_release_events_are_ignored() {
    let mut app = app(&[], None);
    let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    key.kind = KeyEventKind::Release;

    app.handle_key_event(key);

    assert!(!app.should_quit());
}

#[test]
fn test_sorting_run() {
    let dir = tempfile::tempdir().unwrap();
    let liked = dir.path().join("liked");
    let rest = dir.path().join("rest");
    fs::create_dir(&liked).unwrap();
    fs::create_dir(&rest).unwrap();
    let a = dir.path().join("a.jpg");
    let b = dir.path().join("b.jpg");
    fs::write(&a, "a").unwrap();
    fs::write(&b, "b").unwrap();

    let sorter = Sorter::new([liked.clone(), rest.clone()], TransferMode::Move);
    let mut app = app(&[a.as_path(), b.as_path()], Some(sorter));

    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.controller().view().focus(), Focus::Outputs);

    press(&mut app, KeyCode::Enter); // a -> liked
    assert_eq!(app.controller().current_image().unwrap().display_name(), "b.jpg");
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter); // b -> rest, last image
    assert_eq!(app.sorter().unwrap().pending(), 2);
    assert_eq!(
        app.controller().view().prompt().map(|prompt| &prompt.kind),
        Some(&PromptKind::ConfirmPerform)
    );

    press(&mut app, KeyCode::Char('y'));

    assert!(liked.join("a.jpg").is_file());
    assert!(rest.join("b.jpg").is_file());
    assert!(!a.exists());
    assert!(!b.exists());
    assert_eq!(app.sorter().unwrap().pending(), 0);
    assert_eq!(app.controller().view().status(), Some("Moved 2 image(s)"));

    // the project follows the files into their outputs
    let paths: Vec<_> = app
        .controller()
        .images()
        .iter()
        .map(|image| image.path().to_path_buf())
        .collect();
    assert_eq!(paths, [liked.join("a.jpg"), rest.join("b.jpg")]);
    assert_eq!(
        app.controller().current_image().unwrap().path(),
        rest.join("b.jpg").as_path()
    );
    app.controller().model().validate().unwrap();
}

#[test]
fn test_file_list_counts_follow_tag_deletion() {
    let red = Tag::new("red").unwrap();
    let mut app = app(&[Path::new("a.jpg"), Path::new("b.jpg")], None);
    let controller = app.controller_mut();
    controller.add_tag(red.clone()).unwrap();
    controller.next_image().unwrap();
    controller.tag_current_image(&red);
    controller.previous_image().unwrap();
    assert!(screen(&app).contains("b.jpg (1)"));

    app.controller_mut().delete_tag(&red);

    let screen = screen(&app);
    assert!(screen.contains("b.jpg"));
    assert!(!screen.contains("b.jpg (1)"));
}
