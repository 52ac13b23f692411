mod common;

use bookdesk::app::LibraryApp;
use bookdesk::cli::{execute, Command};
use bookdesk::view::with_view;
use common::MockLibrary;

async fn run(app: &LibraryApp, line: &str) -> Option<String> {
    let command = Command::parse(line).expect("Failed to parse command");
    execute(app, command).await
}

#[tokio::test]
async fn test_session_renders_after_each_command() {
    let mock = MockLibrary::with_fixture().await;
    let app = LibraryApp::from_config(&mock.config()).expect("Failed to build library app");

    let output = run(&app, "stats").await.unwrap();
    assert!(output.contains("Books: 10 | Available: 6 | Users: 4 | Transactions: 2"));

    let output = run(&app, "user U001").await.unwrap();
    assert!(output.contains("Acting as user U001"));

    let output = run(&app, "loan 978-0553293357").await.unwrap();
    assert!(output.contains("[ok] #1 Book borrowed"));
    assert!(output.contains("== Available Books (5) =="));
    assert!(output.contains("Books: 10 | Available: 5 | Users: 4 | Transactions: 3"));

    let output = run(&app, "dismiss 1").await.unwrap();
    assert!(!output.contains("Book borrowed"));

    let output = run(&app, "dismiss 1").await.unwrap();
    assert!(output.contains("No alert #1"));

    assert!(run(&app, "quit").await.is_none());
}

#[tokio::test]
async fn test_users_and_transactions_listings() {
    let mock = MockLibrary::with_fixture().await;
    let app = LibraryApp::from_config(&mock.config()).expect("Failed to build library app");

    let output = run(&app, "users").await.unwrap();
    assert!(output.contains("U001 Alice Martin"));
    assert!(output.contains("U004 David Leroy"));

    let output = run(&app, "transactions").await.unwrap();
    assert!(output.contains("Loan 01/03/2024 user=U002 book=978-0451524935"));
    assert!(output.contains("Loan 02/03/2024 user=U003 book=978-0141439518"));
}

#[tokio::test]
async fn test_default_user_from_config() {
    let mock = MockLibrary::with_fixture().await;
    let mut config = mock.config();
    config.default_user = Some("U002".to_string());
    let app = LibraryApp::from_config(&config).expect("Failed to build library app");

    let output = run(&app, "recommend").await.unwrap();
    assert!(output.contains("== Recommendations for U002 (2) =="));
}

#[tokio::test]
async fn test_search_text_becomes_the_search_field() {
    let mock = MockLibrary::with_fixture().await;
    let app = LibraryApp::from_config(&mock.config()).expect("Failed to build library app");

    let output = run(&app, "search hobbit").await.unwrap();
    assert!(output.contains("== Results for \"hobbit\" (1) =="));
    assert_eq!(with_view(app.view(), |view| view.query.clone()), "hobbit");

    let output = run(&app, "search").await.unwrap();
    assert!(output.contains("== Results for \"hobbit\" (1) =="));
    assert_eq!(mock.searches(), vec!["hobbit".to_string(), "hobbit".to_string()]);
}
