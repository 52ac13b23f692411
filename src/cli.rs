//! Line commands of the terminal front end

use crate::app::LibraryApp;
use crate::render::{render, render_transaction};
use crate::view::with_view;
use std::fmt::Write;
use std::future::Future;
use tokio_util::sync::CancellationToken;

pub const HELP: &str = "\
Commands:
  type <text>      edit the search field (searches once typing settles)
  search [text]    search now, with <text> or the current search field
  all              list all books
  available        list available books
  user <id>        act as user <id>
  recommend        recommendations for the current user
  loan <isbn>      borrow a book
  return <isbn>    return a book
  stats            refresh statistics
  users            list users
  transactions     list transactions
  dismiss <id>     dismiss an alert
  show             redraw the view
  help             this text
  quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Search(Option<String>),
    All,
    Available,
    User(String),
    Recommend,
    Loan(String),
    Return(String),
    Stats,
    Users,
    Transactions,
    Dismiss(u64),
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Returns a usage message for malformed input.
    ///
    /// # Errors
    ///
    /// Returns a message describing the expected syntax when the line is not a command
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim();

        let required = |usage: &str| {
            if arg.is_empty() {
                Err(format!("Usage: {usage}"))
            } else {
                Ok(arg.to_string())
            }
        };

        match word.trim() {
            // the raw remainder is kept so trailing spaces reach the search field
            "type" => Ok(Command::Type(rest.to_string())),
            "search" => Ok(Command::Search((!arg.is_empty()).then(|| arg.to_string()))),
            "all" => Ok(Command::All),
            "available" => Ok(Command::Available),
            "user" => required("user <id>").map(Command::User),
            "recommend" => Ok(Command::Recommend),
            "loan" => required("loan <isbn>").map(Command::Loan),
            "return" => required("return <isbn>").map(Command::Return),
            "stats" => Ok(Command::Stats),
            "users" => Ok(Command::Users),
            "transactions" => Ok(Command::Transactions),
            "dismiss" => arg
                .parse()
                .map(Command::Dismiss)
                .map_err(|_| "Usage: dismiss <alert-id>".to_string()),
            "" | "show" => Ok(Command::Show),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command: {other} (try `help`)")),
        }
    }
}

/// Runs a command and returns the text to print, or `None` to exit
pub async fn execute(app: &LibraryApp, command: Command) -> Option<String> {
    let mut extra = String::new();

    match command {
        Command::Type(text) => {
            app.on_search_input(&text);
            extra.push_str("(search scheduled)\n");
        }
        Command::Search(Some(text)) => {
            app.set_query(&text);
            app.submit_search().await;
        }
        Command::Search(None) => app.submit_search().await,
        Command::All => {
            app.load_all_books().await;
        }
        Command::Available => {
            app.load_available_books().await;
        }
        Command::User(id) => app.set_user(&id),
        Command::Recommend => app.recommendations().await,
        Command::Loan(isbn) => {
            app.loan(&isbn).await;
        }
        Command::Return(isbn) => {
            app.return_book(&isbn).await;
        }
        Command::Stats => {
            app.load_stats().await;
        }
        Command::Users => {
            if app.load_users().await {
                with_view(app.view(), |view| {
                    for user in &view.users {
                        let _ = writeln!(
                            extra,
                            "{} {}",
                            user.id,
                            user.name.as_deref().unwrap_or_default()
                        );
                    }
                });
            }
        }
        Command::Transactions => {
            for transaction in app.transactions().await {
                extra.push_str(&render_transaction(&transaction));
            }
        }
        Command::Dismiss(id) => {
            if !app.dismiss_alert(id) {
                let _ = writeln!(extra, "No alert #{id}");
            }
        }
        Command::Show => {}
        Command::Help => return Some(format!("{HELP}\n")),
        Command::Quit => return None,
    }

    let view = with_view(app.view(), |view| render(view));
    Some(format!("{extra}{view}"))
}

/// Runs `work` unless `cancel` fires first. `None` means it was interrupted and
/// `work` was dropped.
pub async fn interruptible<F: Future>(cancel: &CancellationToken, work: F) -> Option<F::Output> {
    tokio::select! {
        () = cancel.cancelled() => None,
        output = work => Some(output),
    }
}
