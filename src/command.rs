//! Textual commands for driving a [`SessionController`] from a terminal.
//!
//! One command per line. Arguments are whitespace separated; wrap an
//! argument in double quotes to keep spaces, and use `\n`, `\t`, `\"` or
//! `\\` escapes inside arguments.
//!
//! ```text
//! open notes.txt
//! mode append
//! upper
//! replace "WORLD" "EARTH"
//! count "EA"
//! save "Signed off\nby me"
//! ```

use crate::error::TextHelperError;
use crate::export::ExportArtifact;
use crate::reader;
use crate::session::{Direction, Mode, SessionController};
use crate::transform::Transform;
use std::path::PathBuf;
use std::str::FromStr;

/// Summary printed by `help`.
pub const HELP: &str = "\
Commands:
  open <path>            load a .txt or .pdf file
  mode read|append       select the open mode (PDFs stay in read)
  next | prev            page navigation
  upper | lower | strip | capitalize | title
                         transform the working text (append mode)
  replace <old> <new>    replace every occurrence
  count <sub>            count non-overlapping occurrences
  edit <text>            overwrite the working text
  show                   print the current page
  preview                print the first lines of the current page
  stats                  lines / words / characters
  save [extra]           export with optional appended text
  help                   this text
  quit                   leave";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    SetMode(Mode),
    Navigate(Direction),
    Transform(Transform),
    Replace { old: String, new: String },
    Count(String),
    Edit(String),
    Show,
    Preview,
    Stats,
    Save { extra: String },
    Help,
    Quit,
}

/// What the front end should do with a command's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A short status line.
    Message(String),
    /// Document text to print as is.
    Text(String),
    /// An export ready to be written.
    Artifact(ExportArtifact),
    /// Leave the loop.
    Quit,
}

impl FromStr for Command {
    type Err = TextHelperError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(line)?;
        let Some((head, args)) = tokens.split_first() else {
            return Err(TextHelperError::InvalidCommand("empty command".into()));
        };

        let cmd = match head.to_lowercase().as_str() {
            "open" => Command::Open(PathBuf::from(exactly_one(head, args)?)),
            "mode" => Command::SetMode(exactly_one(head, args)?.parse()?),
            "next" | "n" => no_args(head, args, Command::Navigate(Direction::Next))?,
            "prev" | "p" => no_args(head, args, Command::Navigate(Direction::Prev))?,
            "replace" => match args {
                [old, new] => Command::Replace {
                    old: old.clone(),
                    new: new.clone(),
                },
                _ => {
                    return Err(TextHelperError::InvalidCommand(
                        "usage: replace <old> <new>".into(),
                    ))
                }
            },
            "count" => Command::Count(exactly_one(head, args)?),
            "edit" => Command::Edit(args.join(" ")),
            "show" => no_args(head, args, Command::Show)?,
            "preview" => no_args(head, args, Command::Preview)?,
            "stats" => no_args(head, args, Command::Stats)?,
            "save" => Command::Save {
                extra: args.join(" "),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => match other.parse::<Transform>() {
                Ok(t) => no_args(head, args, Command::Transform(t))?,
                Err(_) => {
                    return Err(TextHelperError::InvalidCommand(format!(
                        "unknown command '{other}' (try 'help')"
                    )))
                }
            },
        };
        Ok(cmd)
    }
}

impl Command {
    /// Run this command against `controller`.
    pub fn execute(self, controller: &mut SessionController) -> Result<Reply, TextHelperError> {
        let reply = match self {
            Command::Open(path) => {
                let bytes = std::fs::read(&path).map_err(|e| TextHelperError::ReadFailed {
                    path: path.clone(),
                    source: e,
                })?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let doc = controller.load(&file_name, &bytes)?;
                Reply::Message(format!(
                    "Opened {} ({} page{})",
                    doc.file_name(),
                    doc.page_count(),
                    if doc.page_count() == 1 { "" } else { "s" }
                ))
            }
            Command::SetMode(mode) => {
                let effective = controller.set_mode(mode)?;
                if effective != mode {
                    Reply::Message(format!(
                        "PDF files are read-only; mode stays {effective}."
                    ))
                } else {
                    Reply::Message(format!("Mode: {effective}"))
                }
            }
            Command::Navigate(direction) => {
                controller.navigate(direction);
                Reply::Message(
                    controller
                        .page_label()
                        .ok_or(TextHelperError::NoDocument)?,
                )
            }
            Command::Transform(t) => {
                controller.apply_transform(t)?;
                Reply::Message(t.describe().to_string())
            }
            Command::Replace { old, new } => {
                controller.replace(&old, &new)?;
                Reply::Message(format!("Replaced all occurrences of '{old}' with '{new}'."))
            }
            Command::Count(sub) => {
                let n = controller.count(&sub)?;
                Reply::Message(format!("'{sub}' appears {n} times in the current text."))
            }
            Command::Edit(text) => {
                controller.manual_edit(text)?;
                Reply::Message("Text updated.".into())
            }
            Command::Show => {
                let doc = controller.document().ok_or(TextHelperError::NoDocument)?;
                let page = controller.current_page_text().unwrap_or_default();
                let index = controller.page_index().unwrap_or(0);
                Reply::Text(reader::render_page(
                    doc.file_name(),
                    index,
                    doc.page_count(),
                    page,
                ))
            }
            Command::Preview => {
                Reply::Text(controller.preview().ok_or(TextHelperError::NoDocument)?)
            }
            Command::Stats => {
                let stats = controller.stats().ok_or(TextHelperError::NoDocument)?;
                let mut line = format!(
                    "Lines: {}    Words: {}    Characters: {}",
                    stats.lines, stats.words, stats.characters
                );
                if let Some(n) = controller.last_count() {
                    line.push_str(&format!("\nLast count result: {n}"));
                }
                Reply::Message(line)
            }
            Command::Save { extra } => Reply::Artifact(controller.export(&extra)?),
            Command::Help => Reply::Message(HELP.to_string()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }
}

// ── Tokenising ───────────────────────────────────────────────────────────────

/// Split a command line into arguments, honouring quotes and escapes.
pub fn tokenize(line: &str) -> Result<Vec<String>, TextHelperError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = match chars.next() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some(other) => other,
                    None => {
                        return Err(TextHelperError::InvalidCommand(
                            "dangling '\\' at end of line".into(),
                        ))
                    }
                };
                current.push(escaped);
                started = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if in_quotes {
        return Err(TextHelperError::InvalidCommand("unterminated quote".into()));
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}

fn exactly_one(head: &str, args: &[String]) -> Result<String, TextHelperError> {
    match args {
        [one] => Ok(one.clone()),
        _ => Err(TextHelperError::InvalidCommand(format!(
            "'{head}' takes exactly one argument, got {}",
            args.len()
        ))),
    }
}

fn no_args(head: &str, args: &[String], cmd: Command) -> Result<Command, TextHelperError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(TextHelperError::InvalidCommand(format!(
            "'{head}' takes no arguments"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::load::DocumentLoader;

    fn parse(s: &str) -> Command {
        s.parse().unwrap()
    }

    #[test]
    fn tokenize_quotes_and_escapes() {
        assert_eq!(tokenize("a  b").unwrap(), vec!["a", "b"]);
        assert_eq!(tokenize(r#"replace "a b" c"#).unwrap(), vec!["replace", "a b", "c"]);
        assert_eq!(tokenize(r#"count """#).unwrap(), vec!["count", ""]);
        assert_eq!(tokenize(r#"edit line1\nline2"#).unwrap(), vec!["edit", "line1\nline2"]);
        assert_eq!(tokenize(r#"say \"hi\""#).unwrap(), vec!["say", "\"hi\""]);
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn tokenize_errors() {
        assert!(tokenize(r#"replace "open"#).is_err());
        assert!(tokenize("oops \\").is_err());
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse("next"), Command::Navigate(Direction::Next));
        assert_eq!(parse("PREV"), Command::Navigate(Direction::Prev));
        assert_eq!(parse("upper"), Command::Transform(Transform::Upper));
        assert_eq!(parse("title"), Command::Transform(Transform::Title));
        assert_eq!(parse("mode append"), Command::SetMode(Mode::Append));
        assert_eq!(parse("show"), Command::Show);
        assert_eq!(parse("preview"), Command::Preview);
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(
            parse(r#"open "my notes.txt""#),
            Command::Open(PathBuf::from("my notes.txt"))
        );
    }

    #[test]
    fn parse_arguments() {
        assert_eq!(
            parse(r#"replace WORLD "big EARTH""#),
            Command::Replace {
                old: "WORLD".into(),
                new: "big EARTH".into()
            }
        );
        assert_eq!(parse("count ab"), Command::Count("ab".into()));
        assert_eq!(parse("edit hello there"), Command::Edit("hello there".into()));
        assert_eq!(parse("save"), Command::Save { extra: String::new() });
        assert_eq!(
            parse(r#"save "PS\nbye""#),
            Command::Save {
                extra: "PS\nbye".into()
            }
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        for bad in ["", "frobnicate", "replace onlyone", "count", "count a b", "next 2", "mode write"] {
            assert!(bad.parse::<Command>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn execute_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greeting.txt");
        std::fs::write(&path, "Hello\nWorld").unwrap();

        let config = SessionConfig::default();
        let loader = DocumentLoader::text_only(&config);
        let mut controller = SessionController::new(config, loader);

        let run = |c: &mut SessionController, line: &str| line.parse::<Command>().unwrap().execute(c);

        assert!(matches!(
            run(&mut controller, &format!("open \"{}\"", path.display())).unwrap(),
            Reply::Message(m) if m.contains("greeting.txt")
        ));
        assert!(run(&mut controller, "upper").is_err());
        run(&mut controller, "mode append").unwrap();
        run(&mut controller, "upper").unwrap();
        run(&mut controller, "replace WORLD EARTH").unwrap();
        assert_eq!(controller.current_text(), Some("HELLO\nEARTH"));

        match run(&mut controller, "count L").unwrap() {
            Reply::Message(m) => assert!(m.contains("2 times"), "got {m}"),
            other => panic!("unexpected {other:?}"),
        }
        match run(&mut controller, "stats").unwrap() {
            Reply::Message(m) => {
                assert!(m.contains("Words: 2"));
                assert!(m.contains("Last count result: 2"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            run(&mut controller, "preview").unwrap(),
            Reply::Text("HELLO\nEARTH".into())
        );
        match run(&mut controller, "save").unwrap() {
            Reply::Artifact(a) => assert_eq!(a.file_name, "greeting_edited.txt"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(run(&mut controller, "quit").unwrap(), Reply::Quit);
    }
}
