//! Line-oriented front end for a record store.
//!
//! Reads one command per line, applies it to the store and re-renders the
//! view whenever the store reports a change.

use crate::error::{DeskError, Result};
use crate::records::{RecordStore, StoreConfig};
use crate::subscriptions::{StoreEvent, SubscriptionConfig, SubscriptionHandle};
use crate::types::Record;
use crossbeam_channel::TryRecvError;
use std::io::{BufRead, Write};
use tracing::debug;

const HELP: &str = "\
commands:
  set <key> [value]   add a record or replace its value
  del <key>           delete a record
  get <key>           show one record
  list                show every record
  clear               delete every record
  help                show this text
  quit                leave";

/// A parsed console command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Delete { key: String },
    Get { key: String },
    List,
    Clear,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// The value of `set` is the rest of the line after the key, so it may
    /// contain spaces or be empty.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        let command = match verb {
            "set" | "add" => {
                let (key, value) = split_word(rest);
                Command::Set {
                    key: required_key(verb, key)?,
                    value: value.to_string(),
                }
            }
            "del" | "delete" | "rm" => Command::Delete {
                key: required_key(verb, rest)?,
            },
            "get" => Command::Get {
                key: required_key(verb, rest)?,
            },
            "list" | "ls" => Command::List,
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(DeskError::InvalidCommand(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };

        Ok(Some(command))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], s[at..].trim_start()),
        None => (s, ""),
    }
}

/// Empty keys are refused here, before they reach the store.
fn required_key(verb: &str, key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(DeskError::InvalidCommand(format!("{} needs a key", verb)));
    }
    Ok(key.to_string())
}

/// How the view is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewFormat {
    #[default]
    Table,
    Json,
}

/// Render records as a two-column Key/Value table.
pub fn render_table(records: &[Record]) -> String {
    if records.is_empty() {
        return "(no records)".to_string();
    }

    let key_width = records
        .iter()
        .map(|r| r.key.chars().count())
        .max()
        .unwrap_or(0)
        .max("Key".len());

    let mut out = format!("{:<width$} | Value\n", "Key", width = key_width);
    out.push_str(&"-".repeat(key_width));
    out.push_str("-+------");
    for record in records {
        out.push('\n');
        out.push_str(&format!(
            "{:<width$} | {}",
            record.key,
            record.value,
            width = key_width
        ));
    }
    out
}

/// Render records as a JSON array of `{key, value}` objects.
pub fn render_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// What a command produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Text to show the user.
    Text(String),
    /// Nothing to show.
    Silent,
    /// The session should end.
    Quit,
}

/// Interactive session over a store.
pub struct Console {
    store: RecordStore,
    format: ViewFormat,
    changes: SubscriptionHandle,
}

impl Console {
    pub fn new(config: StoreConfig, format: ViewFormat) -> Self {
        let store = RecordStore::with_config(config);
        let changes = store.subscribe(SubscriptionConfig::default());
        Self {
            store,
            format,
            changes,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Apply one command.
    ///
    /// Mutations that change the store reply with the re-rendered view.
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        debug!(?command, "console command");

        match command {
            Command::Set { key, value } => {
                if !self.store.add_or_update(&key, &value) {
                    return Ok(Reply::Text(format!("rejected key '{}'", key)));
                }
            }
            Command::Delete { key } => {
                if !self.store.delete(&key) {
                    return Ok(Reply::Text(format!("no record for key '{}'", key)));
                }
            }
            Command::Clear => {
                self.store.clear();
            }
            Command::Get { key } => {
                let text = match self.store.get(&key) {
                    Some(record) => record.to_string(),
                    None => format!("no record for key '{}'", key),
                };
                return Ok(Reply::Text(text));
            }
            Command::List => return self.render().map(Reply::Text),
            Command::Help => return Ok(Reply::Text(HELP.to_string())),
            Command::Quit => return Ok(Reply::Quit),
        }

        if self.drain_changes() {
            self.render().map(Reply::Text)
        } else {
            Ok(Reply::Silent)
        }
    }

    /// Read commands from `input` until EOF or `quit`, writing replies to
    /// `output`. Bad command lines are reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            let reply = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(command)?,
                Ok(None) => Reply::Silent,
                Err(e) => Reply::Text(e.to_string()),
            };

            match reply {
                Reply::Text(text) => writeln!(output, "{}", text)?,
                Reply::Silent => {}
                Reply::Quit => break,
            }
            output.flush()?;
        }
        Ok(())
    }

    /// True if the store reported any change since the last call.
    fn drain_changes(&mut self) -> bool {
        let changed = self
            .changes
            .drain()
            .iter()
            .any(|event| !matches!(event, StoreEvent::CaughtUp));

        // Dropped for falling behind: resubscribe and assume a change.
        if let Err(TryRecvError::Disconnected) = self.changes.try_recv() {
            self.changes = self.store.subscribe(SubscriptionConfig::default());
            return true;
        }
        changed
    }

    fn render(&self) -> Result<String> {
        let view = self.store.view();
        match self.format {
            ViewFormat::Table => Ok(view.with(render_table)),
            ViewFormat::Json => view.with(render_json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(console: &mut Console, script: &str) -> String {
        let mut out = Vec::new();
        console.run(Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_set_keeps_value_spaces() {
        let cmd = Command::parse("set greeting hello  world").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Set {
                key: "greeting".into(),
                value: "hello  world".into()
            })
        );
    }

    #[test]
    fn test_parse_set_without_value() {
        let cmd = Command::parse("set k").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Set {
                key: "k".into(),
                value: String::new()
            })
        );
    }

    #[test]
    fn test_parse_blank_and_errors() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(matches!(
            Command::parse("set"),
            Err(DeskError::InvalidCommand(_))
        ));
        assert!(matches!(
            Command::parse("frobnicate x"),
            Err(DeskError::InvalidCommand(_))
        ));
        assert_eq!(Command::parse("del x").unwrap(), Some(Command::Delete { key: "x".into() }));
    }

    #[test]
    fn test_render_table() {
        let records = vec![Record::new("x", "1"), Record::new("long-key", "")];
        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Key      | Value");
        assert_eq!(lines[1], "---------+------");
        assert_eq!(lines[2], "x        | 1");
        assert_eq!(lines[3], "long-key | ");
        assert_eq!(render_table(&[]), "(no records)");
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&[Record::new("x", "1")]).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![Record::new("x", "1")]);
    }

    #[test]
    fn test_session_renders_after_changes() {
        let mut console = Console::new(StoreConfig::default(), ViewFormat::Table);
        let out = run(&mut console, "set x 1\nset x 1\nset x 2\ndel x\n");

        // The repeated `set x 1` changes nothing and prints nothing
        assert_eq!(
            out,
            "Key | Value\n----+------\nx   | 1\n\
             Key | Value\n----+------\nx   | 2\n\
             (no records)\n"
        );
        assert!(console.store().is_empty());
    }

    #[test]
    fn test_session_reports_misses_and_stops_at_quit() {
        let mut console = Console::new(StoreConfig::default(), ViewFormat::Table);
        let out = run(&mut console, "del nope\nbogus\nquit\nset x 1\n");

        assert_eq!(
            out,
            "no record for key 'nope'\nInvalid command: unknown command 'bogus'\n"
        );
        assert!(console.store().is_empty());
    }

    #[test]
    fn test_session_survives_subscriber_overflow() {
        let mut console = Console::new(StoreConfig::default(), ViewFormat::Table);
        for i in 0..1500 {
            console
                .execute(Command::Set {
                    key: format!("k{}", i),
                    value: String::new(),
                })
                .unwrap();
        }

        // 1500 removals overflow the change buffer
        let reply = console.execute(Command::Clear).unwrap();
        assert_eq!(reply, Reply::Text("(no records)".into()));

        let reply = console
            .execute(Command::Set {
                key: "x".into(),
                value: "1".into(),
            })
            .unwrap();
        assert!(matches!(reply, Reply::Text(ref t) if t.ends_with("x   | 1")));
    }

    #[test]
    fn test_store_rejection_reported() {
        let mut console = Console::new(
            StoreConfig {
                reject_empty_keys: true,
                ..Default::default()
            },
            ViewFormat::Table,
        );

        // Commands built outside the parser can still carry an empty key
        let reply = console
            .execute(Command::Set {
                key: String::new(),
                value: "v".into(),
            })
            .unwrap();
        assert_eq!(reply, Reply::Text("rejected key ''".into()));
        assert!(console.store().is_empty());
    }

    #[test]
    fn test_session_get() {
        let mut console = Console::new(StoreConfig::default(), ViewFormat::Json);
        console
            .execute(Command::Set {
                key: "k".into(),
                value: "v".into(),
            })
            .unwrap();
        let reply = console.execute(Command::Get { key: "k".into() }).unwrap();
        assert_eq!(reply, Reply::Text("k=v".into()));
    }
}
