// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell command parsing. One line of input maps to one `Command`.

use std::path::PathBuf;

use linkstamp_core::error::{LinkstampError, Result};

pub const HELP: &str = "\
Commands:
  open <path>      select a PDF (replaces the current one)
  link [text]      set the link draft
  add [text]       attach the draft (or <text>) to the current page
  page <n>         go to page n
  next | prev      move one page
  list             annotations on the current page
  all              every annotation
  export           write the annotated PDF to the downloads directory
  status           current page and document
  help             this text
  quit             leave (waits for a running export)";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Link(String),
    /// Attach the draft, or the given text when present.
    Add(Option<String>),
    Page(u32),
    Next,
    Previous,
    List,
    All,
    Export,
    Status,
    Help,
    Quit,
}

/// Parse one line of input. Blank lines yield `Ok(None)`.
///
/// Page numbers below 1 parse as 0 and saturate at `u32::MAX`; the session
/// clamps them into range.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "open" | "o" => {
            if rest.is_empty() {
                return Err(LinkstampError::InvalidCommand("open needs a file path".into()));
            }
            Command::Open(PathBuf::from(rest))
        }
        "link" | "l" => Command::Link(rest.to_owned()),
        "add" | "a" => Command::Add((!rest.is_empty()).then(|| rest.to_owned())),
        "page" | "p" | "goto" => Command::Page(parse_page(rest)?),
        "next" | "n" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "list" | "ls" => Command::List,
        "all" => Command::All,
        "export" | "x" => Command::Export,
        "status" | "s" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(LinkstampError::InvalidCommand(format!("unknown command `{other}`"))),
    };
    Ok(Some(command))
}

fn parse_page(raw: &str) -> Result<u32> {
    let number: i64 = raw
        .parse()
        .map_err(|_| LinkstampError::InvalidCommand(format!("`{raw}` is not a page number")))?;
    Ok(u32::try_from(number.max(0)).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_command(line).expect("valid").expect("non-empty")
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_command("   ").expect("valid"), None);
    }

    #[test]
    fn open_keeps_spaces_in_path() {
        assert_eq!(
            parse("open  My Papers/report.pdf "),
            Command::Open(PathBuf::from("My Papers/report.pdf"))
        );
    }

    #[test]
    fn open_without_path_is_rejected() {
        assert!(matches!(
            parse_command("open"),
            Err(LinkstampError::InvalidCommand(_))
        ));
    }

    #[test]
    fn link_text_is_verbatim_after_trim() {
        assert_eq!(parse("link https://a.b/c?d=e f"), Command::Link("https://a.b/c?d=e f".into()));
        assert_eq!(parse("link"), Command::Link(String::new()));
    }

    #[test]
    fn add_with_and_without_text() {
        assert_eq!(parse("add"), Command::Add(None));
        assert_eq!(parse("a http://x"), Command::Add(Some("http://x".into())));
    }

    #[test]
    fn page_numbers_saturate() {
        assert_eq!(parse("page 3"), Command::Page(3));
        assert_eq!(parse("page -4"), Command::Page(0));
        assert_eq!(parse("p 99999999999"), Command::Page(u32::MAX));
    }

    #[test]
    fn page_needs_a_number() {
        assert!(matches!(
            parse_command("page three"),
            Err(LinkstampError::InvalidCommand(_))
        ));
        assert!(parse_command("page").is_err());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse("NEXT"), Command::Next);
        assert_eq!(parse("Prev"), Command::Previous);
        assert_eq!(parse("Export"), Command::Export);
    }

    #[test]
    fn unknown_word_is_rejected() {
        let err = parse_command("frobnicate now").expect_err("unknown");
        assert!(err.to_string().contains("frobnicate"));
    }
}
