//! REPL command parsing.

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search { query: String, start: usize },
    Complete { prefix: String },
    Add { url: String, title: Option<String> },
    Remove { url: String },
    List,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
commands:
  search <query> [start]   substring search, paged from match number <start>
  complete <prefix>        best completion for a prefix
  add <url> [title]        fetch and index a page
  rm <url>                 forget a page
  ls                       list indexed pages
  help                     this text
  quit                     exit
any other line is searched as-is";

impl Command {
    /// Parse a line. Anything that is not a known command is a search for the whole line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Command::Empty;
        }

        let (head, rest) = match line.trim_start().split_once(' ') {
            Some((head, rest)) => (head, rest.trim()),
            None => (line.trim(), ""),
        };

        match (head, rest) {
            ("quit" | "exit", "") => Command::Quit,
            ("help", "") => Command::Help,
            ("ls", "") => Command::List,
            ("search", rest) if !rest.is_empty() => parse_search(rest),
            ("complete", prefix) if !prefix.is_empty() => Command::Complete { prefix: prefix.to_string() },
            ("add", rest) if !rest.is_empty() => {
                let (url, title) = match rest.split_once(' ') {
                    Some((url, title)) => (url, Some(title.trim().to_string())),
                    None => (rest, None),
                };
                Command::Add { url: url.to_string(), title: title.filter(|t| !t.is_empty()) }
            }
            ("rm", url) if !url.is_empty() => Command::Remove { url: url.to_string() },
            _ => Command::Search { query: line.to_string(), start: 0 },
        }
    }
}

/// `search <query> [start]`: a trailing number is the start index.
fn parse_search(rest: &str) -> Command {
    if let Some((query, last)) = rest.rsplit_once(' ')
        && let Ok(start) = last.parse::<usize>()
    {
        return Command::Search { query: query.trim_end().to_string(), start };
    }
    Command::Search { query: rest.to_string(), start: 0 }
}

/// Wrap the match inside `snippet` in ANSI bold.
///
/// `query_position[0]` is the byte offset just past the match.
pub fn highlight(snippet: &str, query_position: [usize; 2], query_len: usize) -> String {
    let end = query_position[0];
    let start = end.saturating_sub(query_len);
    match (snippet.get(..start), snippet.get(start..end), snippet.get(end..)) {
        (Some(before), Some(hit), Some(after)) => format!("{before}\x1b[1m{hit}\x1b[0m{after}"),
        _ => snippet.to_string(),
    }
}
