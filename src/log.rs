//! Parsing of one-line `git log` records.

/// A commit identifier and its subject line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: String,
    pub subject: String,
}

impl LogEntry {
    /// Parses one `%h%x00%s` record.
    ///
    /// Returns `None` for blank lines and lines without the NUL separator.
    /// An empty subject is allowed.
    pub fn parse(line: &str) -> Option<Self> {
        let (id, subject) = line.split_once('\0')?;
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            subject: subject.to_string(),
        })
    }
}

/// Parses every record of a multi-line log, newest first as git prints it.
pub fn parse_entries(raw: &str) -> Vec<LogEntry> {
    raw.lines().filter_map(LogEntry::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::{LogEntry, parse_entries};

    #[test]
    fn splits_on_nul_not_whitespace() {
        let entry = LogEntry::parse("abc123\0Update  the docs").unwrap();
        assert_eq!(entry.id, "abc123");
        assert_eq!(entry.subject, "Update  the docs");
    }

    #[test]
    fn subject_without_spaces_parses() {
        let entry = LogEntry::parse("abc123\0WIP").unwrap();
        assert_eq!(entry.subject, "WIP");
    }

    #[test]
    fn empty_subject_is_allowed() {
        let entry = LogEntry::parse("abc123\0").unwrap();
        assert_eq!(entry.subject, "");
    }

    #[test]
    fn blank_and_malformed_lines_are_rejected() {
        assert_eq!(LogEntry::parse(""), None);
        assert_eq!(LogEntry::parse("abc123 no separator"), None);
        assert_eq!(LogEntry::parse("\0subject"), None);
    }

    #[test]
    fn parses_multi_line_log_in_order() {
        let entries = parse_entries("h1\0fixup! B\nh2\0C\n\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "h1");
        assert_eq!(entries[1].subject, "C");
    }
}
