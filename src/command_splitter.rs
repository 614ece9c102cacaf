//! Splits a model response into individual commands.
//!
//! Splitting is by line only. Shell syntax is never parsed, so a line such
//! as `mkdir out && cd out` stays a single command.

/// Ordered, non-empty commands taken from one model response.
pub type CommandBatch = Vec<String>;

/// Splits `raw` on line breaks, trims every line, and drops blank ones.
///
/// # Example
///
/// ```
/// use incanto::command_splitter::split_commands;
///
/// let batch = split_commands("cmd1\n\n  cmd2 && cmd3  \r\ncmd4\n");
/// assert_eq!(batch, vec!["cmd1", "cmd2 && cmd3", "cmd4"]);
/// ```
pub fn split_commands(raw: &str) -> CommandBatch {
    raw.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_batch() {
        assert!(split_commands("").is_empty());
    }

    #[test]
    fn test_whitespace_only_input_yields_empty_batch() {
        assert!(split_commands("   \n\n").is_empty());
        assert!(split_commands("\t\r\n  \r\n").is_empty());
    }

    #[test]
    fn test_single_command() {
        assert_eq!(split_commands("ls -la"), vec!["ls -la"]);
    }

    #[test]
    fn test_chained_line_stays_one_unit() {
        let batch = split_commands("cmd1\ncmd2 && cmd3\ncmd4");
        assert_eq!(batch, vec!["cmd1", "cmd2 && cmd3", "cmd4"]);
    }

    #[test]
    fn test_lines_are_trimmed_and_order_kept() {
        let batch = split_commands("  first  \n\n\tsecond\n   \nthird   ");
        assert_eq!(batch, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let batch = split_commands("echo a\r\necho b\r\n");
        assert_eq!(batch, vec!["echo a", "echo b"]);
    }

    #[test]
    fn test_semicolons_and_pipes_are_not_split() {
        let batch = split_commands("cd /tmp; ls | wc -l");
        assert_eq!(batch, vec!["cd /tmp; ls | wc -l"]);
    }
}
