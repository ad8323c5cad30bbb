//! Inbound command line format
//!
//! Commands arrive from the server as one text frame each:
//! `<command>:<parameters>`. A line with no colon (or a colon in the first
//! position) is a parameter-less command whose name is the whole line.

/// A borrowed view of one command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub name: &'a str,
    pub params: &'a str,
}

impl<'a> CommandLine<'a> {
    /// Split a line into command name and parameter string
    pub fn parse(line: &'a str) -> Self {
        match line.find(':') {
            Some(idx) if idx > 0 => Self {
                name: &line[..idx],
                params: &line[idx + 1..],
            },
            _ => Self {
                name: line,
                params: "",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_colon() {
        let cmd = CommandLine::parse("led:FF0000");
        assert_eq!(cmd.name, "led");
        assert_eq!(cmd.params, "FF0000");

        // Only the first colon splits
        let cmd = CommandLine::parse("spring_param:0A:14");
        assert_eq!(cmd.name, "spring_param");
        assert_eq!(cmd.params, "0A:14");
    }

    #[test]
    fn no_colon_means_no_parameters() {
        let cmd = CommandLine::parse("status");
        assert_eq!(cmd.name, "status");
        assert_eq!(cmd.params, "");
    }

    #[test]
    fn leading_colon_is_part_of_the_name() {
        let cmd = CommandLine::parse(":oddball");
        assert_eq!(cmd.name, ":oddball");
        assert_eq!(cmd.params, "");
    }
}
