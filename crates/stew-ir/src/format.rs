//! On-disk text formats exchanged with the host.

/// File name every echo output writes to.
pub const ECHO_FILE: &str = "echo.txt";

/// File name of the single-integer format.
pub const SINGLE_INT_FILE: &str = "int.txt";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("single-int file is empty")]
    Empty,

    #[error("single-int file has {0} lines, expected exactly one")]
    TooManyLines(usize),

    #[error("line 1 is not an integer: {0:?}")]
    NotAnInteger(String),
}

/// Exactly one line containing an integer.
pub struct SingleIntFormat;

impl SingleIntFormat {
    pub fn write(value: i64) -> String {
        format!("{value}\n")
    }

    pub fn read(text: &str) -> Result<i64, FormatError> {
        let lines: Vec<&str> = text.lines().collect();
        match lines.as_slice() {
            [] => Err(FormatError::Empty),
            [line] => line
                .trim()
                .parse::<i64>()
                .map_err(|_| FormatError::NotAnInteger((*line).to_string())),
            more => Err(FormatError::TooManyLines(more.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_int_reads_what_it_writes() {
        assert_eq!(SingleIntFormat::read(&SingleIntFormat::write(42)), Ok(42));
        assert_eq!(SingleIntFormat::read("-7"), Ok(-7));
    }

    #[test]
    fn test_single_int_rejects_malformed() {
        assert_eq!(SingleIntFormat::read(""), Err(FormatError::Empty));
        assert_eq!(SingleIntFormat::read("1\n2\n"), Err(FormatError::TooManyLines(2)));
        assert!(matches!(
            SingleIntFormat::read("forty-two"),
            Err(FormatError::NotAnInteger(_))
        ));
    }
}
