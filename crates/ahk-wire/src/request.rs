//! Request messages and their one-line encoding.

/// The escape sequence substituted for a literal newline inside an argument.
///
/// This is AutoHotkey's own newline escape. It contains no newline itself,
/// so an escaped argument can never be confused with the end of the frame.
pub const NEWLINE_ESCAPE: &str = "`n";

/// A single remote function invocation.
///
/// Immutable once built: constructed per call, encoded, discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    function_name: String,
    args: Vec<String>,
}

impl Request {
    #[must_use]
    pub fn new(function_name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            function_name: function_name.into(),
            args,
        }
    }

    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Encode the request as a single wire frame.
    ///
    /// The frame is `name[,arg1[,arg2...]]\n`. The separating comma after
    /// the function name appears only when there is at least one argument.
    /// Embedded newlines in arguments are escaped to [`NEWLINE_ESCAPE`].
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut line = String::with_capacity(self.function_name.len() + 16);
        line.push_str(&self.function_name);
        for arg in &self.args {
            line.push(',');
            line.push_str(&arg.replace('\n', NEWLINE_ESCAPE));
        }
        line.push('\n');
        line.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_no_args_has_no_comma() {
        let req = Request::new("MouseGetPos", vec![]);
        assert_eq!(req.encode(), b"MouseGetPos\n");
    }

    #[test]
    fn test_encode_joins_args_with_commas() {
        let req = Request::new(
            "MouseMove",
            vec!["100".to_string(), "200".to_string(), "5".to_string()],
        );
        assert_eq!(req.encode(), b"MouseMove,100,200,5\n");
    }

    #[test]
    fn test_encode_escapes_embedded_newlines() {
        let req = Request::new("Send", vec!["line one\nline two".to_string()]);
        let frame = req.encode();
        // The frame must remain exactly one line.
        assert_eq!(frame.iter().filter(|&&b| b == b'\n').count(), 1);
        assert_eq!(frame, b"Send,line one`nline two\n");
    }

    #[test]
    fn test_escaped_arg_survives_remote_splitting() {
        // Simulate what the remote side does: strip the terminator, split
        // the frame on commas, then undo the newline escape.
        let original = "first\nsecond\nthird";
        let req = Request::new("Send", vec![original.to_string()]);
        let frame = String::from_utf8(req.encode()).unwrap();
        let line = frame.strip_suffix('\n').unwrap();
        let (name, raw_arg) = line.split_once(',').unwrap();
        assert_eq!(name, "Send");
        assert_eq!(raw_arg.replace(NEWLINE_ESCAPE, "\n"), original);
    }

    #[test]
    fn test_encode_empty_args_are_preserved_positionally() {
        let req = Request::new("CoordMode", vec![String::new(), "Screen".to_string()]);
        assert_eq!(req.encode(), b"CoordMode,,Screen\n");
    }
}
