//! Error types for the wire codec.

/// Errors produced while encoding or decoding protocol frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The response envelope is malformed (bad tag line, non-integer line
    /// count, short read, or a payload that does not match its kind's
    /// shape). Indicates protocol desync and must not be retried.
    #[error("framing error: {0}")]
    Framing(String),

    /// The response carried a tag that is not in the registry. Indicates a
    /// version mismatch between this client and the remote executable.
    #[error("unknown response tag: {0:?}")]
    UnknownTag(String),

    /// The remote explicitly reported a failure via the exception payload
    /// kind. Carries the remote's message text verbatim.
    #[error("{0}")]
    Remote(String),

    /// Payload bytes were not valid UTF-8 where text was required.
    #[error("invalid UTF-8 in payload: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl WireError {
    pub(crate) fn framing(msg: impl Into<String>) -> Self {
        Self::Framing(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_display() {
        let err = WireError::framing("bad count line");
        assert_eq!(err.to_string(), "framing error: bad count line");
    }

    #[test]
    fn test_unknown_tag_display() {
        let err = WireError::UnknownTag("zzz".to_string());
        assert!(err.to_string().contains("zzz"));
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_remote_display_is_verbatim() {
        let err = WireError::Remote("oh no".to_string());
        assert_eq!(err.to_string(), "oh no");
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = std::str::from_utf8(&[0xff, 0xfe]).unwrap_err();
        let err: WireError = utf8_err.into();
        assert!(matches!(err, WireError::Utf8(_)));
    }
}
