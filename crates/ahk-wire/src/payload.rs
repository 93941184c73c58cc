//! Response payload kinds and their decode rules.
//!
//! The set of payload kinds is closed: [`KINDS`] is the single ordered list
//! both the tag registry and the dispatch logic are built from. Each kind is
//! independently decodable from raw payload bytes; decoders are pure
//! functions and perform no I/O.
//!
//! Kinds whose values ultimately become window or control handles decode
//! here to neutral id data only. Binding those ids to a live client happens
//! in the client crate, which is the only place a client reference exists.

use crate::error::{Result, WireError};
use crate::literal::Literal;
use crate::tag::{Tag, TagRegistry, trim_line_ending};

/// The exact byte sequence of the no-value payload: U+E000 (private use)
/// encoded as UTF-8.
pub const NO_VALUE_SENTINEL: &[u8] = b"\xee\x80\x80";

/// A window rectangle: top-left corner plus dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The closed set of response payload kinds.
///
/// Order matters: tags are assigned by position in [`KINDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Tuple,
    Coordinate,
    Integer,
    Boolean,
    String,
    NoValue,
    Exception,
    WindowList,
    WindowControlList,
    Window,
    Position,
}

/// Registration order of all payload kinds. Appending here is a protocol
/// change; reordering is a protocol break.
pub const KINDS: &[Kind] = &[
    Kind::Tuple,
    Kind::Coordinate,
    Kind::Integer,
    Kind::Boolean,
    Kind::String,
    Kind::NoValue,
    Kind::Exception,
    Kind::WindowList,
    Kind::WindowControlList,
    Kind::Window,
    Kind::Position,
];

impl Kind {
    /// Human-readable kind name, used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Kind::Tuple => "tuple",
            Kind::Coordinate => "coordinate",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::NoValue => "novalue",
            Kind::Exception => "exception",
            Kind::WindowList => "windowlist",
            Kind::WindowControlList => "windowcontrollist",
            Kind::Window => "window",
            Kind::Position => "position",
        }
    }
}

/// A decoded response payload.
///
/// One variant per payload kind, except `exception`, which decodes straight
/// to [`WireError::Remote`] rather than a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// An arbitrary literal tuple.
    Tuple(Vec<Literal>),
    /// A screen coordinate pair.
    Coordinate(i32, i32),
    Integer(i64),
    Boolean(bool),
    String(String),
    /// The remote ran the operation and had nothing to return.
    NoValue,
    /// Raw window ids; the client binds these into window handles.
    WindowList(Vec<String>),
    /// A window id plus `(hwnd, class)` pairs for its controls.
    WindowControlList {
        window_id: String,
        controls: Vec<(String, String)>,
    },
    /// A single raw window id. May be empty when nothing matched.
    Window(String),
    Position(Position),
}

impl Payload {
    /// Decode payload bytes according to the kind registered for `tag`.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnknownTag`] if the tag is not registered; this means
    ///   the client and the remote executable disagree on protocol version
    ///   and must not be swallowed.
    /// - [`WireError::Remote`] if the payload kind is `exception`.
    /// - [`WireError::Framing`] if the bytes do not match the kind's shape.
    pub fn decode(tag: Tag, bytes: &[u8]) -> Result<Self> {
        let kind = TagRegistry::global()
            .lookup(tag)
            .ok_or_else(|| WireError::UnknownTag(tag.as_str().to_string()))?;
        Self::decode_kind(kind, bytes)
    }

    /// Decode payload bytes as a specific kind.
    ///
    /// # Errors
    ///
    /// Same as [`Payload::decode`], minus the tag lookup.
    pub fn decode_kind(kind: Kind, bytes: &[u8]) -> Result<Self> {
        match kind {
            Kind::Tuple => {
                let items = parse_literal_tuple(bytes)?;
                Ok(Payload::Tuple(items))
            }
            Kind::Coordinate => {
                let items = parse_literal_tuple(bytes)?;
                let [x, y] = expect_int_array(kind, &items)?;
                Ok(Payload::Coordinate(x, y))
            }
            Kind::Integer => Ok(Payload::Integer(parse_literal_int(bytes)?)),
            Kind::Boolean => match parse_literal_int(bytes)? {
                0 => Ok(Payload::Boolean(false)),
                1 => Ok(Payload::Boolean(true)),
                other => Err(WireError::framing(format!(
                    "boolean payload must be 0 or 1, got {other}"
                ))),
            },
            Kind::String => Ok(Payload::String(utf8(bytes)?.to_string())),
            Kind::NoValue => {
                if bytes == NO_VALUE_SENTINEL {
                    Ok(Payload::NoValue)
                } else {
                    Err(WireError::framing(format!(
                        "unexpected or malformed no-value payload: {bytes:?}"
                    )))
                }
            }
            Kind::Exception => Err(WireError::Remote(utf8(bytes)?.to_string())),
            Kind::WindowList => {
                let ids = utf8(bytes)?
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
                Ok(Payload::WindowList(ids))
            }
            Kind::WindowControlList => decode_window_control_list(bytes),
            Kind::Window => Ok(Payload::Window(utf8(bytes)?.trim().to_string())),
            Kind::Position => {
                let items = parse_literal_tuple(bytes)?;
                let [x, y, width, height] = expect_int_array(kind, &items)?;
                Ok(Payload::Position(Position {
                    x,
                    y,
                    width,
                    height,
                }))
            }
        }
    }

    /// The kind this payload decoded from.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Payload::Tuple(_) => Kind::Tuple,
            Payload::Coordinate(_, _) => Kind::Coordinate,
            Payload::Integer(_) => Kind::Integer,
            Payload::Boolean(_) => Kind::Boolean,
            Payload::String(_) => Kind::String,
            Payload::NoValue => Kind::NoValue,
            Payload::WindowList(_) => Kind::WindowList,
            Payload::WindowControlList { .. } => Kind::WindowControlList,
            Payload::Window(_) => Kind::Window,
            Payload::Position(_) => Kind::Position,
        }
    }
}

/// Parse the decimal body-line-count line of a response envelope.
///
/// # Errors
///
/// Returns [`WireError::Framing`] if the line is not a non-negative integer.
pub fn parse_count(line: &[u8]) -> Result<usize> {
    let text = utf8(trim_line_ending(line))?;
    text.parse::<usize>()
        .map_err(|_| WireError::framing(format!("invalid body line count: {text:?}")))
}

/// Encode a response frame the way the daemon's writer side does: tag line,
/// count of embedded newlines, payload, one synthetic trailing newline.
///
/// Used by tests and fixtures to simulate the remote.
#[must_use]
pub fn encode_response(kind: Kind, payload: &[u8]) -> Vec<u8> {
    let tag = TagRegistry::global()
        .tag_of(kind)
        .unwrap_or_else(|| unreachable!("every kind in KINDS has a tag"));
    let count = payload.iter().filter(|&&b| b == b'\n').count();
    let mut frame = Vec::with_capacity(payload.len() + 16);
    frame.extend_from_slice(tag.as_str().as_bytes());
    frame.push(b'\n');
    frame.extend_from_slice(count.to_string().as_bytes());
    frame.push(b'\n');
    frame.extend_from_slice(payload);
    frame.push(b'\n');
    frame
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

fn parse_literal_tuple(bytes: &[u8]) -> Result<Vec<Literal>> {
    match Literal::parse(utf8(bytes)?.trim())? {
        Literal::Tuple(items) => Ok(items),
        other => Err(WireError::framing(format!(
            "expected a tuple literal, got {other:?}"
        ))),
    }
}

fn parse_literal_int(bytes: &[u8]) -> Result<i64> {
    match Literal::parse(utf8(bytes)?.trim())? {
        Literal::Int(n) => Ok(n),
        other => Err(WireError::framing(format!(
            "expected an integer literal, got {other:?}"
        ))),
    }
}

fn expect_int_array<const N: usize>(kind: Kind, items: &[Literal]) -> Result<[i32; N]> {
    if items.len() != N {
        return Err(WireError::framing(format!(
            "{} payload must be a {N}-tuple, got arity {}",
            kind.name(),
            items.len()
        )));
    }
    let mut out = [0i32; N];
    for (slot, item) in out.iter_mut().zip(items) {
        let n = item.as_int().ok_or_else(|| {
            WireError::framing(format!("{} payload element is not an integer: {item:?}", kind.name()))
        })?;
        *slot = i32::try_from(n)
            .map_err(|_| WireError::framing(format!("{} value {n} out of range", kind.name())))?;
    }
    Ok(out)
}

fn decode_window_control_list(bytes: &[u8]) -> Result<Payload> {
    let parsed = Literal::parse(utf8(bytes)?.trim())?;
    let items = parsed.as_tuple().ok_or_else(|| {
        WireError::framing(format!("windowcontrollist payload is not a tuple: {parsed:?}"))
    })?;
    let [id, control_items] = items else {
        return Err(WireError::framing(format!(
            "windowcontrollist payload must be a 2-tuple, got arity {}",
            items.len()
        )));
    };
    let window_id = id
        .as_str()
        .ok_or_else(|| WireError::framing(format!("window id is not a string: {id:?}")))?
        .to_string();
    let Literal::List(control_items) = control_items else {
        return Err(WireError::framing(format!(
            "control listing is not a list: {control_items:?}"
        )));
    };
    let mut controls = Vec::with_capacity(control_items.len());
    for entry in control_items {
        let pair = entry
            .as_tuple()
            .filter(|t| t.len() == 2)
            .ok_or_else(|| WireError::framing(format!("control entry is not a pair: {entry:?}")))?;
        let (Some(hwnd), Some(class)) = (pair[0].as_str(), pair[1].as_str()) else {
            return Err(WireError::framing(format!(
                "control entry fields are not strings: {entry:?}"
            )));
        };
        controls.push((hwnd.to_string(), class.to_string()));
    }
    Ok(Payload::WindowControlList {
        window_id,
        controls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(kind: Kind, payload: &[u8]) -> Result<Payload> {
        Payload::decode_kind(kind, payload)
    }

    #[test]
    fn test_coordinate_roundtrip() {
        let frame = encode_response(Kind::Coordinate, b"(100, 200)");
        assert!(frame.starts_with(b"001\n0\n"));
        let payload = decode(Kind::Coordinate, b"(100, 200)").unwrap();
        assert_eq!(payload, Payload::Coordinate(100, 200));
    }

    #[test]
    fn test_coordinate_rejects_wrong_arity() {
        assert!(decode(Kind::Coordinate, b"(1, 2, 3)").is_err());
        assert!(decode(Kind::Coordinate, b"(1,)").is_err());
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(decode(Kind::Integer, b"0").unwrap(), Payload::Integer(0));
        assert_eq!(
            decode(Kind::Integer, b"-42").unwrap(),
            Payload::Integer(-42)
        );
        assert_eq!(
            decode(Kind::Integer, b"9223372036854775807").unwrap(),
            Payload::Integer(i64::MAX)
        );
    }

    #[test]
    fn test_boolean_domain() {
        assert_eq!(decode(Kind::Boolean, b"0").unwrap(), Payload::Boolean(false));
        assert_eq!(decode(Kind::Boolean, b"1").unwrap(), Payload::Boolean(true));
        assert!(decode(Kind::Boolean, b"2").is_err());
        assert!(decode(Kind::Boolean, b"-1").is_err());
    }

    #[test]
    fn test_string_identity() {
        assert_eq!(
            decode(Kind::String, "héllo wörld".as_bytes()).unwrap(),
            Payload::String("héllo wörld".to_string())
        );
        assert_eq!(
            decode(Kind::String, b"").unwrap(),
            Payload::String(String::new())
        );
        // Embedded newlines are legal in a string payload; the envelope's
        // line count accounts for them.
        assert_eq!(
            decode(Kind::String, b"a\nb\nc").unwrap(),
            Payload::String("a\nb\nc".to_string())
        );
    }

    #[test]
    fn test_no_value_sentinel_strict() {
        assert_eq!(
            decode(Kind::NoValue, NO_VALUE_SENTINEL).unwrap(),
            Payload::NoValue
        );
        assert!(decode(Kind::NoValue, b"").is_err());
        assert!(decode(Kind::NoValue, b"\xee\x80\x80 ").is_err());
        assert!(decode(Kind::NoValue, b"0").is_err());
    }

    #[test]
    fn test_exception_decodes_to_remote_error() {
        let err = decode(Kind::Exception, b"oh no").unwrap_err();
        match err {
            WireError::Remote(msg) => assert_eq!(msg, "oh no"),
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_window_list_variants() {
        assert_eq!(
            decode(Kind::WindowList, b"0x90c42,0x123,").unwrap(),
            Payload::WindowList(vec!["0x90c42".to_string(), "0x123".to_string()])
        );
        assert_eq!(
            decode(Kind::WindowList, b"").unwrap(),
            Payload::WindowList(vec![])
        );
        assert_eq!(
            decode(Kind::WindowList, b",").unwrap(),
            Payload::WindowList(vec![])
        );
    }

    #[test]
    fn test_window_control_list() {
        let payload = decode(
            Kind::WindowControlList,
            b"('0x90c42', [('0x10344', 'Button1'), ('0x103a8', 'Edit1')])",
        )
        .unwrap();
        assert_eq!(
            payload,
            Payload::WindowControlList {
                window_id: "0x90c42".to_string(),
                controls: vec![
                    ("0x10344".to_string(), "Button1".to_string()),
                    ("0x103a8".to_string(), "Edit1".to_string()),
                ],
            }
        );
    }

    #[test]
    fn test_window_control_list_rejects_bad_shapes() {
        assert!(decode(Kind::WindowControlList, b"('0x1',)").is_err());
        assert!(decode(Kind::WindowControlList, b"('0x1', [(1, 2)])").is_err());
        assert!(decode(Kind::WindowControlList, b"[1, 2]").is_err());
    }

    #[test]
    fn test_window_id_is_trimmed() {
        assert_eq!(
            decode(Kind::Window, b" 0x90c42 ").unwrap(),
            Payload::Window("0x90c42".to_string())
        );
    }

    #[test]
    fn test_position_maps_to_rect() {
        assert_eq!(
            decode(Kind::Position, b"(10, 20, 300, 400)").unwrap(),
            Payload::Position(Position {
                x: 10,
                y: 20,
                width: 300,
                height: 400,
            })
        );
        assert!(decode(Kind::Position, b"(10, 20, 300)").is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(b"0\n").unwrap(), 0);
        assert_eq!(parse_count(b"17\r\n").unwrap(), 17);
        assert!(parse_count(b"abc\n").is_err());
        assert!(parse_count(b"-1\n").is_err());
        assert!(parse_count(b"\n").is_err());
    }

    #[test]
    fn test_encode_response_counts_embedded_newlines() {
        let frame = encode_response(Kind::String, b"line1\nline2\nline3");
        assert_eq!(frame, b"004\n2\nline1\nline2\nline3\n");
    }

    #[test]
    fn test_roundtrip_every_kind() {
        // decode(encode(payload)) for a representative value of each kind,
        // going through the envelope the way the transport reassembles it.
        let cases: Vec<(Kind, &[u8], Payload)> = vec![
            (
                Kind::Tuple,
                b"(1, 'a')",
                Payload::Tuple(vec![Literal::Int(1), Literal::Str("a".to_string())]),
            ),
            (Kind::Coordinate, b"(100, 200)", Payload::Coordinate(100, 200)),
            (Kind::Integer, b"-7", Payload::Integer(-7)),
            (Kind::Boolean, b"1", Payload::Boolean(true)),
            (
                Kind::String,
                "ünïcode".as_bytes(),
                Payload::String("ünïcode".to_string()),
            ),
            (Kind::NoValue, NO_VALUE_SENTINEL, Payload::NoValue),
            (
                Kind::WindowList,
                b"0x1,0x2,",
                Payload::WindowList(vec!["0x1".to_string(), "0x2".to_string()]),
            ),
            (Kind::Window, b"0x90c42", Payload::Window("0x90c42".to_string())),
            (
                Kind::Position,
                b"(0, 0, 1920, 1080)",
                Payload::Position(Position {
                    x: 0,
                    y: 0,
                    width: 1920,
                    height: 1080,
                }),
            ),
        ];
        for (kind, raw, expected) in cases {
            let frame = encode_response(kind, raw);
            // Reassemble the way the transport does: split off the tag and
            // count lines, rejoin the body, strip the trailing newline.
            let mut lines = frame.split_inclusive(|&b| b == b'\n');
            let tag = crate::tag::Tag::parse(lines.next().unwrap()).unwrap();
            let count = parse_count(lines.next().unwrap()).unwrap();
            let mut body: Vec<u8> = lines.flatten().copied().collect();
            assert_eq!(
                body.iter().filter(|&&b| b == b'\n').count(),
                count + 1,
                "{} frame body line count",
                kind.name()
            );
            body.pop();
            assert_eq!(Payload::decode(tag, &body).unwrap(), expected, "{}", kind.name());
        }
    }
}
