//! The remote function catalog.
//!
//! Every remote operation name maps 1:1 to the payload kind its response
//! carries. The mapping is fixed by the daemon's implementation; treat this
//! table as an immutable external contract, not something to edit when a
//! response looks surprising. Responses are self-describing on the wire, so
//! this table is not needed to decode; the facade uses it to sanity-check
//! that the daemon answered with the kind the contract promises.

use ahk_wire::Kind;

/// The payload kind the daemon responds with for `function_name`, or
/// `None` for a name outside the catalog.
#[must_use]
pub fn expected_kind(function_name: &str) -> Option<Kind> {
    let kind = match function_name {
        // Screen inspection
        "ImageSearch" => Kind::Tuple,
        "PixelGetColor" => Kind::String,
        "PixelSearch" | "MouseGetPos" => Kind::Coordinate,

        // Mouse
        "MouseMove" | "Click" | "MouseClickDrag" | "CoordMode" => Kind::NoValue,

        // Keyboard
        "AHKKeyState" => Kind::Boolean,
        "KeyWait" => Kind::Integer,
        "SetKeyDelay" | "Send" | "SendRaw" | "SendInput" | "SendEvent" | "SendPlay"
        | "SetCapsLockState" => Kind::NoValue,

        // Window queries
        "WinGetTitle" | "WinGetClass" | "WinGetText" | "WinGet" | "FromMouse" => Kind::String,
        "AHKWinGetID" | "AHKWinGetIDLast" => Kind::Window,
        "AHKWinGetPID" | "AHKWinGetCount" | "AHKWinGetMinMax" | "AHKWinGetTransparent" => {
            Kind::Integer
        }
        "AHKWinGetProcessName" | "AHKWinGetProcessPath" | "AHKWinGetTransColor"
        | "AHKWinGetStyle" | "AHKWinGetExStyle" => Kind::String,
        "AHKWinGetPos" => Kind::Position,
        "AHKWinExist" | "WinIsAlwaysOnTop" | "AHKWinIsAlwaysOnTop" => Kind::Boolean,
        "WindowList" | "AHKWinGetList" => Kind::WindowList,
        "AHKWinGetControlList" => Kind::WindowControlList,

        // Window mutators
        "WinActivate" | "WinActivateBottom" | "AHKWinClose" | "WinHide" | "WinKill"
        | "WinMaximize" | "WinMinimize" | "WinRestore" | "WinShow" | "WinSet" | "WinSetTitle"
        | "WinClick" | "AHKWinMove" | "WinSend" | "WinSendRaw" | "ControlSend"
        | "AHKWinSetAlwaysOnTop" | "AHKWinSetTop" | "AHKWinSetBottom" | "AHKWinSetDisable"
        | "AHKWinSetEnable" | "AHKWinSetRedraw" | "AHKWinSetTransparent"
        | "AHKWinSetTransColor" | "AHKWinSetStyle" | "AHKWinSetExStyle" => Kind::NoValue,

        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_fixed_points() {
        assert_eq!(expected_kind("MouseGetPos"), Some(Kind::Coordinate));
        assert_eq!(expected_kind("MouseMove"), Some(Kind::NoValue));
        assert_eq!(expected_kind("AHKKeyState"), Some(Kind::Boolean));
        assert_eq!(expected_kind("KeyWait"), Some(Kind::Integer));
        assert_eq!(expected_kind("WinGetTitle"), Some(Kind::String));
        assert_eq!(expected_kind("WindowList"), Some(Kind::WindowList));
        assert_eq!(
            expected_kind("AHKWinGetControlList"),
            Some(Kind::WindowControlList)
        );
        assert_eq!(expected_kind("AHKWinGetPos"), Some(Kind::Position));
        assert_eq!(expected_kind("AHKWinGetID"), Some(Kind::Window));
        assert_eq!(expected_kind("ImageSearch"), Some(Kind::Tuple));
    }

    #[test]
    fn test_unknown_names_are_outside_the_catalog() {
        assert_eq!(expected_kind("NotARealFunction"), None);
        assert_eq!(expected_kind(""), None);
    }
}
