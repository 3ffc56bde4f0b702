//! Virtual-key codes and modifier flags as delivered by the host.
//!
//! The host forwards Windows-style virtual keys; the engine never sees raw
//! scan codes. Character derivation assumes a US layout, which is what the
//! shim normalizes to before calling in.

pub const VK_BACK: u32 = 0x08;
pub const VK_TAB: u32 = 0x09;
pub const VK_RETURN: u32 = 0x0D;
pub const VK_ESCAPE: u32 = 0x1B;
pub const VK_SPACE: u32 = 0x20;
pub const VK_PRIOR: u32 = 0x21;
pub const VK_NEXT: u32 = 0x22;
pub const VK_END: u32 = 0x23;
pub const VK_HOME: u32 = 0x24;
pub const VK_LEFT: u32 = 0x25;
pub const VK_UP: u32 = 0x26;
pub const VK_RIGHT: u32 = 0x27;
pub const VK_DOWN: u32 = 0x28;

pub const VK_0: u32 = 0x30;
pub const VK_9: u32 = 0x39;
pub const VK_A: u32 = 0x41;
pub const VK_Z: u32 = 0x5A;

pub const VK_OEM_1: u32 = 0xBA; // ;
pub const VK_OEM_PLUS: u32 = 0xBB; // =
pub const VK_OEM_COMMA: u32 = 0xBC; // ,
pub const VK_OEM_MINUS: u32 = 0xBD; // -
pub const VK_OEM_PERIOD: u32 = 0xBE; // .
pub const VK_OEM_2: u32 = 0xBF; // /
pub const VK_OEM_3: u32 = 0xC0; // `
pub const VK_OEM_7: u32 = 0xDE; // '

pub const MOD_SHIFT: u32 = 0x1;
pub const MOD_CONTROL: u32 = 0x2;
pub const MOD_ALT: u32 = 0x4;

pub fn has_control(modifiers: u32) -> bool {
    modifiers & (MOD_CONTROL | MOD_ALT) != 0
}

/// Digit value of a top-row digit key.
pub fn digit(vkey: u32) -> Option<u32> {
    (VK_0..=VK_9).contains(&vkey).then(|| vkey - VK_0)
}

/// Printable character for a virtual key, US layout, ignoring shift for
/// letters (compositions are lowercase).
pub fn printable(vkey: u32, modifiers: u32) -> Option<char> {
    if has_control(modifiers) {
        return None;
    }
    match vkey {
        VK_A..=VK_Z => Some((b'a' + (vkey - VK_A) as u8) as char),
        VK_0..=VK_9 => Some((b'0' + (vkey - VK_0) as u8) as char),
        VK_SPACE => Some(' '),
        VK_OEM_1 => Some(';'),
        VK_OEM_PLUS => Some('='),
        VK_OEM_COMMA => Some(','),
        VK_OEM_MINUS => Some('-'),
        VK_OEM_PERIOD => Some('.'),
        VK_OEM_2 => Some('/'),
        VK_OEM_3 => Some('`'),
        VK_OEM_7 => Some('\''),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_lowercase() {
        assert_eq!(printable(VK_A, 0), Some('a'));
        assert_eq!(printable(VK_Z, MOD_SHIFT), Some('z'));
    }

    #[test]
    fn control_suppresses_printable() {
        assert_eq!(printable(VK_A, MOD_CONTROL), None);
    }

    #[test]
    fn digits() {
        assert_eq!(digit(VK_0), Some(0));
        assert_eq!(digit(VK_9), Some(9));
        assert_eq!(digit(VK_A), None);
    }

    #[test]
    fn oem_punctuation() {
        assert_eq!(printable(VK_OEM_7, 0), Some('\''));
        assert_eq!(printable(VK_OEM_MINUS, 0), Some('-'));
    }
}
