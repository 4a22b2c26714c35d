//! Input area key handling

use crate::constants::KEY_ENTER;

/// Ctrl+Enter and Shift+Enter in the input run the current command
pub fn is_exec_chord(ctrl: bool, shift: bool, key_code: u32) -> bool {
    (ctrl || shift) && key_code == KEY_ENTER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_chord() {
        assert!(is_exec_chord(true, false, 13));
        assert!(is_exec_chord(false, true, 13));
        assert!(is_exec_chord(true, true, 13));
        assert!(!is_exec_chord(false, false, 13));
        assert!(!is_exec_chord(true, false, 65));
    }
}
