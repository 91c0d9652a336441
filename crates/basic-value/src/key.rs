use std::fmt;

/// A variable name key: up to two uppercase letters plus a namespace bit.
///
/// `letter2` is `b' '` for one-character names. `A` and `A$` are distinct
/// variables because `is_string` partitions the namespace — this is the
/// one place CBM BASIC lets two "different" variables share a spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarKey {
    pub letter1: u8,
    pub letter2: u8,
    pub is_string: bool,
}

impl VarKey {
    /// 26 first letters x 27 second letters (26 + blank) x 2 namespaces.
    pub const TABLE_SIZE: usize = 26 * 27 * 2;

    /// Builds a key from raw bytes. `letter1` must be `b'A'..=b'Z'`;
    /// `letter2` must be `b'A'..=b'Z'` or `b' '`.
    pub fn new(letter1: u8, letter2: u8, is_string: bool) -> Self {
        debug_assert!(letter1.is_ascii_uppercase());
        debug_assert!(letter2.is_ascii_uppercase() || letter2 == b' ');
        VarKey { letter1, letter2, is_string }
    }

    /// Dense index into a `VarKey::TABLE_SIZE`-element table.
    pub fn index(self) -> usize {
        let l1 = (self.letter1 - b'A') as usize;
        let l2 = if self.letter2 == b' ' { 26 } else { (self.letter2 - b'A') as usize };
        (l1 * 27 + l2) * 2 + self.is_string as usize
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter1 as char)?;
        if self.letter2 != b' ' {
            write!(f, "{}", self.letter2 as char)?;
        }
        if self.is_string {
            write!(f, "$")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_numeric_namespaces_are_distinct() {
        let a_num = VarKey::new(b'A', b' ', false);
        let a_str = VarKey::new(b'A', b' ', true);
        assert_ne!(a_num.index(), a_str.index());
    }

    #[test]
    fn all_keys_have_unique_indices() {
        let mut seen = vec![false; VarKey::TABLE_SIZE];
        for l1 in b'A'..=b'Z' {
            for l2 in (b'A'..=b'Z').chain(std::iter::once(b' ')) {
                for is_string in [false, true] {
                    let idx = VarKey::new(l1, l2, is_string).index();
                    assert!(!seen[idx], "duplicate index for key");
                    seen[idx] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn display_form() {
        assert_eq!(VarKey::new(b'A', b' ', false).to_string(), "A");
        assert_eq!(VarKey::new(b'A', b' ', true).to_string(), "A$");
        assert_eq!(VarKey::new(b'A', b'B', false).to_string(), "AB");
        assert_eq!(VarKey::new(b'A', b'B', true).to_string(), "AB$");
    }
}
