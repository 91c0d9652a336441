use basic_util::MIN_ARRAY_SIZE;

use crate::error::ValueError;
use crate::key::VarKey;
use crate::value::Value;

/// Backing storage for one variable: a scalar slot and an array slot,
/// either or both of which may be in use at once (`A` and `A(3)` are
/// unrelated, per the data model).
#[derive(Debug, Clone, Default)]
struct VarSlot {
    scalar: Option<Value>,
    array: Option<Vec<Value>>,
}

/// Fixed-capacity variable table indexed by [`VarKey`].
///
/// Variables are created lazily on first reference; there is no
/// "unknown variable" error in this language, only tag mismatches.
pub struct VarStore {
    slots: Vec<VarSlot>,
}

impl VarStore {
    pub fn new() -> Self {
        VarStore { slots: vec![VarSlot::default(); VarKey::TABLE_SIZE] }
    }

    fn zero_for(key: VarKey) -> Value {
        if key.is_string {
            Value::empty_string()
        } else {
            Value::zero()
        }
    }

    /// Returns the scalar slot for `key`, creating it (at the tag's zero
    /// value) on first reference. Re-initializes it if a prior write left
    /// a mismatched tag behind.
    pub fn scalar(&mut self, key: VarKey) -> &Value {
        let slot = &mut self.slots[key.index()];
        let needs_init = match &slot.scalar {
            None => true,
            Some(v) => v.is_string() != key.is_string,
        };
        if needs_init {
            slot.scalar = Some(Self::zero_for(key));
        }
        slot.scalar.as_ref().unwrap()
    }

    /// Assigns the scalar slot for `key`. Errors if `value`'s tag does not
    /// match the variable's string-ness (assignment coercion, spec §4.2b).
    pub fn set_scalar(&mut self, key: VarKey, value: Value) -> Result<(), ValueError> {
        if value.is_string() != key.is_string {
            return Err(if key.is_string { ValueError::StringRequired } else { ValueError::NumericRequired });
        }
        self.slots[key.index()].scalar = Some(value);
        Ok(())
    }

    /// Returns a mutable reference to array element `index` of `key`,
    /// growing the backing array per spec §4.4 step 3: first use
    /// allocates `max(index + 1, 11)` slots; later larger uses grow and
    /// zero-fill the new tail.
    pub fn array_element(&mut self, key: VarKey, index: usize) -> &mut Value {
        let slot = &mut self.slots[key.index()];
        match &mut slot.array {
            None => {
                let size = (index + 1).max(MIN_ARRAY_SIZE);
                slot.array = Some(vec![Self::zero_for(key); size]);
            }
            Some(arr) => {
                if index >= arr.len() {
                    arr.resize(index + 1, Self::zero_for(key));
                }
            }
        }
        &mut slot.array.as_mut().unwrap()[index]
    }

    /// `DIM name(size)`: allocates or grows the array to `size + 1`
    /// elements. Unlike implicit subscript allocation, `DIM` does not
    /// apply the 11-element floor.
    pub fn dim(&mut self, key: VarKey, size: usize) {
        let slot = &mut self.slots[key.index()];
        let needed = size + 1;
        match &mut slot.array {
            None => slot.array = Some(vec![Self::zero_for(key); needed]),
            Some(arr) => {
                if needed > arr.len() {
                    arr.resize(needed, Self::zero_for(key));
                }
            }
        }
    }
}

impl Default for VarStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_starts_at_zero_and_is_independent_of_array() {
        let mut store = VarStore::new();
        let a = VarKey::new(b'A', b' ', false);
        assert_eq!(store.scalar(a).as_number().unwrap(), 0.0);
        *store.array_element(a, 3) = Value::Number(42.0);
        assert_eq!(store.scalar(a).as_number().unwrap(), 0.0);
    }

    #[test]
    fn subscript_zero_on_fresh_array_succeeds() {
        let mut store = VarStore::new();
        let a = VarKey::new(b'A', b' ', false);
        assert_eq!(*store.array_element(a, 0), Value::Number(0.0));
    }

    #[test]
    fn subscript_ten_on_freshly_used_at_zero_array_succeeds() {
        let mut store = VarStore::new();
        let a = VarKey::new(b'A', b' ', false);
        store.array_element(a, 0);
        assert_eq!(*store.array_element(a, 10), Value::Number(0.0));
    }

    #[test]
    fn large_subscript_grows_and_zero_fills() {
        let mut store = VarStore::new();
        let a = VarKey::new(b'A', b' ', false);
        *store.array_element(a, 2) = Value::Number(9.0);
        *store.array_element(a, 100) = Value::Number(1.0);
        assert_eq!(*store.array_element(a, 2), Value::Number(9.0));
        assert_eq!(*store.array_element(a, 50), Value::Number(0.0));
    }

    #[test]
    fn string_array_defaults_to_empty_string() {
        let mut store = VarStore::new();
        let a_str = VarKey::new(b'A', b' ', true);
        assert_eq!(*store.array_element(a_str, 0), Value::String(String::new()));
    }

    #[test]
    fn set_scalar_rejects_tag_mismatch() {
        let mut store = VarStore::new();
        let a = VarKey::new(b'A', b' ', false);
        assert_eq!(store.set_scalar(a, Value::String("x".into())), Err(ValueError::NumericRequired));
    }

    #[test]
    fn dim_does_not_apply_minimum_floor() {
        let mut store = VarStore::new();
        let a = VarKey::new(b'A', b' ', false);
        store.dim(a, 2);
        // only 3 elements exist; accessing index 2 must not panic
        assert_eq!(*store.array_element(a, 2), Value::Number(0.0));
    }
}
