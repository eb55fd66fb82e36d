//! Versioned single-owner state cell.

/// Owns one value and counts its changes.
///
/// Every read goes through [`StateCell::get`], so handlers always see the
/// latest value. The version only advances when an update actually changes
/// the value.
#[derive(Debug, Default)]
pub struct StateCell<T> {
    value: T,
    version: u64,
}

impl<T: PartialEq> StateCell<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the value with `f(&current)`. Returns whether it changed.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> bool {
        let next = f(&self.value);
        self.replace(next)
    }

    /// Replace the value outright. Returns whether it changed.
    pub fn replace(&mut self, next: T) -> bool {
        if next == self.value {
            return false;
        }
        self.value = next;
        self.version += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_tracks_real_changes_only() {
        let mut cell = StateCell::new(1);
        assert_eq!(cell.version(), 0);

        assert!(!cell.update(|v| *v));
        assert_eq!(cell.version(), 0);

        assert!(cell.update(|v| v + 1));
        assert_eq!(*cell.get(), 2);
        assert_eq!(cell.version(), 1);

        assert!(cell.replace(7));
        assert_eq!(cell.version(), 2);
    }
}
