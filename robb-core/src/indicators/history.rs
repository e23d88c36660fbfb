//! Two-slot cache of the latest indicator readings.

/// Holds the reading of the current bar and of the bar before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBarHistory<T> {
    current: Option<T>,
    previous: Option<T>,
}

impl<T> Default for TwoBarHistory<T> {
    fn default() -> Self {
        Self {
            current: None,
            previous: None,
        }
    }
}

impl<T: Copy> TwoBarHistory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift current into previous and store the new reading.
    pub fn record(&mut self, value: T) {
        self.previous = self.current.replace(value);
    }

    pub fn current(&self) -> Option<T> {
        self.current
    }

    pub fn previous(&self) -> Option<T> {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_shifts_slots() {
        let mut h = TwoBarHistory::new();
        assert_eq!(h.current(), None);
        assert_eq!(h.previous(), None);

        h.record(1);
        assert_eq!(h.current(), Some(1));
        assert_eq!(h.previous(), None);

        h.record(2);
        h.record(3);
        assert_eq!(h.current(), Some(3));
        assert_eq!(h.previous(), Some(2));
    }
}
