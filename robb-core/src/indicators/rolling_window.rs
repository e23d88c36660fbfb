//! Fixed-capacity FIFO window over a numeric series.
//!
//! Statistics are only defined once the window is full and return `None`
//! before that. They are recomputed from the stored values with a two-pass
//! mean/deviation sum, so there is no running-sum drift over long sessions.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow<T = f64> {
    capacity: usize,
    values: VecDeque<T>,
}

impl<T> RollingWindow<T> {
    /// Create an empty window. Capacity is fixed for the window's lifetime.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "RollingWindow capacity must be >= 1");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a value, evicting the oldest one when at capacity.
    pub fn push(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter()
    }
}

impl<T: Clone> RollingWindow<T> {
    /// The last `min(seen, capacity)` values, oldest first.
    pub fn values(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}

impl RollingWindow<f64> {
    /// Arithmetic mean of a full window.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.capacity as f64)
    }

    /// Standard deviation with denominator N.
    pub fn population_std_dev(&self) -> Option<f64> {
        let ss = self.sum_sq_dev()?;
        Some((ss / self.capacity as f64).sqrt())
    }

    /// Standard deviation with denominator N - 1. Undefined for capacity 1.
    pub fn sample_std_dev(&self) -> Option<f64> {
        if self.capacity < 2 {
            return None;
        }
        let ss = self.sum_sq_dev()?;
        Some((ss / (self.capacity - 1) as f64).sqrt())
    }

    fn sum_sq_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        Some(
            self.values
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn fills_then_evicts_fifo() {
        let mut w = RollingWindow::new(3);
        assert!(w.is_empty());
        w.push(1.0);
        w.push(2.0);
        assert!(!w.is_full());
        assert_eq!(w.values(), vec![1.0, 2.0]);

        w.push(3.0);
        assert!(w.is_full());
        w.push(4.0);
        assert_eq!(w.len(), 3);
        assert_eq!(w.capacity(), 3);
        assert_eq!(w.values(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn stats_undefined_until_full() {
        let mut w = RollingWindow::new(4);
        for v in [1.0, 2.0, 3.0] {
            w.push(v);
            assert_eq!(w.mean(), None);
            assert_eq!(w.population_std_dev(), None);
            assert_eq!(w.sample_std_dev(), None);
        }
    }

    #[test]
    fn known_statistics() {
        // 2,4,4,4,5,5,7,9: mean 5, population sd 2, sample sd sqrt(32/7)
        let mut w = RollingWindow::new(8);
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            w.push(v);
        }
        assert_approx(w.mean().unwrap(), 5.0, DEFAULT_EPSILON);
        assert_approx(w.population_std_dev().unwrap(), 2.0, DEFAULT_EPSILON);
        assert_approx(
            w.sample_std_dev().unwrap(),
            (32.0_f64 / 7.0).sqrt(),
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn sample_std_dev_needs_two_slots() {
        let mut w = RollingWindow::new(1);
        w.push(5.0);
        assert_eq!(w.mean(), Some(5.0));
        assert_eq!(w.population_std_dev(), Some(0.0));
        assert_eq!(w.sample_std_dev(), None);
    }

    #[test]
    fn generic_over_element_type() {
        let mut w: RollingWindow<u64> = RollingWindow::new(2);
        w.push(7);
        w.push(8);
        w.push(9);
        assert_eq!(w.iter().copied().collect::<Vec<_>>(), vec![8, 9]);
    }

    #[test]
    #[should_panic(expected = "RollingWindow capacity must be >= 1")]
    fn rejects_zero_capacity() {
        let _ = RollingWindow::<f64>::new(0);
    }
}
