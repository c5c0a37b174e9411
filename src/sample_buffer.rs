/// Rolling sample buffer for live display
///
/// Keeps the most recent N values pushed, overwriting the oldest once full.
/// Storage is allocated once at construction; pushes never reallocate.
///
/// ```
/// use tickwire::sample_buffer::RollingBuffer;
///
/// let mut scope = RollingBuffer::new(3);
/// for v in [1.0, 2.0, 3.0, 4.0] {
///     scope.push(v);
/// }
/// assert_eq!(scope.to_vec(), vec![2.0, 3.0, 4.0]);
/// ```

use crate::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct RollingBuffer {
    buffer: Vec<Signal>, // Fixed-size storage
    write_pos: usize,    // Next slot to overwrite
    len: usize,          // Values currently retained
}

impl RollingBuffer {
    /// Create an empty buffer holding up to `capacity` values
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a value, dropping the oldest when full
    pub fn push(&mut self, value: Signal) {
        let capacity = self.buffer.len();
        self.buffer[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Most recently pushed value
    pub fn latest(&self) -> Option<Signal> {
        if self.len == 0 {
            return None;
        }
        let capacity = self.buffer.len();
        Some(self.buffer[(self.write_pos + capacity - 1) % capacity])
    }

    /// Retained values, oldest first
    pub fn iter(&self) -> impl Iterator<Item = Signal> + '_ {
        let capacity = self.buffer.len();
        let start = (self.write_pos + capacity - self.len) % capacity;
        (0..self.len).map(move |i| self.buffer[(start + i) % capacity])
    }

    /// Retained values, oldest first
    pub fn to_vec(&self) -> Vec<Signal> {
        self.iter().collect()
    }

    /// Back to the empty, all-zero initial state
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_then_rolls() {
        let mut buf = RollingBuffer::new(4);
        assert!(buf.is_empty());
        assert_eq!(buf.latest(), None);

        buf.push(1.0);
        buf.push(2.0);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.to_vec(), vec![1.0, 2.0]);

        for v in 3..=9 {
            buf.push(v as Signal);
        }
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.to_vec(), vec![6.0, 7.0, 8.0, 9.0]);
        assert_eq!(buf.latest(), Some(9.0));
    }

    #[test]
    fn test_keeps_last_capacity_values() {
        for capacity in 1..=6 {
            for extra in 0..10 {
                let mut buf = RollingBuffer::new(capacity);
                let pushed: Vec<Signal> = (0..capacity + extra).map(|v| v as Signal).collect();
                for &v in &pushed {
                    buf.push(v);
                }
                assert_eq!(buf.len(), capacity);
                assert_eq!(buf.to_vec(), pushed[pushed.len() - capacity..].to_vec());
            }
        }
    }

    #[test]
    fn test_capacity_one() {
        let mut buf = RollingBuffer::new(1);
        buf.push(-40.0);
        buf.push(25.0);
        assert_eq!(buf.to_vec(), vec![25.0]);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_zero_capacity_raised() {
        let mut buf = RollingBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
        buf.push(3.0);
        assert_eq!(buf.to_vec(), vec![3.0]);
    }

    #[test]
    fn test_clear_resets() {
        let mut buf = RollingBuffer::new(3);
        for v in [5.0, 6.0, 7.0, 8.0] {
            buf.push(v);
        }
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert!(buf.to_vec().is_empty());
        assert_eq!(buf, RollingBuffer::new(3));

        buf.push(1.0);
        assert_eq!(buf.to_vec(), vec![1.0]);
    }
}
