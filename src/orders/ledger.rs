//! Bounded recency buffer for inactivated orders
//!
//! Fixed-capacity ring that overwrites its oldest entry once full. The order
//! book moves records here when they leave the active set, so recent history
//! stays inspectable without unbounded growth.

/// Ring buffer keeping the most recent `capacity` values
#[derive(Debug, Clone)]
pub struct RecencyBuffer<T> {
    slots: Vec<T>,
    /// Index of the oldest entry once the buffer is full.
    head: usize,
    capacity: usize,
}

impl<T> RecencyBuffer<T> {
    /// Create a buffer holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "recency buffer capacity must be non-zero");
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Append a value, evicting and returning the oldest entry when full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
            None
        } else {
            let evicted = std::mem::replace(&mut self.slots[self.head], value);
            self.head = (self.head + 1) % self.capacity;
            Some(evicted)
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> Option<&T> {
        if self.slots.is_empty() {
            None
        } else if self.slots.len() < self.capacity {
            self.slots.last()
        } else {
            let idx = (self.head + self.capacity - 1) % self.capacity;
            self.slots.get(idx)
        }
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (older, newer) = self.slots.split_at(self.head.min(self.slots.len()));
        newer.iter().chain(older.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_up_to_capacity() {
        let mut buf = RecencyBuffer::new(3);
        assert!(buf.push(1).is_none());
        assert!(buf.push(2).is_none());
        assert!(buf.push(3).is_none());

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.latest(), Some(&3));
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_overwrites_oldest_when_full() {
        let mut buf = RecencyBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.push(3);

        assert_eq!(buf.push(4), Some(1));
        assert_eq!(buf.push(5), Some(2));

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.latest(), Some(&5));
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_wraps_repeatedly() {
        let mut buf = RecencyBuffer::new(2);
        for i in 0..10 {
            buf.push(i);
        }
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![8, 9]);
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn test_zero_capacity_panics() {
        let _ = RecencyBuffer::<u32>::new(0);
    }
}
