//! Message sequence counter
//!
//! Every message sent with a sequence field carries one decimal digit
//! (`AY0`..`AY9`) so the ACS can correlate resends. The counter belongs to
//! one engine; a retried send of the same bytes does not consume a digit,
//! but a freshly built message always does.

/// Cyclic sequence digit generator
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    next: u8,
}

impl SequenceCounter {
    /// Number of distinct sequence digits
    pub const MODULUS: u8 = 10;

    /// Create a counter starting at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Get next sequence digit
    ///
    /// Yields 0, 1, ..., 9 and wraps back to 0.
    pub fn next(&mut self) -> u8 {
        let current = self.next;
        self.next = (current + 1) % Self::MODULUS;
        current
    }

    /// Digit the next call to [`next`](Self::next) will return
    pub fn peek(&self) -> u8 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequence_first_cycle() {
        let mut seq = SequenceCounter::new();
        let digits: Vec<u8> = (0..10).map(|_| seq.next()).collect();
        assert_eq!(digits, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(seq.next(), 0);
    }

    #[test]
    fn test_sequence_wrap_many() {
        let mut seq = SequenceCounter::new();
        for _ in 0..1234 {
            seq.next();
        }
        assert_eq!(seq.peek(), 4);
        assert_eq!(seq.next(), 4);
    }

    #[test]
    fn test_sequence_clone_is_independent() {
        let mut a = SequenceCounter::new();
        a.next();
        let mut b = a.clone();
        b.next();
        assert_eq!(a.peek(), 1);
        assert_eq!(b.peek(), 2);
    }
}
