//! Ordered pivot list with the extension rule.

use crate::domain::Pivot;

/// How a recorded pivot changed the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotUpdate {
    Appended,
    /// Same kind as the last pivot: the last entry was overwritten in place.
    Extended,
}

/// Pivots in bar order; adjacent entries never share a kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotList {
    pivots: Vec<Pivot>,
}

impl PivotList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pivot: Pivot) -> PivotUpdate {
        match self.pivots.last_mut() {
            Some(last) if last.kind == pivot.kind => {
                last.price = pivot.price;
                last.bar_index = pivot.bar_index;
                PivotUpdate::Extended
            }
            _ => {
                self.pivots.push(pivot);
                PivotUpdate::Appended
            }
        }
    }

    pub fn as_slice(&self) -> &[Pivot] {
        &self.pivots
    }

    pub fn len(&self) -> usize {
        self.pivots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pivots.is_empty()
    }

    pub fn last(&self) -> Option<&Pivot> {
        self.pivots.last()
    }

    /// The most recent three pivots as (A, B, C), oldest first.
    pub fn last_three(&self) -> Option<[Pivot; 3]> {
        match self.pivots.as_slice() {
            [.., a, b, c] => Some([*a, *b, *c]),
            _ => None,
        }
    }

    pub fn into_vec(self) -> Vec<Pivot> {
        self.pivots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_pivots_append() {
        let mut list = PivotList::new();
        assert_eq!(list.record(Pivot::high(10.0, 1)), PivotUpdate::Appended);
        assert_eq!(list.record(Pivot::low(5.0, 3)), PivotUpdate::Appended);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn same_kind_overwrites_last() {
        let mut list = PivotList::new();
        list.record(Pivot::low(5.0, 1));
        list.record(Pivot::high(10.0, 3));
        assert_eq!(list.record(Pivot::high(12.0, 6)), PivotUpdate::Extended);
        assert_eq!(list.as_slice(), &[Pivot::low(5.0, 1), Pivot::high(12.0, 6)]);
    }

    #[test]
    fn last_three_needs_three() {
        let mut list = PivotList::new();
        list.record(Pivot::low(1.0, 0));
        list.record(Pivot::high(2.0, 1));
        assert!(list.last_three().is_none());
        list.record(Pivot::low(1.5, 2));
        let [a, b, c] = list.last_three().unwrap();
        assert_eq!((a.price, b.price, c.price), (1.0, 2.0, 1.5));
    }
}
