use std::collections::VecDeque;

/// Anything that can be ordered by a weight.
pub trait Weighted {
    fn weight(&self) -> u64;
}

/// Sorted sequence kept in non-decreasing weight order.
///
/// Equal weights keep their insertion order (FIFO), which fixes the shape of
/// every Huffman tree built from it. Inserts are linear; the alphabet caps the
/// list at 256 live entries.
#[derive(Debug, Clone)]
pub struct PriorityList<T> {
    elements: VecDeque<T>,
}

impl<T> PriorityList<T> {
    pub fn new() -> Self {
        PriorityList {
            elements: VecDeque::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Detach the lightest entry, or `None` if the list is empty.
    pub fn remove_min(&mut self) -> Option<T> {
        self.elements.pop_front()
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.elements.front()
    }
}

impl<T: Weighted> PriorityList<T> {
    pub fn insert(&mut self, value: T) {
        let weight = value.weight();

        // strictly lighter than the head goes straight to the front
        match self.elements.front() {
            None => {
                self.elements.push_front(value);
                return;
            }
            Some(head) if weight < head.weight() => {
                self.elements.push_front(value);
                return;
            }
            Some(_) => {}
        }

        // otherwise land just before the first strictly heavier entry
        match self.elements.iter().position(|e| e.weight() > weight) {
            Some(index) => self.elements.insert(index, value),
            None => self.elements.push_back(value),
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.elements
            .iter()
            .zip(self.elements.iter().skip(1))
            .all(|(a, b)| a.weight() <= b.weight())
    }
}

impl<T> Default for PriorityList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(u64, char);

    impl Weighted for Item {
        fn weight(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_removes_in_weight_order() {
        let mut list = PriorityList::new();
        for (w, c) in [(5, 'a'), (1, 'b'), (3, 'c'), (9, 'd'), (0, 'e')] {
            list.insert(Item(w, c));
            assert!(list.is_sorted());
        }
        assert_eq!(list.size(), 5);

        let order: Vec<char> = std::iter::from_fn(|| list.remove_min()).map(|i| i.1).collect();
        assert_eq!(order, vec!['e', 'b', 'c', 'a', 'd']);
        assert!(list.is_empty());
    }

    #[test]
    fn test_equal_weights_are_fifo() {
        let mut list = PriorityList::new();
        list.insert(Item(2, 'x'));
        list.insert(Item(2, 'y'));
        list.insert(Item(1, 'a'));
        list.insert(Item(2, 'z'));

        let order: Vec<char> = std::iter::from_fn(|| list.remove_min()).map(|i| i.1).collect();
        assert_eq!(order, vec!['a', 'x', 'y', 'z']);
    }

    #[test]
    fn test_equal_to_head_goes_after_it() {
        let mut list = PriorityList::new();
        list.insert(Item(4, 'h'));
        list.insert(Item(4, 'n'));
        assert_eq!(list.peek_min(), Some(&Item(4, 'h')));
    }

    #[test]
    fn test_remove_from_empty() {
        let mut list: PriorityList<Item> = PriorityList::default();
        assert_eq!(list.remove_min(), None);
        assert_eq!(list.size(), 0);
    }
}
