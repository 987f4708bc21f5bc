//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Two snapshots of the same entity may differ in every field except the id;
/// collections keyed by entity (such as the cart) compare ids, never values.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Index of the first entity in `items` with the given id.
pub fn position_by_id<E: Entity>(items: &[E], id: E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// First entity in `items` with the given id.
pub fn find_by_id<E: Entity>(items: &[E], id: E::Id) -> Option<&E> {
    position_by_id(items, id).map(|i| &items[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        key: u8,
        label: &'static str,
    }

    impl Entity for Row {
        type Id = u8;

        fn id(&self) -> u8 {
            self.key
        }
    }

    #[test]
    fn lookups_compare_ids_only() {
        let rows = [
            Row { key: 3, label: "a" },
            Row { key: 7, label: "b" },
            Row { key: 7, label: "c" },
        ];

        assert_eq!(position_by_id(&rows, 7), Some(1));
        assert_eq!(find_by_id(&rows, 3).map(|r| r.label), Some("a"));
        assert!(find_by_id(&rows, 9).is_none());
    }
}
