use serde::{Deserialize, Serialize};

use novashop_catalog::Product;
use novashop_core::{Entity, Money, ProductId, find_by_id, position_by_id};

/// One cart entry: a product snapshot and how many of it.
///
/// `quantity` is always ≥ 1 once the line is inside a `Cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn product_id(&self) -> ProductId {
        self.product.id()
    }

    /// `price × quantity`, unrounded.
    pub fn subtotal(&self) -> Money {
        self.product.price.times(self.quantity)
    }

    /// Whether the line asks for more than the snapshot's stock.
    ///
    /// Informational only: the cart never clamps quantities.
    pub fn exceeds_stock(&self) -> bool {
        self.quantity > self.product.stock_quantity
    }
}

/// A line is identified by its product.
impl Entity for CartLine {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.product.id()
    }
}

/// Ordered cart lines, at most one per product id.
///
/// Deserialization goes through `From<Vec<CartLine>>`, so a persisted record
/// with duplicate ids or zero quantities is normalized on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        find_by_id(&self.lines, product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.line(product_id).is_some()
    }

    /// Quantity of `product_id` in the cart (0 when absent).
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map(|l| l.quantity).unwrap_or(0)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ quantity over all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Σ price × quantity over all lines. Exact decimal; round only for display.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// An existing line keeps its position and takes the newer product
    /// snapshot. Returns `false` (no change) when `quantity` is 0.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }

        match position_by_id(&self.lines, product.id()) {
            Some(i) => {
                let line = &mut self.lines[i];
                line.quantity = line.quantity.saturating_add(quantity);
                line.product = product;
            }
            None => self.lines.push(CartLine { product, quantity }),
        }
        true
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id() != product_id);
        self.lines.len() != before
    }

    /// Set the quantity of an existing line to exactly `quantity`.
    ///
    /// `quantity ≤ 0` removes the line. Absent products are ignored. Returns
    /// whether the cart changed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match position_by_id(&self.lines, product_id) {
            Some(i) if self.lines[i].quantity != quantity => {
                self.lines[i].quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Drop every line. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_lines = !self.lines.is_empty();
        self.lines.clear();
        had_lines
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            cart.add_item(line.product, line.quantity);
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_keyed_by_product_id() {
        let mut cart = Cart::new();
        cart.add_item(Product::new(ProductId::new(5), "old name", Money::from_minor(100), 1), 1);
        cart.add_item(Product::new(ProductId::new(5), "new name", Money::from_minor(120), 1), 2);

        let line = cart.line(ProductId::new(5)).unwrap();
        assert_eq!(line.id(), ProductId::new(5));
        assert_eq!(line.product.name, "new name");
        assert_eq!(line.quantity, 3);
        assert_eq!(cart.line_count(), 1);
    }
    use proptest::prelude::*;

    fn product(id: i64, price_minor: i64) -> Product {
        Product::new(
            ProductId::new(id),
            format!("product-{id}"),
            Money::from_minor(price_minor),
            10,
        )
    }

    #[test]
    fn adding_same_product_twice_merges_into_one_line() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1000), 1);
        cart.add_item(product(1, 1000), 1);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 2);
    }

    #[test]
    fn totals_scenario() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1000), 2);
        cart.add_item(product(2, 500), 1);

        assert_eq!(cart.total(), Money::from_minor(2500));
        assert_eq!(cart.item_count(), 3);

        assert!(cart.update_quantity(ProductId::new(1), 0));
        assert_eq!(cart.line_count(), 1);
        assert!(cart.contains(ProductId::new(2)));
        assert_eq!(cart.total(), Money::from_minor(500));
    }

    #[test]
    fn update_quantity_sets_rather_than_adds() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 100), 3);

        assert!(cart.update_quantity(ProductId::new(1), 5));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 5);

        assert!(!cart.update_quantity(ProductId::new(1), 5));
        assert!(!cart.update_quantity(ProductId::new(99), 4));
        assert!(!cart.contains(ProductId::new(99)));
    }

    #[test]
    fn negative_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 100), 3);

        assert!(cart.update_quantity(ProductId::new(1), -2));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_zero_is_a_no_op() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(product(1, 100), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_absent_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 100), 1);

        assert!(!cart.remove_item(ProductId::new(2)));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn clear_zeroes_count_and_total() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1999), 4);
        cart.add_item(product(2, 1), 1);

        assert!(cart.clear());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Money::ZERO);
        assert!(!cart.clear());
    }

    #[test]
    fn merge_refreshes_snapshot_and_keeps_position() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 100), 1);
        cart.add_item(product(2, 200), 1);

        let mut repriced = product(1, 150);
        repriced.name = "renamed".to_string();
        cart.add_item(repriced, 2);

        assert_eq!(cart.lines()[0].product.name, "renamed");
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[1].product_id(), ProductId::new(2));
        assert_eq!(cart.total(), Money::from_minor(150 * 3 + 200));
    }

    #[test]
    fn exceeds_stock_is_reported_not_enforced() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 100), 11);

        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 11);
        assert!(line.exceeds_stock());
    }

    #[test]
    fn deserialization_normalizes_duplicates_and_zero_quantities() {
        let lines = vec![
            CartLine { product: product(1, 100), quantity: 2 },
            CartLine { product: product(2, 100), quantity: 0 },
            CartLine { product: product(1, 100), quantity: 3 },
        ];
        let json = serde_json::to_string(&lines).unwrap();

        let cart: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 5);
    }

    #[test]
    fn decimal_prices_do_not_drift() {
        let mut cart = Cart::new();
        for id in 0..300 {
            cart.add_item(product(id, 10), 1);
        }
        assert_eq!(cart.total(), "30.00".parse().unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: repeated adds of one id yield one line holding the summed quantity.
        #[test]
        fn repeated_adds_sum_into_single_line(quantities in prop::collection::vec(1u32..50, 1..20)) {
            let mut cart = Cart::new();
            for q in &quantities {
                cart.add_item(product(7, 100), *q);
            }

            prop_assert_eq!(cart.line_count(), 1);
            prop_assert_eq!(cart.quantity_of(ProductId::new(7)), quantities.iter().sum::<u32>());
        }

        /// Property: derived totals always match the line-by-line sums, and ids stay unique.
        #[test]
        fn totals_match_lines_for_any_operation_sequence(
            ops in prop::collection::vec((0u8..3, 0i64..6, -3i64..20, 0i64..10_000), 0..60)
        ) {
            let mut cart = Cart::new();
            for (op, id, qty, price) in ops {
                match op {
                    0 => { cart.add_item(product(id, price), qty.max(0) as u32); }
                    1 => { cart.update_quantity(ProductId::new(id), qty); }
                    _ => { cart.remove_item(ProductId::new(id)); }
                }
            }

            let count: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
            let total: Money = cart.lines().iter().map(|l| l.product.price.times(l.quantity)).sum();
            prop_assert_eq!(cart.item_count(), count);
            prop_assert_eq!(cart.total(), total);
            prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));

            let mut ids: Vec<_> = cart.lines().iter().map(|l| l.product_id()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.line_count());
        }
    }
}
