//! Derived cart totals.

use serde::{Deserialize, Serialize};

use crate::value_objects::{LineItem, Money};

/// IVA applied to every cart, as a whole percentage of the subtotal.
pub const TAX_RATE_PERCENT: u32 = 21;

/// Totals derived from the cart's line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of every line's `unit_price * quantity`.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub iva: Money,
    /// `subtotal + iva`.
    pub total: Money,
    /// Sum of quantities across all lines.
    pub count: u64,
}

impl Totals {
    /// Computes totals from a set of line items.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Self {
        let (subtotal, count) = items
            .into_iter()
            .fold((Money::zero(), 0u64), |(sum, count), item| {
                (sum + item.line_total(), count + u64::from(item.quantity))
            });
        let iva = subtotal.percent(TAX_RATE_PERCENT);

        Self {
            subtotal,
            iva,
            total: subtotal + iva,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Product;

    #[test]
    fn test_empty_totals_are_zero() {
        let totals = Totals::from_items(&Vec::<LineItem>::new());
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_single_line_totals() {
        let product = Product::new("p1", "Print", Money::from_major(1000), 5);
        let line = LineItem::from_product(&product, 2);
        let totals = Totals::from_items([&line]);

        assert_eq!(totals.subtotal, Money::from_major(2000));
        assert_eq!(totals.iva, Money::from_major(420));
        assert_eq!(totals.total, Money::from_major(2420));
        assert_eq!(totals.count, 2);
    }

    #[test]
    fn test_total_is_subtotal_times_1_21_within_a_cent() {
        let prices = [1, 7, 33, 99, 1999, 12345];
        for (i, cents) in prices.iter().enumerate() {
            let line = LineItem::from_product(
                &Product::new(format!("p{i}"), "x", Money::from_cents(*cents), 100),
                (i as u32) + 1,
            );
            let totals = Totals::from_items([&line]);
            let expected = totals.subtotal.cents() as f64 * 1.21;
            assert!((totals.total.cents() as f64 - expected).abs() <= 0.5 + f64::EPSILON);
        }
    }

    #[test]
    fn test_near_max_quantities_do_not_overflow() {
        let a = LineItem::from_product(
            &Product::new("a", "Print", Money::from_cents(i64::MAX / 2), u32::MAX),
            u32::MAX,
        );
        let b = LineItem::from_product(&Product::new("b", "Poster", Money::from_cents(100), 5), 2);
        let totals = Totals::from_items([&a, &b]);

        assert_eq!(totals.count, u64::from(u32::MAX) + 2);
        assert_eq!(totals.subtotal, Money::from_cents(i64::MAX));
        assert_eq!(totals.total, Money::from_cents(i64::MAX));
        assert!(totals.iva.cents() > 0);
    }
}
