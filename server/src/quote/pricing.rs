use crate::catalog::CatalogItem;
use crate::quote::SelectionSet;
use crate::utils::parse_soles_price;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Markup and fixed charges applied to every quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRules {
    pub markup_factor: Decimal,
    /// Total surcharge, split evenly across the selected items.
    pub surcharge_pool: Decimal,
    /// Flat domicile fee added once to the customer total.
    pub service_fee: Decimal,
}

impl PricingRules {
    pub const DEFAULT: Self = Self {
        markup_factor: Decimal::from_parts(12, 0, 0, false, 1),
        surcharge_pool: Decimal::from_parts(70, 0, 0, false, 0),
        service_fee: Decimal::from_parts(50, 0, 0, false, 0),
    };
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub code: String,
    pub name: String,
    pub base_price: Decimal,
    pub customer_price: Decimal,
}

/// Every figure derived from one selection. Values are unrounded; use
/// [`QuoteFigures::rounded`] or [`format_money`] for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFigures {
    pub lines: Vec<QuoteLine>,
    pub total_base: Decimal,
    pub surcharge_per_item: Decimal,
    pub total_customer: Decimal,
    pub service_fee: Decimal,
    pub final_total: Decimal,
}

impl QuoteFigures {
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Copy with every monetary value rounded to 2 decimals.
    pub fn rounded(&self) -> QuoteFigures {
        QuoteFigures {
            lines: self
                .lines
                .iter()
                .map(|line| QuoteLine {
                    code: line.code.clone(),
                    name: line.name.clone(),
                    base_price: round_money(line.base_price),
                    customer_price: round_money(line.customer_price),
                })
                .collect(),
            total_base: round_money(self.total_base),
            surcharge_per_item: round_money(self.surcharge_per_item),
            total_customer: round_money(self.total_customer),
            service_fee: round_money(self.service_fee),
            final_total: round_money(self.final_total),
        }
    }
}

/// Largest catalog price accepted; anything above is treated as unreadable.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Fail-soft price parse: anything unreadable or above [`MAX_PRICE`]
/// counts as zero.
pub fn parse_price(text: &str) -> Decimal {
    match parse_soles_price(text) {
        Ok(value) if value <= MAX_PRICE => value,
        Ok(value) => {
            tracing::warn!("⚠️ Precio fuera de rango ({}), se usa 0.00", value);
            Decimal::ZERO
        }
        Err(e) => {
            tracing::warn!("⚠️ Precio inválido, se usa 0.00: {}", e);
            Decimal::ZERO
        }
    }
}

fn price_line(item: &CatalogItem, rules: &PricingRules, surcharge_per_item: Decimal) -> QuoteLine {
    let base_price = parse_price(&item.base_price);
    let customer_price = base_price
        .checked_mul(rules.markup_factor)
        .and_then(|marked_up| marked_up.checked_add(surcharge_per_item));

    let (base_price, customer_price) = match customer_price {
        Some(customer_price) => (base_price, customer_price),
        None => {
            tracing::warn!("⚠️ Desborde al calcular {}, se usa 0.00", item.code);
            (Decimal::ZERO, surcharge_per_item)
        }
    };

    QuoteLine {
        code: item.code.clone(),
        name: item.name.clone(),
        base_price,
        customer_price,
    }
}

pub fn compute_quote(selection: &SelectionSet, rules: &PricingRules) -> QuoteFigures {
    let count = selection.len();
    let surcharge_per_item = if count > 0 {
        rules.surcharge_pool / Decimal::from(count)
    } else {
        Decimal::ZERO
    };

    let lines: Vec<QuoteLine> = selection
        .iter()
        .map(|item| price_line(item, rules, surcharge_per_item))
        .collect();

    let total_base = lines
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.base_price));
    let total_customer = lines
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.customer_price));

    QuoteFigures {
        lines,
        total_base,
        surcharge_per_item,
        total_customer,
        service_fee: rules.service_fee,
        final_total: total_customer.saturating_add(rules.service_fee),
    }
}

/// Rounds half away from zero to exactly two decimals ("94" -> "94.00").
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub fn format_money(value: Decimal) -> String {
    format!("S/ {}", round_money(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn selection(prices: &[&str]) -> SelectionSet {
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| CatalogItem::new(format!("X{}", i), format!("Examen {}", i), *price))
            .collect()
    }

    #[test]
    fn test_single_item_quote() {
        let mut sel = SelectionSet::new();
        sel.add(CatalogItem::new("A1", "Glucosa", "S/ 20.00"));

        let figures = compute_quote(&sel, &PricingRules::DEFAULT);

        assert_eq!(figures.total_base, dec!(20.00));
        assert_eq!(figures.surcharge_per_item, dec!(70));
        assert_eq!(figures.lines[0].customer_price, dec!(94.00));
        assert_eq!(figures.total_customer, dec!(94.00));
        assert_eq!(figures.final_total, dec!(144.00));
    }

    #[test]
    fn test_two_item_quote() {
        let figures = compute_quote(&selection(&["S/ 10.00", "S/ 30.00"]), &PricingRules::DEFAULT);

        assert_eq!(figures.surcharge_per_item, dec!(35));
        assert_eq!(figures.lines[0].customer_price, dec!(47.00));
        assert_eq!(figures.lines[1].customer_price, dec!(71.00));
        assert_eq!(figures.total_customer, dec!(118.00));
        assert_eq!(figures.final_total, dec!(168.00));
    }

    #[test]
    fn test_empty_selection() {
        let figures = compute_quote(&SelectionSet::new(), &PricingRules::DEFAULT);

        assert!(figures.is_empty());
        assert_eq!(figures.surcharge_per_item, Decimal::ZERO);
        assert_eq!(figures.total_base, Decimal::ZERO);
        assert_eq!(figures.total_customer, Decimal::ZERO);
        assert_eq!(figures.final_total, dec!(50));
    }

    #[test]
    fn test_malformed_price_counts_as_zero() {
        assert_eq!(parse_price("abc"), Decimal::ZERO);

        let figures = compute_quote(&selection(&["abc", "S/ 10.00"]), &PricingRules::DEFAULT);
        assert_eq!(figures.lines[0].base_price, Decimal::ZERO);
        assert_eq!(figures.lines[0].customer_price, dec!(35));
        assert_eq!(figures.total_base, dec!(10.00));
    }

    #[test]
    fn test_out_of_range_price_counts_as_zero() {
        assert_eq!(parse_price("S/ 1,000,000,000.00"), dec!(1000000000));
        assert_eq!(parse_price("79228162514264337593543950335"), Decimal::ZERO);

        let figures = compute_quote(
            &selection(&["79228162514264337593543950335", "S/ 10.00"]),
            &PricingRules::DEFAULT,
        );
        assert_eq!(figures.lines[0].base_price, Decimal::ZERO);
        assert_eq!(figures.lines[0].customer_price, dec!(35));
        assert_eq!(figures.total_customer, dec!(82.00));
        assert_eq!(figures.final_total, dec!(132.00));
    }

    #[test]
    fn test_huge_markup_does_not_panic() {
        let rules = PricingRules {
            markup_factor: Decimal::MAX,
            ..PricingRules::DEFAULT
        };
        let figures = compute_quote(&selection(&["S/ 20.00"]), &rules);

        assert_eq!(figures.lines[0].base_price, Decimal::ZERO);
        assert_eq!(figures.lines[0].customer_price, dec!(70));
        assert_eq!(figures.final_total, dec!(120));
    }

    #[test]
    fn test_surcharge_distributes_across_three_items() {
        let sel = selection(&["S/ 10.00", "S/ 20.00", "S/ 1,000.00"]);
        let figures = compute_quote(&sel, &PricingRules::DEFAULT);

        let line_sum: Decimal = figures.lines.iter().map(|l| l.customer_price).sum();
        assert_eq!(figures.total_customer, line_sum);

        // 1030 * 1.2 + 70, exact after presentation rounding
        assert_eq!(round_money(figures.total_customer), dec!(1306.00));
        assert_eq!(round_money(figures.final_total), dec!(1356.00));
        assert_eq!(round_money(figures.surcharge_per_item), dec!(23.33));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let sel = selection(&["S/ 12.34", "S/ 56.78", "S/ 9.99"]);
        let first = compute_quote(&sel, &PricingRules::DEFAULT);
        let second = compute_quote(&sel, &PricingRules::DEFAULT);
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec!(94)).to_string(), "94.00");
        assert_eq!(round_money(dec!(2.345)).to_string(), "2.35");
        assert_eq!(round_money(dec!(2.3449)).to_string(), "2.34");
        assert_eq!(format_money(dec!(23.3333333)), "S/ 23.33");
    }

    #[test]
    fn test_rounded_figures() {
        let figures = compute_quote(&selection(&["S/ 10.00", "S/ 20.00", "S/ 30.00"]), &PricingRules::DEFAULT);
        let rounded = figures.rounded();
        assert_eq!(rounded.surcharge_per_item.to_string(), "23.33");
        assert_eq!(rounded.lines[0].customer_price.to_string(), "35.33");
        assert_eq!(rounded.final_total.to_string(), "192.00");
    }
}
