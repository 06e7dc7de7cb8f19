pub mod pricing;
pub mod selection;

pub use pricing::{
    compute_quote, format_money, parse_price, round_money, PricingRules, QuoteFigures, QuoteLine,
};
pub use selection::{SelectionError, SelectionSet};
