pub mod parser;

pub use parser::parse_soles_price;
