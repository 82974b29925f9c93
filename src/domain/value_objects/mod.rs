pub mod price_bar;

pub use price_bar::PriceBar;
