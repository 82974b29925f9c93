pub mod market_data_provider;

pub use market_data_provider::{
    AuxiliaryIndicatorProvider, AuxiliaryIndicators, PriceHistoryProvider, ProviderResult,
};
