pub mod auxiliary;
pub mod provider_factory;
pub mod yahoo_client;

pub use auxiliary::{
    CompositeAuxiliaryProvider, FixedPutCallProvider, NoAuxiliaryProvider, VolatilityIndexProvider,
};
pub use provider_factory::{ProviderFactory, Providers};
pub use yahoo_client::YahooChartClient;
