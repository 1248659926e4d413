//! External collaborators: quote/universe providers, the advisory service,
//! and the live quote stream.

pub mod advisory;
pub mod market_data;
pub mod stream;
pub mod yahoo;

pub use advisory::{AdvisoryProvider, OpenAiAdvisory};
pub use market_data::{QuoteProvider, QuoteSnapshot, StaticUniverse, UniverseFilter, UniverseProvider};
pub use stream::{NullQuoteStream, QuoteStream, WebSocketQuoteStream};
pub use yahoo::YahooClient;
