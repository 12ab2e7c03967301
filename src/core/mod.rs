pub mod payload;
pub mod signature;
pub mod transport;
pub mod truemoney;

pub use crate::domain::ports::{ConfigProvider, PaymentGateway};
