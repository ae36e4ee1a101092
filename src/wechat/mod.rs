pub mod app;
pub mod helpers;
pub mod model;
pub mod sign;
pub mod transport;

pub use app::WechatAppClient;
pub use model::{AppPayParams, Charge, QueryResult, Refund, RefundResult, TransferResult};
pub use sign::Params;
