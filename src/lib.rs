//! 微信 APP 支付 SDK (v2 XML / MD5 签名接口)
//!
//! ```no_run
//! use std::sync::Arc;
//! use rust_pay_wx_app::config::WechatAppConfig;
//! use rust_pay_wx_app::wechat::{Charge, WechatAppClient};
//!
//! # async fn run() -> Result<(), rust_pay_wx_app::PayError> {
//! let cfg = WechatAppConfig::new("wx_app_appid", "1900000109", "api_key");
//! let client = WechatAppClient::new(Arc::new(cfg))?;
//! let params = client
//!     .pay(&Charge::new("T20240101", 1, "测试商品", "https://example.com/notify"))
//!     .await?;
//! println!("{}", params.pay_sign);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod utils;
pub mod wechat;

pub use client::Pay;
pub use errors::PayError;
