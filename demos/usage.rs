use rust_pay_wx_app::config::{Mode, PayConfig, WechatAppConfig};
use rust_pay_wx_app::wechat::{Charge, Refund};
use rust_pay_wx_app::{Pay, PayError};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), PayError> {
    let wx = Arc::new(
        WechatAppConfig::new("wx_app_appid", "your_mchid", "your_api_v2_key")
            .with_cert("certs/apiclient_key.pem", "certs/apiclient_cert.pem"),
    );
    Pay::config(PayConfig {
        mode: Mode::Normal,
        wechat_app: Some(wx),
    })?;
    let client = Pay::wechat_app()?;

    let trade_num = format!("{}", rust_pay_wx_app::utils::now_ts());
    let charge = Charge::new(trade_num.clone(), 1, "app-测试", "https://example.com/notify/wechat");
    let params = client.pay(&charge).await?;
    println!("wechat app pay params: {:?}", params);

    let order = client.query_order(&trade_num).await?;
    println!("wechat app query: {:?}", order.trade_state);

    let refund = Refund {
        trade_num: trade_num.clone(),
        refund_num: format!("{}-r", trade_num),
        total_fee: 1,
        refund_fee: 1,
        ..Default::default()
    };
    let re = client.refund_apple_order(&refund).await?;
    println!("wechat app refund: {:?}", re.refund_id);

    Ok(())
}
