//! 需要双向证书的接口, APP / 公众号等客户端共用

use crate::errors::PayError;
use crate::utils::{gen_nonce, money_fee_to_string};
use crate::wechat::model::{Charge, Refund, RefundResult, TransferResult};
use crate::wechat::sign::{sign, Params};
use crate::wechat::transport::{post_xml, HttpsClient};

pub const TRANSFERS_PATH: &str = "/mmpaymkttransfers/promotion/transfers";
pub const REFUND_PATH: &str = "/secapi/pay/refund";

fn require_cert(conn: Option<&HttpsClient>) -> Result<&HttpsClient, PayError> {
    conn.ok_or_else(|| {
        PayError::Config("client certificate (private/public key) not configured".into())
    })
}

/// 企业付款到用户零钱
pub async fn company_change(
    base_url: &str,
    app_id: &str,
    mch_id: &str,
    key: &str,
    conn: Option<&HttpsClient>,
    charge: &Charge,
    spbill_create_ip: &str,
) -> Result<TransferResult, PayError> {
    let conn = require_cert(conn)?;
    let open_id = charge
        .open_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PayError::Config("transfer requires charge.open_id".into()))?;
    let re_user_name = if charge.check_name {
        let name = charge
            .re_user_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PayError::Config("FORCE_CHECK requires charge.re_user_name".into()))?;
        Some(name)
    } else {
        None
    };

    let mut m = Params::new();
    m.insert("mch_appid".into(), app_id.to_string());
    m.insert("mchid".into(), mch_id.to_string());
    m.insert("nonce_str".into(), gen_nonce(32));
    m.insert("partner_trade_no".into(), charge.trade_num.clone());
    m.insert("openid".into(), open_id.to_string());
    m.insert("amount".into(), money_fee_to_string(charge.money_fee));
    m.insert("desc".into(), charge.describe.clone());
    m.insert("spbill_create_ip".into(), spbill_create_ip.to_string());
    match re_user_name {
        Some(name) => {
            m.insert("check_name".into(), "FORCE_CHECK".into());
            m.insert("re_user_name".into(), name.to_string());
        }
        None => {
            m.insert("check_name".into(), "NO_CHECK".into());
        }
    }

    let s = sign(key, &m).map_err(|e| e.sign_step("WechatTransfer.sign"))?;
    m.insert("sign".into(), s);

    post_xml(conn.http(), &format!("{}{}", base_url, TRANSFERS_PATH), &m).await
}

/// 申请退款
pub async fn refund_order(
    base_url: &str,
    app_id: &str,
    mch_id: &str,
    key: &str,
    conn: Option<&HttpsClient>,
    refund: &Refund,
) -> Result<RefundResult, PayError> {
    let conn = require_cert(conn)?;

    let mut m = Params::new();
    m.insert("appid".into(), app_id.to_string());
    m.insert("mch_id".into(), mch_id.to_string());
    m.insert("nonce_str".into(), gen_nonce(32));
    m.insert("out_trade_no".into(), refund.trade_num.clone());
    m.insert("out_refund_no".into(), refund.refund_num.clone());
    m.insert("total_fee".into(), money_fee_to_string(refund.total_fee));
    m.insert("refund_fee".into(), money_fee_to_string(refund.refund_fee));
    if let Some(desc) = &refund.refund_desc {
        m.insert("refund_desc".into(), desc.clone());
    }
    if let Some(url) = &refund.notify_url {
        m.insert("notify_url".into(), url.clone());
    }

    let s = sign(key, &m).map_err(|e| e.sign_step("WechatRefund.sign"))?;
    m.insert("sign".into(), s);

    post_xml(conn.http(), &format!("{}{}", base_url, REFUND_PATH), &m).await
}
