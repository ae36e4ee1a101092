use crate::config::{Mode, WechatAppConfig};
use crate::errors::PayError;
use crate::utils::{gen_nonce, local_ip, money_fee_to_string, now_ts, truncated_text};
use crate::wechat::helpers;
use crate::wechat::model::{
    AppPayParams, Charge, QueryResult, Refund, RefundResult, TransferResult,
};
use crate::wechat::sign::{sign, Params};
use crate::wechat::transport::{default_http, post_xml, HttpsClient};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

pub const API_BASE_URL: &str = "https://api.mch.weixin.qq.com";
pub const SANDBOX_BASE_URL: &str = "https://api.mch.weixin.qq.com/sandboxnew";
pub const UNIFIED_ORDER_PATH: &str = "/pay/unifiedorder";
pub const ORDER_QUERY_PATH: &str = "/pay/orderquery";

const BODY_MAX_CHARS: usize = 32;

/// 微信 APP 支付
#[derive(Clone, Debug)]
pub struct WechatAppClient {
    cfg: Arc<WechatAppConfig>,
    http: Client,
    https_client: Option<HttpsClient>,
    base_url: String,
}

impl WechatAppClient {
    pub fn new(cfg: Arc<WechatAppConfig>) -> Result<Self, PayError> {
        Self::with_mode(cfg, Mode::Normal)
    }

    pub fn with_mode(cfg: Arc<WechatAppConfig>, mode: Mode) -> Result<Self, PayError> {
        let https_client = match (&cfg.private_key_pem, &cfg.public_key_pem) {
            (Some(key), Some(cert)) if cfg.has_cert() => Some(HttpsClient::new(key, cert)?),
            _ => None,
        };
        let base_url = match mode {
            Mode::Sandbox => SANDBOX_BASE_URL.to_string(),
            Mode::Normal => API_BASE_URL.to_string(),
        };
        Ok(Self {
            cfg,
            http: default_http()?,
            https_client,
            base_url,
        })
    }

    /// 替换接口域名, 用于本地联调或测试
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn config(&self) -> &WechatAppConfig {
        &self.cfg
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn spbill_create_ip(&self) -> String {
        self.cfg
            .spbill_create_ip
            .clone()
            .unwrap_or_else(|| local_ip().to_string())
    }

    /// 统一下单参数 (未签名)
    pub fn unified_order_params(&self, charge: &Charge) -> Params {
        let mut m = Params::new();
        m.insert("appid".into(), self.cfg.app_id.clone());
        m.insert("mch_id".into(), self.cfg.mch_id.clone());
        m.insert("nonce_str".into(), gen_nonce(32));
        m.insert("body".into(), truncated_text(&charge.describe, BODY_MAX_CHARS));
        m.insert("out_trade_no".into(), charge.trade_num.clone());
        m.insert("total_fee".into(), money_fee_to_string(charge.money_fee));
        m.insert("spbill_create_ip".into(), self.spbill_create_ip());
        m.insert("notify_url".into(), charge.callback_url.clone());
        m.insert("trade_type".into(), "APP".into());
        m.insert("sign_type".into(), "MD5".into());
        m
    }

    /// 统一下单, 返回 APP 调起支付的参数
    pub async fn pay(&self, charge: &Charge) -> Result<AppPayParams, PayError> {
        let mut m = self.unified_order_params(charge);
        let s = sign(&self.cfg.key, &m).map_err(|e| e.sign_step("WechatApp.sign"))?;
        m.insert("sign".into(), s);

        let re: QueryResult = post_xml(&self.http, &self.endpoint(UNIFIED_ORDER_PATH), &m).await?;
        let prepay_id = re
            .prepay_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                PayError::vendor(Some("NO_PREPAY_ID"), Some("unifiedorder returned no prepay_id"))
            })?;
        debug!("wechat app unifiedorder ok, out_trade_no={}", charge.trade_num);

        self.app_pay_params(prepay_id)
    }

    /// 由 prepay_id 生成 APP 端调起支付参数及 paySign
    pub fn app_pay_params(&self, prepay_id: impl Into<String>) -> Result<AppPayParams, PayError> {
        let mut c = AppPayParams {
            appid: self.cfg.app_id.clone(),
            partnerid: self.cfg.mch_id.clone(),
            prepayid: prepay_id.into(),
            package: "Sign=WXPay".into(),
            noncestr: gen_nonce(32),
            timestamp: now_ts(),
            pay_sign: String::new(),
        };
        let s = sign(&self.cfg.key, &c.sign_params())
            .map_err(|e| e.sign_step("WechatApp.paySign"))?;
        c.pay_sign = s.to_uppercase();
        Ok(c)
    }

    /// 企业付款到用户零钱, 需要双向证书
    pub async fn pay_to_client(&self, charge: &Charge) -> Result<TransferResult, PayError> {
        helpers::company_change(
            &self.base_url,
            &self.cfg.app_id,
            &self.cfg.mch_id,
            &self.cfg.key,
            self.https_client.as_ref(),
            charge,
            &self.spbill_create_ip(),
        )
        .await
    }

    /// 查询订单
    pub async fn query_order(&self, trade_num: &str) -> Result<QueryResult, PayError> {
        let mut m = Params::new();
        m.insert("appid".into(), self.cfg.app_id.clone());
        m.insert("mch_id".into(), self.cfg.mch_id.clone());
        m.insert("out_trade_no".into(), trade_num.to_string());
        m.insert("nonce_str".into(), gen_nonce(32));

        let s = sign(&self.cfg.key, &m)?;
        m.insert("sign".into(), s);

        post_xml(&self.http, &self.endpoint(ORDER_QUERY_PATH), &m).await
    }

    /// 申请退款, 需要双向证书
    pub async fn refund_apple_order(&self, refund: &Refund) -> Result<RefundResult, PayError> {
        helpers::refund_order(
            &self.base_url,
            &self.cfg.app_id,
            &self.cfg.mch_id,
            &self.cfg.key,
            self.https_client.as_ref(),
            refund,
        )
        .await
    }
}
