use crate::wechat::sign::Params;
use serde::{Deserialize, Serialize};

/// 支付 / 企业付款的订单信息, 金额单位为分
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Charge {
    pub trade_num: String,
    pub money_fee: i64,
    pub describe: String,
    pub callback_url: String,
    /// 企业付款收款用户 openid
    #[serde(default)]
    pub open_id: Option<String>,
    /// 企业付款是否校验真实姓名
    #[serde(default)]
    pub check_name: bool,
    #[serde(default)]
    pub re_user_name: Option<String>,
}

impl Charge {
    pub fn new(
        trade_num: impl Into<String>,
        money_fee: i64,
        describe: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            trade_num: trade_num.into(),
            money_fee,
            describe: describe.into(),
            callback_url: callback_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Refund {
    pub trade_num: String,
    pub refund_num: String,
    pub total_fee: i64,
    pub refund_fee: i64,
    #[serde(default)]
    pub refund_desc: Option<String>,
    #[serde(default)]
    pub notify_url: Option<String>,
}

/// return_code / result_code 两层结果, 见 transport::check_result
pub trait VendorResult {
    fn return_code(&self) -> Option<&str>;
    fn return_msg(&self) -> Option<&str>;
    fn result_code(&self) -> Option<&str>;
    fn err_code(&self) -> Option<&str>;
    fn err_code_des(&self) -> Option<&str>;
}

macro_rules! impl_vendor_result {
    ($($t:ty),+) => {
        $(impl VendorResult for $t {
            fn return_code(&self) -> Option<&str> {
                self.return_code.as_deref()
            }
            fn return_msg(&self) -> Option<&str> {
                self.return_msg.as_deref()
            }
            fn result_code(&self) -> Option<&str> {
                self.result_code.as_deref()
            }
            fn err_code(&self) -> Option<&str> {
                self.err_code.as_deref()
            }
            fn err_code_des(&self) -> Option<&str> {
                self.err_code_des.as_deref()
            }
        })+
    };
}

/// 统一下单 / 查询订单应答
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryResult {
    pub return_code: Option<String>,
    pub return_msg: Option<String>,
    pub appid: Option<String>,
    pub mch_id: Option<String>,
    pub device_info: Option<String>,
    pub nonce_str: Option<String>,
    pub sign: Option<String>,
    pub result_code: Option<String>,
    pub err_code: Option<String>,
    pub err_code_des: Option<String>,
    pub trade_type: Option<String>,
    pub prepay_id: Option<String>,
    pub code_url: Option<String>,
    pub trade_state: Option<String>,
    pub trade_state_desc: Option<String>,
    pub openid: Option<String>,
    pub is_subscribe: Option<String>,
    pub bank_type: Option<String>,
    pub total_fee: Option<String>,
    pub cash_fee: Option<String>,
    pub fee_type: Option<String>,
    pub transaction_id: Option<String>,
    pub out_trade_no: Option<String>,
    pub attach: Option<String>,
    pub time_end: Option<String>,
}

/// 申请退款应答
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundResult {
    pub return_code: Option<String>,
    pub return_msg: Option<String>,
    pub result_code: Option<String>,
    pub err_code: Option<String>,
    pub err_code_des: Option<String>,
    pub appid: Option<String>,
    pub mch_id: Option<String>,
    pub nonce_str: Option<String>,
    pub sign: Option<String>,
    pub transaction_id: Option<String>,
    pub out_trade_no: Option<String>,
    pub out_refund_no: Option<String>,
    pub refund_id: Option<String>,
    pub refund_fee: Option<String>,
    pub total_fee: Option<String>,
    pub cash_fee: Option<String>,
}

/// 企业付款到零钱应答
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferResult {
    pub return_code: Option<String>,
    pub return_msg: Option<String>,
    pub result_code: Option<String>,
    pub err_code: Option<String>,
    pub err_code_des: Option<String>,
    pub mch_appid: Option<String>,
    pub mchid: Option<String>,
    pub device_info: Option<String>,
    pub nonce_str: Option<String>,
    pub partner_trade_no: Option<String>,
    pub payment_no: Option<String>,
    pub payment_time: Option<String>,
}

impl_vendor_result!(QueryResult, RefundResult, TransferResult);

/// APP 端调起支付所需参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPayParams {
    pub appid: String,
    pub partnerid: String,
    pub prepayid: String,
    pub package: String,
    pub noncestr: String,
    pub timestamp: String,
    #[serde(rename = "paySign")]
    pub pay_sign: String,
}

impl AppPayParams {
    /// 参与 paySign 计算的字段
    pub fn sign_params(&self) -> Params {
        [
            ("appid", &self.appid),
            ("partnerid", &self.partnerid),
            ("prepayid", &self.prepayid),
            ("package", &self.package),
            ("noncestr", &self.noncestr),
            ("timestamp", &self.timestamp),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }

    pub fn to_params(&self) -> Params {
        let mut m = self.sign_params();
        m.insert("paySign".into(), self.pay_sign.clone());
        m
    }
}
