use crate::errors::PayError;
use crate::utils::{cert_serial_no, load_pem};
use crate::wechat::model::VendorResult;
use crate::wechat::sign::Params;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use reqwest::{Client, Identity};
use serde::de::DeserializeOwned;
use std::io::Cursor;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = "rust_pay_wx_app";
const SUCCESS: &str = "SUCCESS";

pub fn default_http() -> Result<Client, PayError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// 双向证书 HTTPS 客户端 (退款、企业付款)
#[derive(Clone, Debug)]
pub struct HttpsClient {
    http: Client,
    serial_no: String,
}

impl HttpsClient {
    /// private_key / cert 可以是 PEM 文本或文件路径
    pub fn new(private_key: &str, cert: &str) -> Result<Self, PayError> {
        let key_pem = load_pem(private_key, "PRIVATE KEY")?;
        let cert_pem = load_pem(cert, "CERTIFICATE")?;
        let serial_no = cert_serial_no(&cert_pem)
            .map_err(|e| PayError::Config(format!("client certificate: {:#}", e)))?;
        let identity = Identity::from_pem(format!("{}\n{}", cert_pem, key_pem).as_bytes())?;
        let http = Client::builder()
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .identity(identity)
            .build()?;
        info!("wechat client certificate loaded, serial_no={}", serial_no);
        Ok(Self { http, serial_no })
    }

    pub fn serial_no(&self) -> &str {
        &self.serial_no
    }

    pub fn http(&self) -> &Client {
        &self.http
    }
}

/// `<xml><k><![CDATA[v]]></k>...</xml>`
pub fn to_xml(params: &Params) -> Result<String, PayError> {
    let xml_err = |e: quick_xml::Error| PayError::Xml(e.to_string());
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Start(BytesStart::new("xml")))
        .map_err(xml_err)?;
    for (k, v) in params {
        writer
            .write_event(Event::Start(BytesStart::new(k.as_str())))
            .map_err(xml_err)?;
        // "]]>" 会提前结束 CDATA, 拆成相邻的两段
        let mut rest = v.as_str();
        while let Some(i) = rest.find("]]>") {
            writer
                .write_event(Event::CData(BytesCData::new(&rest[..i + 2])))
                .map_err(xml_err)?;
            rest = &rest[i + 2..];
        }
        writer
            .write_event(Event::CData(BytesCData::new(rest)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new(k.as_str())))
            .map_err(xml_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("xml")))
        .map_err(xml_err)?;
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| PayError::Xml(e.to_string()))
}

pub fn from_xml<T: DeserializeOwned>(text: &str) -> Result<T, PayError> {
    Ok(quick_xml::de::from_str(text)?)
}

/// return_code 表示通信结果, result_code 表示业务结果, 都要是 SUCCESS
pub fn check_result<T: VendorResult>(re: &T) -> Result<(), PayError> {
    if re.return_code() != Some(SUCCESS) {
        warn!("wechat return_code={:?} msg={:?}", re.return_code(), re.return_msg());
        return Err(PayError::vendor(re.return_code(), re.return_msg()));
    }
    if re.result_code() != Some(SUCCESS) {
        warn!("wechat err_code={:?} des={:?}", re.err_code(), re.err_code_des());
        return Err(PayError::vendor(
            re.err_code().or(re.result_code()),
            re.err_code_des(),
        ));
    }
    Ok(())
}

/// 发送一次请求, 不重试
pub async fn post_xml<T>(http: &Client, url: &str, params: &Params) -> Result<T, PayError>
where
    T: DeserializeOwned + VendorResult,
{
    let url = Url::parse(url).map_err(|e| PayError::Other(format!("parse url: {}", e)))?;
    debug!(
        "wechat post {} fields={:?}",
        url.path(),
        params.keys().collect::<Vec<_>>()
    );
    let body = to_xml(params)?;
    let resp = http
        .post(url)
        .header("Content-Type", "text/xml; charset=utf-8")
        .body(body)
        .send()
        .await?;
    let status = resp.status();
    let text = resp.text().await?;
    debug!("wechat response status={} body={}", status, text);
    if !status.is_success() {
        return Err(PayError::Other(format!(
            "HTTP request failed: {} - {}",
            status, text
        )));
    }
    let re: T = from_xml(&text)?;
    check_result(&re)?;
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wechat::model::QueryResult;

    #[test]
    fn xml_wraps_values_in_cdata() {
        let mut p = Params::new();
        p.insert("body".into(), "a<b>&c".into());
        p.insert("appid".into(), "wx1".into());
        assert_eq!(
            to_xml(&p).unwrap(),
            "<xml><appid><![CDATA[wx1]]></appid><body><![CDATA[a<b>&c]]></body></xml>"
        );
    }

    #[test]
    fn cdata_terminator_in_value_survives() {
        let mut p = Params::new();
        p.insert("desc".into(), "refund ]]> done".into());
        p.insert("re_user_name".into(), "]]>]]>".into());
        let xml = to_xml(&p).unwrap();
        assert_eq!(
            xml,
            "<xml><desc><![CDATA[refund ]]]]><![CDATA[> done]]></desc>\
             <re_user_name><![CDATA[]]]]><![CDATA[>]]]]><![CDATA[>]]></re_user_name></xml>"
        );
        let back: Params = from_xml(&xml).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn parses_vendor_response() {
        let text = r#"<xml>
            <return_code><![CDATA[SUCCESS]]></return_code>
            <return_msg><![CDATA[OK]]></return_msg>
            <appid><![CDATA[wx2421b1c4370ec43b]]></appid>
            <result_code><![CDATA[SUCCESS]]></result_code>
            <prepay_id><![CDATA[wx201411101639507cbf6ffd8b0779950874]]></prepay_id>
            <trade_type><![CDATA[APP]]></trade_type>
            <unknown_field>1</unknown_field>
        </xml>"#;
        let re: QueryResult = from_xml(text).unwrap();
        assert_eq!(re.prepay_id.as_deref(), Some("wx201411101639507cbf6ffd8b0779950874"));
        assert_eq!(re.trade_type.as_deref(), Some("APP"));
        assert!(check_result(&re).is_ok());
    }

    #[test]
    fn return_code_fail_is_vendor_error() {
        let re: QueryResult = from_xml(
            "<xml><return_code>FAIL</return_code><return_msg>签名错误</return_msg></xml>",
        )
        .unwrap();
        match check_result(&re) {
            Err(PayError::Vendor { code, message }) => {
                assert_eq!(code, "FAIL");
                assert_eq!(message, "签名错误");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn result_code_fail_carries_err_code() {
        let re: QueryResult = from_xml(
            "<xml><return_code>SUCCESS</return_code><result_code>FAIL</result_code>\
             <err_code>ORDERNOTEXIST</err_code><err_code_des>此交易订单号不存在</err_code_des></xml>",
        )
        .unwrap();
        match check_result(&re) {
            Err(PayError::Vendor { code, message }) => {
                assert_eq!(code, "ORDERNOTEXIST");
                assert_eq!(message, "此交易订单号不存在");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn malformed_xml_is_error() {
        assert!(matches!(from_xml::<QueryResult>("<xml><a></xml>"), Err(PayError::Xml(_))));
    }

    #[test]
    fn https_client_rejects_bad_cert() {
        let err = HttpsClient::new("not-a-key", "not-a-cert").unwrap_err();
        assert!(matches!(err, PayError::Config(_)));
    }
}
