//! 微信支付 v2 MD5 签名
//!
//! 参数名 ASCII 字典序排序, 空值和 `sign` 不参与签名, 拼接
//! `k1=v1&k2=v2&key=API密钥` 后取 MD5, 转大写。

use crate::errors::PayError;
use std::collections::BTreeMap;

pub type Params = BTreeMap<String, String>;

pub const SIGN_FIELD: &str = "sign";

/// 待签名字符串, 不含 `&key=`
pub fn sign_content(params: &Params) -> String {
    params
        .iter()
        .filter(|(k, v)| k.as_str() != SIGN_FIELD && !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn sign(key: &str, params: &Params) -> Result<String, PayError> {
    let content = sign_content(params);
    if content.is_empty() {
        return Err(PayError::Sign("no fields to sign".into()));
    }
    let digest = md5::compute(format!("{}&key={}", content, key));
    Ok(format!("{:X}", digest))
}

/// 校验应答或通知中的 sign 字段
pub fn verify(key: &str, params: &Params) -> Result<bool, PayError> {
    let Some(expected) = params.get(SIGN_FIELD) else {
        return Ok(false);
    };
    Ok(sign(key, params)?.eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "192006250b4c09247ec02edce69f6a2d";

    fn doc_params() -> Params {
        [
            ("appid", "wxd930ea5d5a258f4f"),
            ("mch_id", "10000100"),
            ("device_info", "1000"),
            ("body", "test"),
            ("nonce_str", "ibuaiVcKdpRxkhJA"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn matches_vendor_example() {
        assert_eq!(
            sign_content(&doc_params()),
            "appid=wxd930ea5d5a258f4f&body=test&device_info=1000&mch_id=10000100&nonce_str=ibuaiVcKdpRxkhJA"
        );
        assert_eq!(sign(KEY, &doc_params()).unwrap(), "9A0A8659F005D6984697E2CA0A9CF3B7");
    }

    #[test]
    fn deterministic() {
        let p = doc_params();
        assert_eq!(sign(KEY, &p).unwrap(), sign(KEY, &p).unwrap());
    }

    #[test]
    fn sign_field_is_ignored() {
        let mut p = doc_params();
        let before = sign(KEY, &p).unwrap();
        p.insert("sign".into(), "WHATEVER".into());
        assert_eq!(sign(KEY, &p).unwrap(), before);
    }

    #[test]
    fn empty_values_are_skipped() {
        let mut p = doc_params();
        let before = sign(KEY, &p).unwrap();
        p.insert("attach".into(), String::new());
        assert_eq!(sign(KEY, &p).unwrap(), before);
    }

    #[test]
    fn output_is_uppercase_hex() {
        let mut p = Params::new();
        p.insert("a".into(), "1".into());
        let s = sign("k", &p).unwrap();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn empty_mapping_fails() {
        assert!(matches!(sign(KEY, &Params::new()), Err(PayError::Sign(_))));
        let mut only_sign = Params::new();
        only_sign.insert("sign".into(), "X".into());
        assert!(sign(KEY, &only_sign).is_err());
    }

    #[test]
    fn verify_roundtrip() {
        let mut p = doc_params();
        assert!(!verify(KEY, &p).unwrap());
        p.insert("sign".into(), "9a0a8659f005d6984697e2ca0a9cf3b7".into());
        assert!(verify(KEY, &p).unwrap());
        assert!(!verify("other", &p).unwrap());
    }
}
