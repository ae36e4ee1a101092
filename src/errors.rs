use thiserror::Error;
#[derive(Error, Debug)]
pub enum PayError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("xml: {0}")]
    Xml(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sign: {0}")]
    Sign(String),
    /// 微信返回 return_code / result_code 非 SUCCESS
    #[error("wechat [{code}]: {message}")]
    Vendor { code: String, message: String },
    #[error("config: {0}")]
    Config(String),
    #[error("other: {0}")]
    Other(String),
}

impl PayError {
    pub(crate) fn vendor(code: Option<&str>, message: Option<&str>) -> Self {
        PayError::Vendor {
            code: code.unwrap_or("FAIL").to_string(),
            message: message.unwrap_or_default().to_string(),
        }
    }

    /// 签名失败时在消息前加上出错步骤, 不重复变体前缀
    pub(crate) fn sign_step(self, step: &str) -> Self {
        match self {
            PayError::Sign(msg) => PayError::Sign(format!("{}: {}", step, msg)),
            other => other,
        }
    }
}

impl From<quick_xml::DeError> for PayError {
    fn from(e: quick_xml::DeError) -> Self {
        PayError::Xml(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_step_keeps_single_prefix() {
        let e = PayError::Sign("no fields to sign".into()).sign_step("WechatApp.sign");
        assert_eq!(e.to_string(), "sign: WechatApp.sign: no fields to sign");
        let other = PayError::Config("x".into()).sign_step("WechatApp.sign");
        assert_eq!(other.to_string(), "config: x");
    }
}
