use serde::Deserialize;
use std::sync::Arc;
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    Sandbox,
}
#[derive(Clone, Deserialize)]
pub struct WechatAppConfig {
    /// 开放平台审核通过的应用 APPID
    pub app_id: String,
    /// 商户号
    pub mch_id: String,
    /// API 密钥 (v2)
    pub key: String,
    /// 商户 API 证书私钥, PEM 文本或 .pem 文件路径
    #[serde(default)]
    pub private_key_pem: Option<String>,
    /// 商户 API 证书 (apiclient_cert.pem), PEM 文本或文件路径
    #[serde(default)]
    pub public_key_pem: Option<String>,
    /// 终端 IP, 不填时取本机出口 IP
    #[serde(default)]
    pub spbill_create_ip: Option<String>,
}

impl std::fmt::Debug for WechatAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatAppConfig")
            .field("app_id", &self.app_id)
            .field("mch_id", &self.mch_id)
            .field("has_cert", &self.has_cert())
            .finish_non_exhaustive()
    }
}

impl WechatAppConfig {
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            key: key.into(),
            private_key_pem: None,
            public_key_pem: None,
            spbill_create_ip: None,
        }
    }

    pub fn with_cert(
        mut self,
        private_key_pem: impl Into<String>,
        public_key_pem: impl Into<String>,
    ) -> Self {
        self.private_key_pem = Some(private_key_pem.into());
        self.public_key_pem = Some(public_key_pem.into());
        self
    }

    pub fn with_spbill_create_ip(mut self, ip: impl Into<String>) -> Self {
        self.spbill_create_ip = Some(ip.into());
        self
    }

    /// 私钥和证书都配置且非空时才启用双向证书
    pub fn has_cert(&self) -> bool {
        matches!(
            (&self.private_key_pem, &self.public_key_pem),
            (Some(k), Some(c)) if !k.is_empty() && !c.is_empty()
        )
    }
}

#[derive(Clone, Debug)]
pub struct PayConfig {
    pub mode: Mode,
    pub wechat_app: Option<Arc<WechatAppConfig>>,
}
