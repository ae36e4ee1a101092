use crate::config::PayConfig;
use crate::errors::PayError;
use crate::wechat::WechatAppClient;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};

/// 第一次初始化时建好的配置和客户端, 之后只读
struct PayState {
    cfg: Arc<PayConfig>,
    wechat_app: Option<WechatAppClient>,
}

static STATE: OnceCell<PayState> = OnceCell::new();

/// 进程级默认配置, 只在第一次成功调用 `config` 时生效
pub struct Pay;
impl Pay {
    /// 返回本次调用是否生效; 重复调用保留第一次的配置。
    /// 客户端 (含双向证书) 在这里一次性构建, 证书错误直接返回, 且不占用初始化。
    pub fn config(cfg: PayConfig) -> Result<bool, PayError> {
        let mut installed = false;
        STATE.get_or_try_init(|| {
            let wechat_app = cfg
                .wechat_app
                .clone()
                .map(|wx| WechatAppClient::with_mode(wx, cfg.mode.clone()))
                .transpose()?;
            installed = true;
            Ok::<_, PayError>(PayState {
                cfg: Arc::new(cfg),
                wechat_app,
            })
        })?;
        if installed {
            info!("pay config initialized");
        } else {
            warn!("pay config already initialized, ignoring");
        }
        Ok(installed)
    }

    pub fn current() -> Option<Arc<PayConfig>> {
        STATE.get().map(|s| s.cfg.clone())
    }

    fn state() -> Result<&'static PayState, PayError> {
        STATE
            .get()
            .ok_or_else(|| PayError::Config("config not initialized".into()))
    }

    /// 返回初始化时构建的客户端的克隆, 共享同一连接池
    pub fn wechat_app() -> Result<WechatAppClient, PayError> {
        Self::state()?
            .wechat_app
            .clone()
            .ok_or_else(|| PayError::Config("wechat app config missing".into()))
    }
}
