//! Control panel surface: endpoint URLs and the marker strings each page is
//! classified by. All knowledge of the panel's HTML lives here.

use crate::error::Result;

pub const LOGIN_REJECTED: &str = "ドメイン名もしくはパスワードが間違っています";
pub const OFFERS_NEW_SETTING: &str = "秘密鍵を含む新しい設定の作成";
pub const CREATING_SETTING: &str = "新しい設定を作成中です";
pub const AWAITING_KEY: &str = "秘密鍵を既にお持ちの場合には";
pub const ERROR_BANNER: &str = "error-message";
pub const SSL_NOT_FOUND: &str = "SSLが見つかりません";
pub const AWAITING_CERT: &str = "証明書認証局から送られた証明書を以下に貼り付け";
pub const NOT_FINALIZED: &str = "新しい設定はまだ完了していません";
pub const NOT_A_CERT: &str = "証明書ではありませんでした";

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub login: url::Url,
    /// `rs/ssl?SNIDomain=`: start page, create, upload and apply.
    pub setting: url::Url,
    /// `rs/ssl?Install=1&SNIDomain=`: primary certificate.
    pub install: url::Url,
    /// `rs/ssl?CACert=1&SNIDomain=`: intermediate certificate.
    pub cacert: url::Url,
}

impl Endpoints {
    pub fn new(portal: &url::Url, target: &str) -> Result<Self> {
        let ssl = portal.join("rs/ssl")?;
        let with_query = |flag: Option<&str>| {
            let mut url = ssl.clone();
            {
                let mut query = url.query_pairs_mut();
                if let Some(flag) = flag {
                    query.append_pair(flag, "1");
                }
                query.append_pair("SNIDomain", target);
            }
            url
        };
        Ok(Endpoints {
            login: portal.clone(),
            setting: with_query(None),
            install: with_query(Some("Install")),
            cacert: with_query(Some("CACert")),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPage {
    Accepted,
    Rejected,
}

pub fn classify_login(body: &str) -> LoginPage {
    if body.contains(LOGIN_REJECTED) {
        LoginPage::Rejected
    } else {
        LoginPage::Accepted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPage {
    Accepted,
    KeyRejected,
    SslNotFound,
    Failed,
}

pub fn classify_upload(body: &str) -> UploadPage {
    if body.contains(AWAITING_KEY) {
        UploadPage::KeyRejected
    } else if body.contains(ERROR_BANNER) {
        if body.contains(SSL_NOT_FOUND) {
            UploadPage::SslNotFound
        } else {
            UploadPage::Failed
        }
    } else {
        UploadPage::Accepted
    }
}

pub fn offers_new_setting(body: &str) -> bool {
    body.contains(OFFERS_NEW_SETTING)
}

pub fn is_creating(body: &str) -> bool {
    body.contains(CREATING_SETTING)
}

pub fn awaits_key(body: &str) -> bool {
    body.contains(AWAITING_KEY)
}

pub fn awaits_cert(body: &str) -> bool {
    body.contains(AWAITING_CERT)
}

pub fn needs_enable(body: &str) -> bool {
    body.contains(NOT_FINALIZED)
}

pub fn rejects_cert(body: &str) -> bool {
    body.contains(NOT_A_CERT)
}
