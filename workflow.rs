use tracing::{info, warn};

use crate::error::{Error, PageReason, Result, Step};
use crate::material::Material;
use crate::portal::{self, Endpoints, LoginPage, UploadPage};
use crate::session::{FilePart, Transport};
use crate::token::{extract_token, Token};

/// Drives the control panel through one certificate installation.
pub struct Installer<T> {
    transport: T,
    verbose: bool,
}

impl<T: Transport> Installer<T> {
    pub fn new(transport: T, verbose: bool) -> Self {
        Installer { transport, verbose }
    }

    fn progress(&self, step: Step, line: &str) {
        info!(%step, "step");
        if self.verbose {
            println!("{line}");
        }
    }

    /// Returns the response page and the token it carries.
    fn post(&mut self, step: Step, url: &url::Url, fields: &[(&str, &str)]) -> Result<(String, Token)> {
        let body = self.transport.post(url.as_str(), fields)?;
        let token = extract_token(&body, step)?;
        Ok((body, token))
    }

    pub fn login(&mut self, login_url: &url::Url, domain: &str, password: &str) -> Result<()> {
        self.progress(Step::Login, "- ログイン");
        let body = self.transport.get(login_url.as_str())?;
        let token = extract_token(&body, Step::Login)?;
        let body = self.transport.post(
            login_url.as_str(),
            &[
                ("domain", domain),
                ("password", password),
                ("Token", token.as_str()),
                ("Submit", "index"),
            ],
        )?;
        match portal::classify_login(&body) {
            LoginPage::Accepted => Ok(()),
            LoginPage::Rejected => {
                warn!(domain, "login rejected");
                Err(Error::LoginRejected)
            }
        }
    }

    fn create_new_setting(&mut self, urls: &Endpoints, token: &Token) -> Result<(String, Token)> {
        self.progress(Step::CreateNewSetting, "- 「秘密鍵を含む新しい設定の作成」を選択");
        let body = self.transport.post(
            urls.setting.as_str(),
            &[
                ("Target", "new"),
                ("Token", token.as_str()),
                ("Submit_newdir", portal::OFFERS_NEW_SETTING),
            ],
        )?;
        if !portal::is_creating(&body) {
            return Err(Error::unexpected(
                Step::CreateNewSetting,
                PageReason::MarkerAbsent(portal::CREATING_SETTING),
            ));
        }
        let token = extract_token(&body, Step::CreateNewSetting)?;
        Ok((body, token))
    }

    fn upload_secret_key(&mut self, urls: &Endpoints, secret: &[u8], token: &Token) -> Result<(String, Token)> {
        self.progress(Step::UploadSecretKey, "- 秘密鍵送信");
        // the panel refuses uploads without it
        self.transport.set_referer(urls.setting.as_str());
        let body = self.transport.post_multipart(
            urls.setting.as_str(),
            &[
                ("Token", token.as_str()),
                ("Password", ""),
                ("Submit_upload", "秘密鍵をアップロードする"),
            ],
            FilePart { field: "file", file_name: "secret.key", bytes: secret },
        )?;
        match portal::classify_upload(&body) {
            UploadPage::Accepted => {}
            UploadPage::KeyRejected => return Err(Error::KeyRejected),
            UploadPage::SslNotFound => return Err(Error::SslNotFound),
            UploadPage::Failed => return Err(Error::UploadFailed),
        }
        let token = extract_token(&body, Step::UploadSecretKey)?;
        Ok((body, token))
    }

    fn install_primary_cert(&mut self, urls: &Endpoints, cert: &str, token: &Token) -> Result<(String, Token)> {
        self.progress(Step::InstallPrimaryCert, "- 証明書認証局から送られた証明書の送信");
        self.post(
            Step::InstallPrimaryCert,
            &urls.install,
            &[
                ("Token", token.as_str()),
                ("Cert", cert),
                ("Submit_install.x", "40"),
                ("Submit_install.y", "7"),
            ],
        )
    }

    fn enable_new_setting(&mut self, urls: &Endpoints, token: &Token) -> Result<String> {
        self.progress(Step::EnableNewSetting, "- 設定の有効化");
        self.transport.post(urls.setting.as_str(), &[("Submit", "applynew"), ("Token", token.as_str())])
    }

    fn install_intermediate_cert(&mut self, urls: &Endpoints, cert: &str) -> Result<String> {
        self.progress(Step::InstallIntermediateCert, "- 中間証明書の送信");
        let body = self.transport.get(urls.cacert.as_str())?;
        let token = extract_token(&body, Step::InstallIntermediateCert)?;
        self.transport.post(
            urls.cacert.as_str(),
            &[
                ("Token", token.as_str()),
                ("Cert", cert),
                ("Submit_cacert.x", "40"),
                ("Submit_cacert.y", "7"),
            ],
        )
    }

    /// Runs every step after login. Stops at the first failure; whatever the
    /// panel already accepted stays there.
    pub fn install(&mut self, urls: &Endpoints, material: &Material) -> Result<()> {
        let mut body = self.transport.get(urls.setting.as_str())?;
        let mut token = extract_token(&body, Step::OpenSetting)?;

        if portal::offers_new_setting(&body) {
            (body, token) = self.create_new_setting(urls, &token)?;
        }
        if !portal::awaits_key(&body) {
            return Err(Error::unexpected(Step::OpenSetting, PageReason::MarkerAbsent(portal::AWAITING_KEY)));
        }

        (body, token) = self.upload_secret_key(urls, &material.secret, &token)?;
        if !portal::awaits_cert(&body) {
            return Err(Error::unexpected(
                Step::UploadSecretKey,
                PageReason::MarkerAbsent(portal::AWAITING_CERT),
            ));
        }

        (body, token) = self.install_primary_cert(urls, &material.cacert1, &token)?;
        if portal::needs_enable(&body) {
            body = self.enable_new_setting(urls, &token)?;
        }
        if portal::is_creating(&body) {
            warn!("new setting was not finalized");
            return Err(Error::SettingFailed);
        }

        let body = self.install_intermediate_cert(urls, &material.cacert2)?;
        if portal::rejects_cert(&body) {
            warn!("intermediate certificate rejected");
            return Err(Error::CertificateRejected);
        }

        if self.verbose {
            println!("設定が完了しました．");
            println!("「SNI SSLを利用する」にチェックを入れていない場合は，入れてください");
        }
        Ok(())
    }
}
