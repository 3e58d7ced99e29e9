use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Login,
    OpenSetting,
    CreateNewSetting,
    UploadSecretKey,
    InstallPrimaryCert,
    EnableNewSetting,
    InstallIntermediateCert,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Step::Login => "login",
            Step::OpenSetting => "open-setting",
            Step::CreateNewSetting => "create-new-setting",
            Step::UploadSecretKey => "upload-secret-key",
            Step::InstallPrimaryCert => "install-primary-cert",
            Step::EnableNewSetting => "enable-new-setting",
            Step::InstallIntermediateCert => "install-intermediate-cert",
        })
    }
}

/// Why a page did not match what the workflow expected at a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageReason {
    TokenMissing,
    MarkerAbsent(&'static str),
}

impl std::fmt::Display for PageReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageReason::TokenMissing => f.write_str("no form token"),
            PageReason::MarkerAbsent(marker) => write!(f, "marker {marker:?} not found"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("failed to read response from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid portal url: {0}")]
    Url(#[from] url::ParseError),

    #[error("login rejected: domain or password is wrong")]
    LoginRejected,

    #[error("unexpected page at {step}: {reason}")]
    UnexpectedPage { step: Step, reason: PageReason },

    #[error("secret key was rejected")]
    KeyRejected,

    #[error("secret key upload failed: SSL setting not found")]
    SslNotFound,

    #[error("secret key upload failed")]
    UploadFailed,

    #[error("new setting is still being created")]
    SettingFailed,

    #[error("intermediate certificate was not recognized as a certificate")]
    CertificateRejected,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub fn unexpected(step: Step, reason: PageReason) -> Self {
        Error::UnexpectedPage { step, reason }
    }

    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Operator message printed on stdout. Transition errors are only
    /// reported in verbose mode; rejections are always reported.
    pub fn notice(&self, verbose: bool) -> Option<&'static str> {
        match self {
            Error::LoginRejected => Some("   エラー"),
            Error::KeyRejected => Some(" 秘密鍵の送信に失敗"),
            Error::SslNotFound => Some(" エラー: SSLが見つかりません"),
            Error::UploadFailed => Some(" エラー"),
            Error::SettingFailed | Error::CertificateRejected => Some(" 設定に失敗しました"),
            Error::UnexpectedPage { step: Step::OpenSetting, .. } => Some("  Unexpected page"),
            Error::UnexpectedPage { step: Step::CreateNewSetting, .. } if verbose => Some(" 遷移エラー"),
            Error::UnexpectedPage { .. } if verbose => Some("遷移エラー"),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_exits_with_one() {
        let errors = [
            Error::MissingInput { path: "secret.key".into() },
            Error::LoginRejected,
            Error::KeyRejected,
            Error::CertificateRejected,
            Error::unexpected(Step::UploadSecretKey, PageReason::TokenMissing),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn transition_errors_are_quiet_unless_verbose() {
        let err = Error::unexpected(
            Step::UploadSecretKey,
            PageReason::MarkerAbsent("証明書認証局から送られた証明書を以下に貼り付け"),
        );
        assert_eq!(err.notice(false), None);
        assert_eq!(err.notice(true), Some("遷移エラー"));
    }

    #[test]
    fn rejections_are_always_reported() {
        assert_eq!(Error::KeyRejected.notice(false), Some(" 秘密鍵の送信に失敗"));
        assert_eq!(Error::SslNotFound.notice(false), Some(" エラー: SSLが見つかりません"));
        assert_eq!(Error::LoginRejected.notice(false), Some("   エラー"));
    }

    #[test]
    fn display_names_step_and_reason() {
        let err = Error::unexpected(Step::OpenSetting, PageReason::TokenMissing);
        assert_eq!(err.to_string(), "unexpected page at open-setting: no form token");
    }
}
