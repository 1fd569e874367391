use crate::protocol::{impl_payload, AccountInfo, Fault, PortalConfig};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigReport {
  pub error: Option<String>,
  pub finished: bool,
  pub path: String,
  pub config: PortalConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoginReport {
  pub error: Option<String>,
  pub finished: bool,
  pub username: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfoReport {
  pub error: Option<String>,
  pub finished: bool,
  pub info: AccountInfo,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogoutReport {
  pub error: Option<String>,
  pub finished: bool,
  pub username: String,
  pub ip: String,
}

/// Everything the backend reports back to the UI. `finished == false`
/// with no error means the operation is still in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
  Config(ConfigReport),
  Login(LoginReport),
  Info(InfoReport),
  Logout(LogoutReport),
  Fault(Fault),
}

impl crate::kernel::Protocol for Report {}

impl_payload!(Report::Config => ConfigReport);
impl_payload!(Report::Login => LoginReport);
impl_payload!(Report::Info => InfoReport);
impl_payload!(Report::Logout => LogoutReport);
impl_payload!(Report::Fault => Fault);
