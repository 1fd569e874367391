use crate::protocol::{impl_payload, Fault, PortalConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfigFile {
  pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
  pub config: PortalConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Login;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchInfo;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Logout;

/// Everything the UI can ask of the backend actor.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
  LoadConfigFile(LoadConfigFile),
  LoadConfig(LoadConfig),
  Login(Login),
  FetchInfo(FetchInfo),
  Logout(Logout),
  Fault(Fault),
}

impl crate::kernel::Protocol for Request {}

impl_payload!(Request::LoadConfigFile => LoadConfigFile);
impl_payload!(Request::LoadConfig => LoadConfig);
impl_payload!(Request::Login => Login);
impl_payload!(Request::FetchInfo => FetchInfo);
impl_payload!(Request::Logout => Logout);
impl_payload!(Request::Fault => Fault);
