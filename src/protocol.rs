mod report;
mod request;

pub use report::*;
pub use request::*;

/// Connection settings for the portal endpoint. Auto flags mirror the
/// original config format: when set, ip / ac_id are resolved by the
/// session rather than taken from here.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
  pub scheme: String,
  pub host: String,
  pub port: String,
  pub username: String,
  pub password: String,
  pub auto_ip: bool,
  pub ip: String,
  pub auto_ac_id: bool,
  pub ac_id: i32,
}

impl Default for PortalConfig {
  fn default() -> Self {
    Self {
      scheme: String::new(),
      host: String::new(),
      port: String::new(),
      username: String::new(),
      password: String::new(),
      auto_ip: true,
      ip: String::new(),
      auto_ac_id: true,
      ac_id: 0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnlineDevice {
  pub kind: String,
  pub ipv4: String,
  pub ipv6: String,
  pub os_name: String,
  pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountInfo {
  pub username: String,
  pub online_ip: String,
  pub mac: String,
  pub balance: f64,
  pub remain_seconds: u64,
  pub sum_seconds: u64,
  pub in_bytes: u64,
  pub out_bytes: u64,
  pub remain_bytes: u64,
  pub sum_bytes: u64,
  pub devices: Vec<OnlineDevice>,
}

/// Free-form error notification; travels on both channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
  pub message: String,
}

macro_rules! impl_payload {
  ($protocol:ident :: $variant:ident => $msg:ty) => {
    impl crate::kernel::Payload<$protocol> for $msg {
      fn into_protocol(self) -> $protocol {
        $protocol::$variant(self)
      }

      fn from_protocol(protocol: $protocol) -> Result<Self, $protocol> {
        match protocol {
          $protocol::$variant(msg) => Ok(msg),
          other => Err(other),
        }
      }
    }
  };
}

pub(crate) use impl_payload;
