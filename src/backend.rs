use anyhow::Result;
use log::{debug, error, info};

use crate::kernel::{DispatchMode, Receiver, Sender};
use crate::protocol::{
  AccountInfo, ConfigReport, InfoReport, LoadConfig, LoadConfigFile, LoginReport, LogoutReport,
  PortalConfig, Report, Request,
};
use crate::ChannelClosed;

/// Boundary to the network client proper. The wire protocol lives behind
/// this trait; the actor only converts requests into session calls and
/// session outcomes into reports.
#[cfg_attr(test, mockall::automock)]
pub trait PortalSession {
  /// Applies connection settings. The actor blanks the manual ip / ac_id
  /// fields when the corresponding auto flag is set, so implementations
  /// can take the config as-is.
  fn apply_config(&mut self, config: &PortalConfig);

  fn load_config_file(&mut self, path: &str) -> Result<PortalConfig>;

  fn is_online(&mut self) -> Result<bool>;

  fn login(&mut self) -> Result<()>;

  fn fetch_info(&mut self) -> Result<AccountInfo>;

  fn logout(&mut self) -> Result<()>;

  fn username(&self) -> String;

  fn online_ip(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
  Serving,
  Stopped,
}

/// Blocking actor driving a `PortalSession`. Owns the request channel's
/// receiver; the UI sender stays detached until `set_ui` wires it, so
/// reports produced before wiring are silently dropped.
pub struct Backend<S: PortalSession> {
  receiver: Receiver<Request>,
  ui: Sender<Report>,
  session: S,
  state: BackendState,
}

impl<S: PortalSession> Backend<S> {
  pub fn new(session: S) -> Self {
    Self {
      receiver: Receiver::new(),
      ui: Sender::detached(),
      session,
      state: BackendState::Serving,
    }
  }

  pub fn sender(&self) -> Sender<Request> {
    self.receiver.sender()
  }

  pub fn set_ui(&mut self, ui: Sender<Report>) {
    self.ui = ui;
  }

  pub fn state(&self) -> BackendState {
    self.state
  }

  /// Parks on the request channel until work arrives; returns once the
  /// close sentinel is observed.
  pub fn run(&mut self) {
    while self.state == BackendState::Serving {
      if let Err(ChannelClosed) = self.step() {
        info!("backend received the close sentinel, stopping");
        self.transit(BackendState::Stopped);
      }
    }
  }

  fn transit(&mut self, next: BackendState) {
    debug!("backend state {:?} -> {:?}", self.state, next);
    self.state = next;
  }

  fn step(&mut self) -> Result<(), ChannelClosed> {
    let next = self
      .receiver
      .dispatch(DispatchMode::Blocking)
      .on(Request::Fault)
      .on(Request::LoadConfig)
      .on(Request::LoadConfigFile)
      .on(Request::Login)
      .on(Request::FetchInfo)
      .on(Request::Logout)
      .execute()?;
    if let Some(request) = next {
      self.handle(request);
    }
    Ok(())
  }

  fn handle(&mut self, request: Request) {
    match request {
      Request::Fault(msg) => error!("backend fault: {}", msg.message),
      Request::LoadConfig(msg) => self.load_config(msg),
      Request::LoadConfigFile(msg) => self.load_config_file(msg),
      Request::Login(_) => self.login(),
      Request::FetchInfo(_) => self.fetch_info(),
      Request::Logout(_) => self.logout(),
    }
  }

  fn load_config(&mut self, msg: LoadConfig) {
    debug!("applying config for {}", msg.config.username);
    let mut config = msg.config;
    // manual overrides only count when the matching auto flag is off
    if config.auto_ip {
      config.ip.clear();
    }
    if config.auto_ac_id {
      config.ac_id = 0;
    }
    self.session.apply_config(&config);
  }

  fn load_config_file(&mut self, msg: LoadConfigFile) {
    info!("loading config file {}", msg.path);
    match self.session.load_config_file(&msg.path) {
      Ok(config) => self.ui.send(ConfigReport {
        error: None,
        finished: true,
        path: msg.path,
        config,
      }),
      Err(e) => self.ui.send(ConfigReport {
        error: Some(e.to_string()),
        finished: false,
        path: msg.path,
        config: PortalConfig::default(),
      }),
    }
  }

  fn login(&mut self) {
    let username = self.session.username();
    info!("login requested for {}", username);
    if let Err(e) = self.login_flow(&username) {
      self.ui.send(LoginReport {
        error: Some(e.to_string()),
        finished: false,
        username,
      });
    }
  }

  fn login_flow(&mut self, username: &str) -> Result<()> {
    if self.session.is_online()? {
      self.report_login(username, true);
      return Ok(());
    }
    self.report_login(username, false);
    self.session.login()?;
    self.report_login(username, true);
    Ok(())
  }

  fn report_login(&self, username: &str, finished: bool) {
    self.ui.send(LoginReport {
      error: None,
      finished,
      username: username.to_string(),
    });
  }

  fn fetch_info(&mut self) {
    match self.session.fetch_info() {
      Ok(info) => self.ui.send(InfoReport {
        error: None,
        finished: true,
        info,
      }),
      Err(e) => self.ui.send(InfoReport {
        error: Some(e.to_string()),
        finished: false,
        info: AccountInfo::default(),
      }),
    }
  }

  fn logout(&mut self) {
    let username = self.session.username();
    let ip = self.session.online_ip();
    info!("logout requested for {}", username);
    match self.session.logout() {
      Ok(()) => self.ui.send(LogoutReport {
        error: None,
        finished: true,
        username,
        ip,
      }),
      Err(e) => self.ui.send(LogoutReport {
        error: Some(e.to_string()),
        finished: false,
        username,
        ip,
      }),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::protocol::{Fault, FetchInfo, Login, Logout};
  use anyhow::anyhow;
  use std::env;
  use std::thread;

  #[ctor::ctor]
  fn init_logger() {
    env::set_var("RUST_LOG", "debug");
    let _ = env_logger::try_init();
  }

  fn drain(ui: &Receiver<Report>) -> Vec<Report> {
    let mut reports = Vec::new();
    loop {
      let next = ui
        .dispatch(DispatchMode::NonBlocking)
        .on(Report::Config)
        .on(Report::Login)
        .on(Report::Info)
        .on(Report::Logout)
        .on(Report::Fault)
        .execute()
        .unwrap();
      match next {
        Some(report) => reports.push(report),
        None => return reports,
      }
    }
  }

  #[test]
  fn test_login_reports_progress_then_success() {
    let mut session = MockPortalSession::new();
    session
      .expect_username()
      .return_const("alice".to_string());
    session.expect_is_online().times(1).returning(|| Ok(false));
    session.expect_login().times(1).returning(|| Ok(()));

    let ui = Receiver::new();
    let mut backend = Backend::new(session);
    backend.set_ui(ui.sender());
    backend.sender().send(Login);
    backend.step().unwrap();

    assert_eq!(
      drain(&ui),
      vec![
        Report::Login(LoginReport {
          error: None,
          finished: false,
          username: "alice".to_string(),
        }),
        Report::Login(LoginReport {
          error: None,
          finished: true,
          username: "alice".to_string(),
        }),
      ]
    );
  }

  #[test]
  fn test_login_short_circuits_when_already_online() {
    let mut session = MockPortalSession::new();
    session
      .expect_username()
      .return_const("alice".to_string());
    session.expect_is_online().times(1).returning(|| Ok(true));
    session.expect_login().times(0);

    let ui = Receiver::new();
    let mut backend = Backend::new(session);
    backend.set_ui(ui.sender());
    backend.sender().send(Login);
    backend.step().unwrap();

    assert_eq!(
      drain(&ui),
      vec![Report::Login(LoginReport {
        error: None,
        finished: true,
        username: "alice".to_string(),
      })]
    );
  }

  #[test]
  fn test_login_failure_is_reported_not_raised() {
    let mut session = MockPortalSession::new();
    session
      .expect_username()
      .return_const("alice".to_string());
    session.expect_is_online().times(1).returning(|| Ok(false));
    session
      .expect_login()
      .times(1)
      .returning(|| Err(anyhow!("denied")));

    let ui = Receiver::new();
    let mut backend = Backend::new(session);
    backend.set_ui(ui.sender());
    backend.sender().send(Login);
    backend.step().unwrap();

    assert_eq!(
      drain(&ui),
      vec![
        Report::Login(LoginReport {
          error: None,
          finished: false,
          username: "alice".to_string(),
        }),
        Report::Login(LoginReport {
          error: Some("denied".to_string()),
          finished: false,
          username: "alice".to_string(),
        }),
      ]
    );
  }

  #[test]
  fn test_load_config_blanks_manual_fields_when_auto_is_on() {
    let mut session = MockPortalSession::new();
    session
      .expect_apply_config()
      .times(1)
      .withf(|config| {
        config.host == "portal.example.org"
          && config.username == "alice"
          && config.ip.is_empty()
          && config.ac_id == 7
      })
      .return_const(());

    let mut backend = Backend::new(session);
    backend.sender().send(LoadConfig {
      config: PortalConfig {
        host: "portal.example.org".to_string(),
        username: "alice".to_string(),
        auto_ip: true,
        ip: "10.0.0.9".to_string(),
        auto_ac_id: false,
        ac_id: 7,
        ..PortalConfig::default()
      },
    });
    backend.step().unwrap();
  }

  #[test]
  fn test_config_file_errors_carry_the_message() {
    let mut session = MockPortalSession::new();
    session
      .expect_load_config_file()
      .times(1)
      .returning(|_| Err(anyhow!("no such file")));

    let ui = Receiver::new();
    let mut backend = Backend::new(session);
    backend.set_ui(ui.sender());
    backend.sender().send(LoadConfigFile {
      path: "missing.json".to_string(),
    });
    backend.step().unwrap();

    assert_eq!(
      drain(&ui),
      vec![Report::Config(ConfigReport {
        error: Some("no such file".to_string()),
        finished: false,
        path: "missing.json".to_string(),
        config: PortalConfig::default(),
      })]
    );
  }

  #[test]
  fn test_fetch_info_reports_the_account() {
    let info = AccountInfo {
      username: "alice".to_string(),
      online_ip: "10.0.0.7".to_string(),
      balance: 12.5,
      ..AccountInfo::default()
    };
    let reported = info.clone();
    let mut session = MockPortalSession::new();
    session
      .expect_fetch_info()
      .times(1)
      .returning(move || Ok(reported.clone()));

    let ui = Receiver::new();
    let mut backend = Backend::new(session);
    backend.set_ui(ui.sender());
    backend.sender().send(FetchInfo);
    backend.step().unwrap();

    assert_eq!(
      drain(&ui),
      vec![Report::Info(InfoReport {
        error: None,
        finished: true,
        info,
      })]
    );
  }

  #[test]
  fn test_logout_reports_username_and_ip() {
    let mut session = MockPortalSession::new();
    session
      .expect_username()
      .return_const("alice".to_string());
    session
      .expect_online_ip()
      .return_const("10.0.0.7".to_string());
    session.expect_logout().times(1).returning(|| Ok(()));

    let ui = Receiver::new();
    let mut backend = Backend::new(session);
    backend.set_ui(ui.sender());
    backend.sender().send(Logout);
    backend.step().unwrap();

    assert_eq!(
      drain(&ui),
      vec![Report::Logout(LogoutReport {
        error: None,
        finished: true,
        username: "alice".to_string(),
        ip: "10.0.0.7".to_string(),
      })]
    );
  }

  #[test]
  fn test_fault_requests_are_logged_only() {
    let session = MockPortalSession::new();
    let ui = Receiver::new();
    let mut backend = Backend::new(session);
    backend.set_ui(ui.sender());
    backend.sender().send(Fault {
      message: "upstream hiccup".to_string(),
    });
    backend.step().unwrap();
    assert_eq!(drain(&ui), vec![]);
  }

  #[test]
  fn test_run_stops_on_the_close_sentinel() {
    let session = MockPortalSession::new();
    let mut backend = Backend::new(session);
    let sender = backend.sender();

    let handle = thread::spawn(move || {
      backend.run();
      backend
    });
    sender.send(Fault {
      message: "still serving".to_string(),
    });
    sender.close();

    let backend = handle.join().unwrap();
    assert_eq!(backend.state(), BackendState::Stopped);
  }

  #[test]
  fn test_reports_before_ui_wiring_are_dropped() {
    let mut session = MockPortalSession::new();
    session
      .expect_username()
      .return_const("alice".to_string());
    session.expect_is_online().times(1).returning(|| Ok(true));

    let mut backend = Backend::new(session);
    backend.sender().send(Login);
    // no set_ui: the detached sender swallows the report
    backend.step().unwrap();
  }
}
