use log::{debug, error};

use crate::kernel::{DispatchMode, Receiver, Sender};
use crate::protocol::{
  AccountInfo, FetchInfo, LoadConfig, LoadConfigFile, Login, Logout, PortalConfig, Report, Request,
};
use crate::ChannelClosed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontendState {
  Idle,
  Waiting,
  Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Error,
  Warning,
  Info,
}

/// Popup surrogate: a one-line notification waiting for acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
  pub severity: Severity,
  pub text: String,
}

/// Polling view-model actor: the screen state machine without any
/// rendering. `poll` is expected to run once per frame; each call performs
/// exactly one non-blocking dispatch, with the arm set chosen by the
/// current state. Reports outside that set are dropped.
pub struct Frontend {
  receiver: Receiver<Report>,
  backend: Sender<Request>,
  state: FrontendState,
  last_state: Option<FrontendState>,
  config_path: String,
  config: PortalConfig,
  config_error: Option<String>,
  account: AccountInfo,
  progress: String,
  notice: Option<Notice>,
}

impl Frontend {
  pub fn new() -> Self {
    Self {
      receiver: Receiver::new(),
      backend: Sender::detached(),
      state: FrontendState::Idle,
      last_state: None,
      config_path: String::new(),
      config: PortalConfig::default(),
      config_error: None,
      account: AccountInfo::default(),
      progress: String::new(),
      notice: None,
    }
  }

  pub fn sender(&self) -> Sender<Report> {
    self.receiver.sender()
  }

  pub fn set_backend(&mut self, backend: Sender<Request>) {
    self.backend = backend;
  }

  pub fn state(&self) -> FrontendState {
    self.state
  }

  pub fn config(&self) -> &PortalConfig {
    &self.config
  }

  pub fn config_path(&self) -> &str {
    &self.config_path
  }

  pub fn config_error(&self) -> Option<&str> {
    self.config_error.as_deref()
  }

  pub fn account(&self) -> &AccountInfo {
    &self.account
  }

  pub fn progress(&self) -> &str {
    &self.progress
  }

  pub fn notice(&self) -> Option<&Notice> {
    self.notice.as_ref()
  }

  pub fn load_config_file(&mut self, path: &str) {
    self.backend.send(LoadConfigFile {
      path: path.to_string(),
    });
  }

  pub fn login(&mut self) {
    self.backend.send(Login);
    self.progress = "Connecting...".to_string();
    self.transit(FrontendState::Waiting);
  }

  /// The config screen's "ready" action: push the edited config to the
  /// backend, then log in with it.
  pub fn apply_and_login(&mut self, config: PortalConfig) {
    self.backend.send(LoadConfig { config });
    self.login();
  }

  pub fn fetch_info(&mut self) {
    self.backend.send(FetchInfo);
  }

  pub fn logout(&mut self) {
    self.backend.send(Logout);
    self.progress = "Logout...".to_string();
    self.transit(FrontendState::Waiting);
  }

  /// The waiting screen's cancel action: back to the previous screen
  /// without waiting for the pending report.
  pub fn cancel(&mut self) {
    self.revert();
  }

  /// Asks the backend's blocking loop to stop.
  pub fn shutdown(&self) {
    self.backend.close();
  }

  pub fn acknowledge_notice(&mut self) {
    self.notice = None;
  }

  /// One non-blocking dispatch against the report channel. A raised
  /// `ChannelClosed` means "stop the outer loop", not just this call.
  pub fn poll(&mut self) -> Result<(), ChannelClosed> {
    let report = match self.state {
      FrontendState::Idle => self
        .receiver
        .dispatch(DispatchMode::NonBlocking)
        .on(Report::Fault)
        .on(Report::Config)
        .execute()?,
      FrontendState::Waiting => self
        .receiver
        .dispatch(DispatchMode::NonBlocking)
        .on(Report::Fault)
        .on(Report::Login)
        .on(Report::Info)
        .on(Report::Logout)
        .execute()?,
      FrontendState::Info => self
        .receiver
        .dispatch(DispatchMode::NonBlocking)
        .on(Report::Fault)
        .on(Report::Info)
        .execute()?,
    };
    if let Some(report) = report {
      self.apply(report);
    }
    Ok(())
  }

  fn apply(&mut self, report: Report) {
    match (self.state, report) {
      (FrontendState::Idle, Report::Fault(msg)) => {
        self.raise_error(format!("Error: {}", msg.message));
      }
      (FrontendState::Idle, Report::Config(msg)) => {
        if let Some(e) = msg.error {
          self.config_error = Some(e);
        } else if msg.finished {
          self.config_error = None;
          self.config_path = msg.path;
          self.config = msg.config;
        }
      }
      (FrontendState::Waiting, Report::Fault(msg)) => {
        self.raise_error(format!("Error: {}", msg.message));
        self.revert();
      }
      (FrontendState::Waiting, Report::Login(msg)) => {
        if let Some(e) = msg.error {
          self.raise_error(format!("Error: {}", e));
          self.revert();
        } else if !msg.finished {
          self.progress = "Login...".to_string();
        } else {
          self.progress = "Getting user info...".to_string();
          self.backend.send(FetchInfo);
        }
      }
      (FrontendState::Waiting, Report::Info(msg)) => {
        if let Some(e) = msg.error {
          self.raise_error(format!("Error: {}", e));
          self.revert();
        } else if msg.finished {
          self.account = msg.info;
          self.transit(FrontendState::Info);
        } else {
          self.progress = "Getting user info...".to_string();
        }
      }
      (FrontendState::Waiting, Report::Logout(msg)) => {
        if let Some(e) = msg.error {
          self.raise_error(format!("Error: {}", e));
          self.revert();
        } else if !msg.finished {
          self.progress = "Logout...".to_string();
        } else {
          self.notice = Some(Notice {
            severity: Severity::Info,
            text: "Logout success.".to_string(),
          });
          self.transit(FrontendState::Idle);
        }
      }
      (FrontendState::Info, Report::Fault(msg)) => error!("frontend fault: {}", msg.message),
      (FrontendState::Info, Report::Info(msg)) => {
        if let Some(e) = msg.error {
          error!("frontend fault: {}", e);
        } else if msg.finished {
          self.account = msg.info;
        }
      }
      (state, report) => debug!("report {:?} ignored in state {:?}", report, state),
    }
  }

  fn transit(&mut self, next: FrontendState) {
    debug!("frontend state {:?} -> {:?}", self.state, next);
    self.last_state = Some(self.state);
    self.state = next;
  }

  fn revert(&mut self) {
    if let Some(last) = self.last_state.take() {
      debug!("frontend state {:?} -> {:?} (revert)", self.state, last);
      self.state = last;
    }
  }

  fn raise_error(&mut self, text: String) {
    error!("{}", text);
    self.notice = Some(Notice {
      severity: Severity::Error,
      text,
    });
  }
}

impl Default for Frontend {
  fn default() -> Self {
    Self::new()
  }
}
