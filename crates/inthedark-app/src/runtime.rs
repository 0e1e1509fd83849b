//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: Session, game and screen state machine
//! - [`Bridge`]: Protocol bridge to the connection manager
//! - [`Driver`]: Front-end I/O
//!
//! It waits on two sources at once, user commands from the driver and link
//! reports from the transport, and handles whichever arrives first to
//! completion before waiting again.

use std::collections::VecDeque;

use inthedark_client::{Connector, LinkReport};
use tokio::sync::mpsc;

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Front-end I/O driver
/// - `C`: Connector the bridge opens links with
pub struct Runtime<D, C>
where
    D: Driver,
    C: Connector,
{
    driver: D,
    app: App,
    bridge: Bridge<C>,
    reports: mpsc::UnboundedReceiver<LinkReport>,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Connector,
{
    /// Create a runtime.
    ///
    /// `reports` is where the connector's links report to. A `pending_room`
    /// starts the client in quick join.
    pub fn new(
        driver: D,
        bridge: Bridge<C>,
        reports: mpsc::UnboundedReceiver<LinkReport>,
        pending_room: Option<String>,
    ) -> Self {
        let mut app = App::new(pending_room);
        app.set_cached_user(driver.cached_user());
        Self { driver, app, bridge, reports }
    }

    /// Run the main event loop until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let actions = self.app.start();
        if self.process_actions(actions)? {
            self.bridge.shutdown();
            return Ok(());
        }

        loop {
            tokio::select! {
                command = self.driver.next_command() => {
                    let Some(command) = command? else {
                        tracing::debug!("input closed");
                        break;
                    };
                    let actions = self.app.handle_command(command);
                    if self.process_actions(actions)? {
                        break;
                    }
                },
                Some(report) = self.reports.recv() => {
                    let events = self.bridge.handle_link_report(report);
                    if self.process_events(events)? {
                        break;
                    }
                },
            }
        }

        self.bridge.shutdown();
        Ok(())
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending: VecDeque<AppAction> = initial_actions.into();

        while let Some(action) = pending.pop_front() {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::Notify(message) => self.driver.notify(&message)?,
                AppAction::CacheUser { user_id } => self.driver.cache_user(Some(&user_id))?,
                AppAction::ClearCachedUser => self.driver.cache_user(None)?,

                // Protocol operations go through the bridge
                AppAction::Connect { .. }
                | AppAction::Disconnect
                | AppAction::CreateSession
                | AppAction::JoinSession { .. }
                | AppAction::LeaveSession
                | AppAction::RequestSession
                | AppAction::StartGame
                | AppAction::Play { .. } => {
                    for event in self.bridge.process_app_action(action) {
                        pending.extend(self.app.handle(event));
                    }
                },
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    fn process_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge<C> {
        &self.bridge
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
