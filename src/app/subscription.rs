// SPDX-License-Identifier: MPL-2.0
//! Timers driving the application.
//!
//! - the tracking poll, active while the worker runs
//! - the one-second capture countdown, active while capturing

use super::{App, Message};
use iced::{time, Subscription};
use std::time::Duration;

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

pub(super) fn subscription(app: &App) -> Subscription<Message> {
    let mut subscriptions = Vec::with_capacity(2);

    if app.tracking.is_some() {
        subscriptions.push(time::every(app.config.poll_interval()).map(Message::Poll));
    }
    if app.session.is_capturing() {
        subscriptions.push(time::every(COUNTDOWN_STEP).map(|_| Message::CountdownTick));
    }

    Subscription::batch(subscriptions)
}
