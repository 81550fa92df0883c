// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Subscribes a monitor to a signal source for the lifetime of a guard.

use std::rc::Rc;
use std::sync::Arc;

use ebb_core::platform::{SignalSource, SubscriptionId};
use ebb_core::telemetry::{NetworkUpdate, ResourceMonitor};

/// Keeps a monitor subscribed to a signal source.
///
/// Dropping the attachment unsubscribes the monitor.
pub struct MonitorAttachment {
    source: Rc<dyn SignalSource>,
    subscription: SubscriptionId,
    monitor_id: String,
}

/// Subscribes `monitor` to every update `source` produces.
///
/// If the source already has a reading it is applied immediately, so the
/// monitor reflects the host's conditions before the first change event.
pub fn attach(monitor: Arc<dyn ResourceMonitor>, source: Rc<dyn SignalSource>) -> MonitorAttachment {
    if let Some(initial) = source.current() {
        monitor.on_update(&initial);
    }

    let monitor_id = monitor.monitor_id().into_owned();
    let subscription = source.subscribe(Box::new(move |update: &NetworkUpdate| {
        monitor.on_update(update)
    }));
    log::info!("Attached resource monitor '{}' to signal source.", monitor_id);

    MonitorAttachment {
        source,
        subscription,
        monitor_id,
    }
}

impl MonitorAttachment {
    /// The subscription held by this attachment.
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }
}

impl Drop for MonitorAttachment {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
        log::debug!("Detached resource monitor '{}'.", self.monitor_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkMonitor;
    use ebb_core::platform::SignalCallback;
    use ebb_core::telemetry::{ConnectionTier, NetworkUpdate};
    use std::cell::RefCell;

    #[derive(Default)]
    struct StubSource {
        initial: Option<NetworkUpdate>,
        subscribers: RefCell<Vec<(SubscriptionId, SignalCallback)>>,
    }

    impl StubSource {
        fn emit(&self, update: &NetworkUpdate) {
            for (_, callback) in self.subscribers.borrow().iter() {
                callback(update);
            }
        }
    }

    impl SignalSource for StubSource {
        fn subscribe(&self, callback: SignalCallback) -> SubscriptionId {
            let id = SubscriptionId(self.subscribers.borrow().len() as u64);
            self.subscribers.borrow_mut().push((id, callback));
            id
        }

        fn unsubscribe(&self, id: SubscriptionId) {
            self.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
        }

        fn current(&self) -> Option<NetworkUpdate> {
            self.initial.clone()
        }
    }

    #[test]
    fn test_attach_applies_current_reading() {
        let monitor = Arc::new(NetworkMonitor::new("net"));
        let source = Rc::new(StubSource {
            initial: Some(NetworkUpdate::effective("3g")),
            ..Default::default()
        });

        let _attachment = attach(monitor.clone(), source.clone());
        assert_eq!(monitor.sample().tier, ConnectionTier::Medium);
    }

    #[test]
    fn test_attach_forwards_updates_until_dropped() {
        let monitor = Arc::new(NetworkMonitor::new("net"));
        let source = Rc::new(StubSource::default());

        let attachment = attach(monitor.clone(), source.clone());
        assert_eq!(monitor.sample().tier, ConnectionTier::Unknown);

        source.emit(&NetworkUpdate::effective("2g"));
        assert_eq!(monitor.sample().tier, ConnectionTier::Slow);

        drop(attachment);
        assert!(source.subscribers.borrow().is_empty());

        source.emit(&NetworkUpdate::effective("4g"));
        assert_eq!(monitor.sample().tier, ConnectionTier::Slow);
    }
}
