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

//! A network sensor fed through a channel.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use ebb_core::platform::{SignalCallback, SignalSource, SubscriptionId};
use ebb_core::telemetry::NetworkUpdate;

type Subscriber = Rc<dyn Fn(&NetworkUpdate)>;

/// A [`SignalSource`] whose readings arrive over a `flume` channel.
///
/// Producers on any thread send raw [`NetworkUpdate`]s through
/// [`sender`](Self::sender). The control thread calls [`pump`](Self::pump)
/// to hand them to subscribers, so subscribers always run on the thread that
/// owns the scheduler.
pub struct ChannelSignalSource {
    sender: flume::Sender<NetworkUpdate>,
    receiver: flume::Receiver<NetworkUpdate>,
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    latest: RefCell<Option<NetworkUpdate>>,
}

impl ChannelSignalSource {
    /// Creates a source with no reading yet.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            sender,
            receiver,
            next_id: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
            latest: RefCell::new(None),
        }
    }

    /// Creates a source whose current reading is `initial`.
    pub fn with_initial(initial: NetworkUpdate) -> Self {
        let source = Self::new();
        *source.latest.borrow_mut() = Some(initial);
        source
    }

    /// Returns a sender that producers can move to other threads.
    pub fn sender(&self) -> flume::Sender<NetworkUpdate> {
        self.sender.clone()
    }

    /// Queues an update from the control thread. It is delivered on the next pump.
    pub fn publish(&self, update: NetworkUpdate) {
        if let Err(e) = self.sender.send(update) {
            log::error!("Failed to queue network update: {e}.");
        }
    }

    /// Delivers every queued update to the subscribers and returns how many
    /// updates were delivered.
    ///
    /// Subscribers may subscribe or unsubscribe while being notified; the
    /// change applies from the next update.
    pub fn pump(&self) -> usize {
        let mut delivered = 0;
        for update in self.receiver.try_iter() {
            {
                let mut latest = self.latest.borrow_mut();
                match latest.as_mut() {
                    Some(known) => known.overlay(&update),
                    None => *latest = Some(update.clone()),
                }
            }

            let subscribers: Vec<Subscriber> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect();
            for callback in subscribers {
                callback(&update);
            }
            delivered += 1;
        }
        if delivered > 0 {
            log::trace!("Delivered {} network update(s).", delivered);
        }
        delivered
    }
}

impl Default for ChannelSignalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for ChannelSignalSource {
    fn subscribe(&self, callback: SignalCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::from(callback)));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
    }

    fn current(&self) -> Option<NetworkUpdate> {
        self.latest.borrow().clone()
    }
}

impl fmt::Debug for ChannelSignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSignalSource")
            .field("queued", &self.receiver.len())
            .field("subscribers", &self.subscribers.borrow().len())
            .field("latest", &self.latest.borrow())
            .finish()
    }
}
