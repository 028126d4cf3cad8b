//! Inbox channel types.
//!
//! Effect handlers send their results here; the runtime drains the receiver
//! once per loop iteration and feeds the events to the reducer.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;
