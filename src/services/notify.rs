use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use crate::models::Notification;

/// Downstream consumer of decision and match events
///
/// Fire-and-forget: implementations must return without waiting on the consumer.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications over an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::trace!("Notification dropped, receiver closed");
        }
    }
}

/// Logs notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Decision(event) => {
                tracing::info!("Decision {} on {}", event.decision, event.candidate_id);
            }
            Notification::Match(matched) => {
                tracing::info!("Matched with {} ({})", matched.name, matched.candidate_id);
            }
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Decision, DecisionEvent};

    fn decision_event(id: &str) -> Notification {
        Notification::Decision(DecisionEvent {
            candidate_id: id.to_string(),
            decision: Decision::Maybe,
            decided_at: chrono::Utc::now(),
        })
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut receiver) = ChannelSink::channel();
        sink.notify(decision_event("a"));
        sink.notify(decision_event("b"));

        let ids: Vec<_> = std::iter::from_fn(|| receiver.try_recv().ok())
            .map(|n| match n {
                Notification::Decision(event) => event.candidate_id,
                Notification::Match(m) => m.candidate_id,
            })
            .collect();

        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, receiver) = ChannelSink::channel();
        drop(receiver);
        sink.notify(decision_event("a"));
    }

    #[test]
    fn test_notification_json_shape() {
        let json = serde_json::to_value(decision_event("a")).unwrap();
        assert_eq!(json["type"], "decision");
        assert_eq!(json["candidateId"], "a");
        assert_eq!(json["decision"], "maybe");
    }
}
