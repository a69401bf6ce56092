//! Council event stream
//!
//! Stage-by-stage events emitted while a message is processed. The event
//! shapes match the server-sent event protocol: each event is one JSON
//! object tagged by `type`.

use council_domain::{
    AggregateEntry, CouncilMode, LabelToModel, StageOneResult, StageThreeResult, StageTwoResult,
};
use serde::Serialize;
use tokio::sync::mpsc;

/// Metadata attached to `stage2_complete`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTwoMetadata {
    pub label_to_model: LabelToModel,
    pub aggregate_rankings: Vec<AggregateEntry>,
    pub mode: CouncilMode,
}

/// Payload of `title_complete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlePayload {
    pub title: String,
}

/// One event in the processing stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CouncilEvent {
    #[serde(rename = "stage1_start")]
    Stage1Start { mode: CouncilMode },
    #[serde(rename = "stage1_complete")]
    Stage1Complete { data: Vec<StageOneResult> },
    #[serde(rename = "stage2_start")]
    Stage2Start,
    #[serde(rename = "stage2_complete")]
    Stage2Complete {
        data: Vec<StageTwoResult>,
        metadata: StageTwoMetadata,
    },
    #[serde(rename = "stage3_start")]
    Stage3Start,
    #[serde(rename = "stage3_complete")]
    Stage3Complete { data: StageThreeResult },
    TitleComplete { data: TitlePayload },
    Complete,
    Error { message: String },
}

impl CouncilEvent {
    /// Wire name of the event
    pub fn kind(&self) -> &'static str {
        match self {
            CouncilEvent::Stage1Start { .. } => "stage1_start",
            CouncilEvent::Stage1Complete { .. } => "stage1_complete",
            CouncilEvent::Stage2Start => "stage2_start",
            CouncilEvent::Stage2Complete { .. } => "stage2_complete",
            CouncilEvent::Stage3Start => "stage3_start",
            CouncilEvent::Stage3Complete { .. } => "stage3_complete",
            CouncilEvent::TitleComplete { .. } => "title_complete",
            CouncilEvent::Complete => "complete",
            CouncilEvent::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CouncilEvent::Complete | CouncilEvent::Error { .. })
    }
}

/// Receiver of council events
pub trait CouncilEventSink: Send + Sync {
    fn emit(&self, event: CouncilEvent);
}

/// Sink that drops every event
pub struct NoEvents;

impl CouncilEventSink for NoEvents {
    fn emit(&self, _event: CouncilEvent) {}
}

/// Sink forwarding events into an unbounded channel
///
/// Events emitted after the receiver is dropped are discarded.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<CouncilEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::UnboundedSender<CouncilEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CouncilEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl CouncilEventSink for ChannelEventSink {
    fn emit(&self, event: CouncilEvent) {
        let _ = self.tx.send(event);
    }
}
