//! MCAP-backed telemetry recorder.
//!
//! Each data stream gets its own MCAP channel:
//!
//! | Topic      | Payload type      | Encoding           |
//! |------------|-------------------|--------------------|
//! | `/torques` | [`TorqueFrame`]   | `application/json` |
//! | `/feet`    | [`FootFrame`]     | `application/json` |
//! | `/gait`    | [`GaitFrame`]     | `application/json` |

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use mcap::records::MessageHeader;
use mcap::write::Writer as McapWriter;
use serde::Serialize;
use strider_control::controller::Controller;
use strider_control::diagnostics::StepReport;
use strider_core::time::SimTime;
use tracing::{debug, error};

use crate::types::{FootFrame, GaitFrame, TorqueFrame};

// ---------------------------------------------------------------------------
// RecordError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("recording io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("mcap error: {0}")]
    Mcap(#[from] mcap::McapError),

    #[error("payload serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("recorder already finished")]
    Finished,
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct Channels {
    torques: u16,
    feet: u16,
    gait: u16,
}

/// An open MCAP file with the three Strider channels registered.
///
/// Not `Send`: `mcap::Writer` is not.
pub struct Recorder {
    writer: Option<McapWriter<BufWriter<File>>>,
    channels: Channels,
    sequence: u32,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("open", &self.writer.is_some())
            .field("channels", &self.channels)
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl Recorder {
    /// Create the file at `path`, write the MCAP header and register the
    /// JSON schema and channels.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = McapWriter::new(BufWriter::new(file))?;
        // schema data is optional for JSON
        let schema_id = writer.add_schema("json", "jsonschema", &[])?;
        let mut channel = |topic: &str| {
            writer.add_channel(schema_id, topic, "application/json", &BTreeMap::new())
        };
        let channels = Channels {
            torques: channel("/torques")?,
            feet: channel("/feet")?,
            gait: channel("/gait")?,
        };
        debug!(path = %path.display(), "recorder opened");
        Ok(Self {
            writer: Some(writer),
            channels,
            sequence: 0,
        })
    }

    /// Messages written so far.
    pub const fn messages_written(&self) -> u32 {
        self.sequence
    }

    pub const fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn write_json<T: Serialize>(
        &mut self,
        channel_id: u16,
        timestamp_ns: u64,
        frame: &T,
    ) -> Result<(), RecordError> {
        let payload = serde_json::to_vec(frame)?;
        let Some(writer) = self.writer.as_mut() else {
            return Err(RecordError::Finished);
        };
        writer.write_to_known_channel(
            &MessageHeader {
                channel_id,
                sequence: self.sequence,
                log_time: timestamp_ns,
                publish_time: timestamp_ns,
            },
            &payload,
        )?;
        self.sequence = self.sequence.wrapping_add(1);
        Ok(())
    }

    pub fn write_torques(&mut self, frame: &TorqueFrame) -> Result<(), RecordError> {
        self.write_json(self.channels.torques, frame.timestamp_ns, frame)
    }

    pub fn write_feet(&mut self, frame: &FootFrame) -> Result<(), RecordError> {
        self.write_json(self.channels.feet, frame.timestamp_ns, frame)
    }

    pub fn write_gait(&mut self, frame: &GaitFrame) -> Result<(), RecordError> {
        self.write_json(self.channels.gait, frame.timestamp_ns, frame)
    }

    /// Write all three frames for the step that just ran.
    pub fn record_step(
        &mut self,
        time: SimTime,
        controller: &Controller,
        report: &StepReport,
    ) -> Result<(), RecordError> {
        let ts = time.nanos();
        let snapshot = controller.snapshot();
        self.write_torques(&TorqueFrame::from_snapshot(
            ts,
            controller.joint_graph().names(),
            &snapshot,
        ))?;
        self.write_feet(&FootFrame::from_snapshot(ts, &snapshot))?;
        self.write_gait(&GaitFrame::from_report(ts, &snapshot, report))
    }

    /// Finalize the MCAP file. Must be called before drop for a valid file;
    /// later calls are no-ops.
    pub fn finish(&mut self) -> Result<(), RecordError> {
        if let Some(mut w) = self.writer.take() {
            w.finish()?;
            debug!(messages = self.sequence, "recorder finished");
        }
        Ok(())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            error!("strider-record: failed to finish MCAP file: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
