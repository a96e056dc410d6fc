use datalogger_frame::{Command, CommandSerializer, MessageDeserializer, CHANNEL_COUNT};
use prost::Message;
use serde::Serialize;
use tracing::trace;

use crate::error::{ProtoError, Result};
use crate::messages::{
    device_to_host_message, host_to_device_message, AckSetPeriodicSamplerMessage,
    DeviceToHostMessage, ExecuteOneOffSamplerMessage, HostToDeviceMessage,
    OneOffSamplerDataMessage, SetPeriodicSamplerMessage, StopPeriodicSamplerMessage,
};

/// One reading per sensor channel, as returned by a one-off sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OneOffSample {
    pub sensor_values: [i32; CHANNEL_COUNT],
}

impl From<OneOffSamplerDataMessage> for OneOffSample {
    fn from(msg: OneOffSamplerDataMessage) -> Self {
        Self {
            sensor_values: [
                msg.sensor_val_0,
                msg.sensor_val_1,
                msg.sensor_val_2,
                msg.sensor_val_3,
                msg.sensor_val_4,
                msg.sensor_val_5,
                msg.sensor_val_6,
                msg.sensor_val_7,
            ],
        }
    }
}

impl From<OneOffSample> for OneOffSamplerDataMessage {
    fn from(sample: OneOffSample) -> Self {
        let [v0, v1, v2, v3, v4, v5, v6, v7] = sample.sensor_values;
        Self {
            sensor_val_0: v0,
            sensor_val_1: v1,
            sensor_val_2: v2,
            sensor_val_3: v3,
            sensor_val_4: v4,
            sensor_val_5: v5,
            sensor_val_6: v6,
            sensor_val_7: v7,
        }
    }
}

/// A decoded device-to-host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceMessage {
    /// Reply to a set-periodic-sampling command. A positive ack means sample
    /// frames follow immediately.
    SetPeriodicSamplerAck { ack: bool },
    /// Reply to an execute-one-off-sampling command.
    OneOffSample(OneOffSample),
}

impl From<DeviceMessage> for DeviceToHostMessage {
    fn from(message: DeviceMessage) -> Self {
        let payload = match message {
            DeviceMessage::SetPeriodicSamplerAck { ack } => {
                device_to_host_message::Payload::AckSetPeriodicSamplerMsg(
                    AckSetPeriodicSamplerMessage { ack },
                )
            }
            DeviceMessage::OneOffSample(sample) => {
                device_to_host_message::Payload::OneOffSamplerDataMsg(sample.into())
            }
        };
        Self {
            payload: Some(payload),
        }
    }
}

impl TryFrom<DeviceToHostMessage> for DeviceMessage {
    type Error = ProtoError;

    fn try_from(msg: DeviceToHostMessage) -> Result<Self> {
        match msg.payload {
            Some(device_to_host_message::Payload::AckSetPeriodicSamplerMsg(ack)) => {
                Ok(Self::SetPeriodicSamplerAck { ack: ack.ack })
            }
            Some(device_to_host_message::Payload::OneOffSamplerDataMsg(data)) => {
                Ok(Self::OneOffSample(data.into()))
            }
            None => Err(ProtoError::MissingPayload("DeviceToHostMessage")),
        }
    }
}

/// Protobuf payload schema for the data logger firmware.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufSchema;

impl ProtobufSchema {
    pub fn new() -> Self {
        Self
    }

    /// Build the protobuf message for a command.
    pub fn host_message(command: &Command) -> HostToDeviceMessage {
        let payload = match *command {
            Command::StopPeriodicSampling => {
                host_to_device_message::Payload::StopPeriodicSamplerMsg(
                    StopPeriodicSamplerMessage { stop_sampling: 1 },
                )
            }
            Command::SetPeriodicSampling { period_micros } => {
                host_to_device_message::Payload::SetPeriodicSamplerMsg(SetPeriodicSamplerMessage {
                    sampling_period: period_micros,
                })
            }
            Command::ExecuteOneOffSampling => {
                host_to_device_message::Payload::ExecuteOneOffSamplerMsg(
                    ExecuteOneOffSamplerMessage {
                        execute_sampling: 1,
                    },
                )
            }
        };
        HostToDeviceMessage {
            payload: Some(payload),
        }
    }
}

impl CommandSerializer for ProtobufSchema {
    fn serialize_command(&self, command: &Command) -> Vec<u8> {
        let bytes = Self::host_message(command).encode_to_vec();
        trace!(command = command.name(), bytes = bytes.len(), "serialized command");
        bytes
    }
}

impl MessageDeserializer for ProtobufSchema {
    type Message = DeviceMessage;
    type Error = ProtoError;

    fn deserialize(&self, payload: &[u8]) -> Result<DeviceMessage> {
        let msg = DeviceToHostMessage::decode(payload)?;
        DeviceMessage::try_from(msg)
    }
}

/// Serialize a device reply, for simulators standing in for the firmware.
pub fn encode_device_message(message: &DeviceMessage) -> Vec<u8> {
    DeviceToHostMessage::from(*message).encode_to_vec()
}

/// Decode a host command payload the way the firmware does.
pub fn decode_host_command(payload: &[u8]) -> Result<Command> {
    let msg = HostToDeviceMessage::decode(payload)?;
    match msg.payload {
        Some(host_to_device_message::Payload::StopPeriodicSamplerMsg(_)) => {
            Ok(Command::StopPeriodicSampling)
        }
        Some(host_to_device_message::Payload::SetPeriodicSamplerMsg(set)) => {
            Ok(Command::SetPeriodicSampling {
                period_micros: set.sampling_period,
            })
        }
        Some(host_to_device_message::Payload::ExecuteOneOffSamplerMsg(_)) => {
            Ok(Command::ExecuteOneOffSampling)
        }
        None => Err(ProtoError::MissingPayload("HostToDeviceMessage")),
    }
}
