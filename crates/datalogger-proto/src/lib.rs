//! Protobuf message contract for the data logger link.
//!
//! Message-mode payloads are protobuf. The host sends a
//! [`HostToDeviceMessage`] with exactly one command set; the device answers
//! with a [`DeviceToHostMessage`]. [`ProtobufSchema`] plugs these into the
//! framing crate's serializer and deserializer seams.

pub mod error;
pub mod messages;
pub mod schema;

pub use error::{ProtoError, Result};
pub use messages::{
    device_to_host_message, host_to_device_message, AckSetPeriodicSamplerMessage,
    DeviceToHostMessage, ExecuteOneOffSamplerMessage, HostToDeviceMessage,
    OneOffSamplerDataMessage, SetPeriodicSamplerMessage, StopPeriodicSamplerMessage,
};
pub use schema::{
    decode_host_command, encode_device_message, DeviceMessage, OneOffSample, ProtobufSchema,
};
