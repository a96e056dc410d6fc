//! Wire messages, written out in the shape `prost-build` emits so the crate
//! needs no protoc at build time.
//!
//! ```text
//! message HostToDeviceMessage {
//!   oneof payload {
//!     StopPeriodicSamplerMessage  stop_periodic_sampler_msg   = 1;
//!     SetPeriodicSamplerMessage   set_periodic_sampler_msg    = 2;
//!     ExecuteOneOffSamplerMessage execute_one_off_sampler_msg = 3;
//!   }
//! }
//! message DeviceToHostMessage {
//!   oneof payload {
//!     AckSetPeriodicSamplerMessage ack_set_periodic_sampler_msg = 1;
//!     OneOffSamplerDataMessage     one_off_sampler_data_msg     = 2;
//!   }
//! }
//! ```

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StopPeriodicSamplerMessage {
    #[prost(uint32, tag = "1")]
    pub stop_sampling: u32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct SetPeriodicSamplerMessage {
    /// Sampling period in microseconds.
    #[prost(uint32, tag = "1")]
    pub sampling_period: u32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ExecuteOneOffSamplerMessage {
    #[prost(uint32, tag = "1")]
    pub execute_sampling: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HostToDeviceMessage {
    #[prost(oneof = "host_to_device_message::Payload", tags = "1, 2, 3")]
    pub payload: ::core::option::Option<host_to_device_message::Payload>,
}

pub mod host_to_device_message {
    #[derive(Clone, Copy, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        StopPeriodicSamplerMsg(super::StopPeriodicSamplerMessage),
        #[prost(message, tag = "2")]
        SetPeriodicSamplerMsg(super::SetPeriodicSamplerMessage),
        #[prost(message, tag = "3")]
        ExecuteOneOffSamplerMsg(super::ExecuteOneOffSamplerMessage),
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct AckSetPeriodicSamplerMessage {
    #[prost(bool, tag = "1")]
    pub ack: bool,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct OneOffSamplerDataMessage {
    #[prost(int32, tag = "1")]
    pub sensor_val_0: i32,
    #[prost(int32, tag = "2")]
    pub sensor_val_1: i32,
    #[prost(int32, tag = "3")]
    pub sensor_val_2: i32,
    #[prost(int32, tag = "4")]
    pub sensor_val_3: i32,
    #[prost(int32, tag = "5")]
    pub sensor_val_4: i32,
    #[prost(int32, tag = "6")]
    pub sensor_val_5: i32,
    #[prost(int32, tag = "7")]
    pub sensor_val_6: i32,
    #[prost(int32, tag = "8")]
    pub sensor_val_7: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceToHostMessage {
    #[prost(oneof = "device_to_host_message::Payload", tags = "1, 2")]
    pub payload: ::core::option::Option<device_to_host_message::Payload>,
}

pub mod device_to_host_message {
    #[derive(Clone, Copy, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        AckSetPeriodicSamplerMsg(super::AckSetPeriodicSamplerMessage),
        #[prost(message, tag = "2")]
        OneOffSamplerDataMsg(super::OneOffSamplerDataMessage),
    }
}
