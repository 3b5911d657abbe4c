//! # JSON <-> Protobuf Codec
//!
//! `tonic::codec::Codec` implementation that lets tonic carry `serde_json::Value`
//! payloads for messages only known through their [`MessageDescriptor`].
//!
//! Requests are validated against the input descriptor while being converted into a
//! `DynamicMessage` (unknown fields are rejected). Responses are decoded into a
//! `DynamicMessage` and rendered using the canonical protobuf JSON mapping with
//! default values included, so a decoded message always exposes every field:
//! a `File` missing its `name` on the wire comes back as `"name": ""`, while
//! `optional` fields such as `deleted` only appear when they were set.
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, SerializeOptions};
use tonic::{
    Status,
    codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder},
};

/// Bridges `serde_json::Value` and the Protobuf wire format for one method.
pub struct JsonCodec {
    req_desc: MessageDescriptor,
    res_desc: MessageDescriptor,
}

impl JsonCodec {
    pub fn new(req_desc: MessageDescriptor, res_desc: MessageDescriptor) -> Self {
        Self { req_desc, res_desc }
    }
}

impl Codec for JsonCodec {
    type Encode = serde_json::Value;
    type Decode = serde_json::Value;

    type Encoder = JsonEncoder;
    type Decoder = JsonDecoder;

    fn encoder(&mut self) -> Self::Encoder {
        JsonEncoder(self.req_desc.clone())
    }

    fn decoder(&mut self) -> Self::Decoder {
        JsonDecoder(self.res_desc.clone())
    }
}

pub struct JsonEncoder(MessageDescriptor);

impl Encoder for JsonEncoder {
    type Item = serde_json::Value;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        let msg = json_to_message(self.0.clone(), item)?;
        msg.encode_raw(dst);
        Ok(())
    }
}

pub struct JsonDecoder(MessageDescriptor);

impl Decoder for JsonDecoder {
    type Item = serde_json::Value;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        let mut msg = DynamicMessage::new(self.0.clone());
        msg.merge(src)
            .map_err(|e| Status::internal(format!("Failed to decode Protobuf bytes: {}", e)))?;

        message_to_json(&msg).map(Some)
    }
}

/// Converts a JSON value into a message of the given type.
pub fn json_to_message(
    desc: MessageDescriptor,
    value: serde_json::Value,
) -> Result<DynamicMessage, Status> {
    let name = desc.full_name().to_string();
    DynamicMessage::deserialize(desc, value).map_err(|e| {
        Status::invalid_argument(format!(
            "JSON structure does not match the '{}' schema: {}",
            name, e
        ))
    })
}

/// Renders a message as JSON, default values included.
pub fn message_to_json(msg: &DynamicMessage) -> Result<serde_json::Value, Status> {
    let options = SerializeOptions::new().skip_default_fields(false);
    msg.serialize_with_options(serde_json::value::Serializer, &options)
        .map_err(|e| Status::internal(format!("Failed to map response to JSON: {}", e)))
}
