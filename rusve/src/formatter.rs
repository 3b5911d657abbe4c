//! Coloured terminal rendering of responses, schema definitions and errors.
use colored::*;
use rusve_core::{
    Descriptor,
    prost_reflect::{EnumDescriptor, Kind, MessageDescriptor, MethodDescriptor, ServiceDescriptor},
    tonic::Status,
};
use std::path::PathBuf;

/// A formatted, coloured block of text.
pub struct FormattedString(pub String);

pub struct ServiceList(pub Vec<String>);

pub struct WrittenFiles(pub Vec<PathBuf>);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<Status> for FormattedString {
    fn from(status: Status) -> Self {
        FormattedString(format!(
            "{} code={:?} message={:?}",
            "gRPC Failed:".red().bold(),
            status.code(),
            status.message()
        ))
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!("{}\n\n'{:#}'", "Error:".red().bold(), err))
    }
}

impl From<ServiceList> for FormattedString {
    fn from(ServiceList(services): ServiceList) -> Self {
        if services.is_empty() {
            return FormattedString("No services found.".yellow().to_string());
        }

        let mut out = String::from("Available Services:\n");
        for svc in services {
            out.push_str(&format!("  - {}\n", svc.green()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

impl From<WrittenFiles> for FormattedString {
    fn from(WrittenFiles(paths): WrittenFiles) -> Self {
        let mut out = String::from("Schemas written:\n");
        for path in paths {
            out.push_str(&format!("  - {}\n", path.display().to_string().green()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

impl From<Descriptor> for FormattedString {
    fn from(descriptor: Descriptor) -> Self {
        match descriptor {
            Descriptor::ServiceDescriptor(d) => d.into(),
            Descriptor::MessageDescriptor(d) => d.into(),
            Descriptor::EnumDescriptor(d) => d.into(),
        }
    }
}

impl From<ServiceDescriptor> for FormattedString {
    fn from(service: ServiceDescriptor) -> Self {
        let mut out = format!("{} {} {{\n", "service".cyan(), service.name().green());

        for method in service.methods() {
            out.push_str("  ");
            out.push_str(&FormattedString::from(method).0);
            out.push('\n');
        }
        out.push('}');
        FormattedString(out)
    }
}

impl From<MethodDescriptor> for FormattedString {
    fn from(method: MethodDescriptor) -> Self {
        let stream = |on: bool| {
            if on {
                format!("{} ", "stream".cyan())
            } else {
                String::new()
            }
        };

        FormattedString(format!(
            "{} {}({}{}) {} ({}{});",
            "rpc".cyan(),
            method.name().green(),
            stream(method.is_client_streaming()),
            method.input().full_name().yellow(),
            "returns".cyan(),
            stream(method.is_server_streaming()),
            method.output().full_name().yellow()
        ))
    }
}

impl From<MessageDescriptor> for FormattedString {
    fn from(message: MessageDescriptor) -> Self {
        let mut out = format!("{} {} {{\n", "message".cyan(), message.name().green());

        for field in message.fields() {
            let label = if field.is_list() {
                format!("{} ", "repeated".cyan())
            } else if field.supports_presence() && field.containing_oneof().is_some() {
                // proto3 `optional` fields live in a synthetic oneof
                format!("{} ", "optional".cyan())
            } else {
                String::new()
            };

            out.push_str(&format!(
                "  {}{} {} = {};\n",
                label,
                kind_name(&field.kind()).yellow(),
                field.name(),
                field.number()
            ));
        }
        out.push('}');
        FormattedString(out)
    }
}

impl From<EnumDescriptor> for FormattedString {
    fn from(enum_desc: EnumDescriptor) -> Self {
        let mut out = format!("{} {} {{\n", "enum".cyan(), enum_desc.name().green());

        for val in enum_desc.values() {
            out.push_str(&format!(
                "  {} = {};\n",
                val.name(),
                val.number().to_string().purple()
            ));
        }
        out.push('}');

        FormattedString(out)
    }
}

fn kind_name(kind: &Kind) -> String {
    match kind {
        Kind::Double => "double".to_string(),
        Kind::Float => "float".to_string(),
        Kind::Int32 => "int32".to_string(),
        Kind::Int64 => "int64".to_string(),
        Kind::Uint32 => "uint32".to_string(),
        Kind::Uint64 => "uint64".to_string(),
        Kind::Sint32 => "sint32".to_string(),
        Kind::Sint64 => "sint64".to_string(),
        Kind::Fixed32 => "fixed32".to_string(),
        Kind::Fixed64 => "fixed64".to_string(),
        Kind::Sfixed32 => "sfixed32".to_string(),
        Kind::Sfixed64 => "sfixed64".to_string(),
        Kind::Bool => "bool".to_string(),
        Kind::String => "string".to_string(),
        Kind::Bytes => "bytes".to_string(),
        Kind::Message(m) => m.full_name().to_string(),
        Kind::Enum(e) => e.full_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusve_core::SchemaBundle;

    #[test]
    fn test_file_message_definition() {
        colored::control::set_override(false);
        let descriptors = SchemaBundle::embedded().parse().unwrap();
        let file = descriptors.get_descriptor_by_symbol("proto.File").unwrap();

        let out = FormattedString::from(file).0;

        assert!(out.starts_with("message File {"));
        assert!(out.contains("optional string deleted = 4;"));
        assert!(out.contains("proto.FileType type = 7;"));
        assert!(out.contains("bytes buffer = 8;"));
    }

    #[test]
    fn test_streaming_method_definition() {
        colored::control::set_override(false);
        let descriptors = SchemaBundle::embedded().parse().unwrap();
        let notes = descriptors
            .get_descriptor_by_symbol("proto.NotesService")
            .unwrap();

        let out = FormattedString::from(notes).0;

        assert!(out.contains("rpc GetNotes(proto.UserId) returns (stream proto.Note);"));
    }
}
