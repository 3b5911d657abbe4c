//! Soft-delete helpers for the `File` attachment message.
//!
//! `deleted` is a proto3 `optional` field: its presence is the tombstone. A
//! decoded `File` without it is live, and every other field falls back to its
//! proto3 default when missing on the wire (empty strings, empty buffer,
//! `FileType::Document`).
use crate::pb::File;

impl File {
    /// Whether the file carries a deletion timestamp.
    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    /// Sets the deletion timestamp, overwriting a previous one.
    pub fn mark_deleted(&mut self, at: impl Into<String>) {
        self.deleted = Some(at.into());
    }
}

#[cfg(test)]
mod tests {
    use crate::pb::{File, FileType};
    use prost::Message;

    fn sample() -> File {
        let mut file = File {
            id: "0b6f1a7e-4a53-4d2c-9b1e-6e4e0f7c9a11".to_string(),
            created: "2024-02-01 10:00:00.0 +00:00:00".to_string(),
            updated: "2024-02-02 11:30:00.0 +00:00:00".to_string(),
            deleted: Some("2024-02-03 08:15:00.0 +00:00:00".to_string()),
            target_id: "d1c3e2a0-1111-4c4c-8888-0a0b0c0d0e0f".to_string(),
            name: "avatar.png".to_string(),
            r#type: 0,
            buffer: vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10],
        };
        file.set_type(FileType::Avatar);
        file
    }

    #[test]
    fn test_round_trip_keeps_every_field() {
        let file = sample();
        let bytes = file.encode_to_vec();

        let decoded = File::decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded, file);
        assert_eq!(decoded.buffer, vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10]);
        assert_eq!(decoded.r#type(), FileType::Avatar);
        assert!(decoded.is_deleted());
    }

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let partial = File {
            id: "only-id".to_string(),
            ..Default::default()
        };
        let bytes = partial.encode_to_vec();

        let decoded = File::decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded.id, "only-id");
        assert_eq!(decoded.name, "");
        assert_eq!(decoded.target_id, "");
        assert!(decoded.buffer.is_empty());
        assert_eq!(decoded.r#type(), FileType::Document);
        assert_eq!(decoded.deleted, None);
        assert!(!decoded.is_deleted());
    }

    #[test]
    fn test_unknown_file_type_reads_as_default() {
        let file = File {
            r#type: 42,
            ..Default::default()
        };
        let decoded = File::decode(file.encode_to_vec().as_slice()).unwrap();

        assert_eq!(decoded.r#type, 42);
        assert_eq!(decoded.r#type(), FileType::Document);
    }

    #[test]
    fn test_mark_deleted() {
        let mut file = File::default();
        assert!(!file.is_deleted());

        file.mark_deleted("2024-03-01 00:00:00.0 +00:00:00");

        assert!(file.is_deleted());
        assert_eq!(file.deleted(), "2024-03-01 00:00:00.0 +00:00:00");
    }
}
