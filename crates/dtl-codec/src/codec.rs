use bincode::Options;
use dtl_types::{Donator, EntityKind, Project, Receiver};

use crate::error::{CodecError, CodecResult};
use crate::record::{AnyRecord, Record};

/// Leading bytes of every encoded record.
pub const MAGIC: [u8; 2] = *b"DT";

/// Current layout version. Bump when the payload field order changes.
pub const FORMAT_VERSION: u8 = 1;

/// Header size: 2 magic + 1 version + 1 kind + 4 length + 4 CRC.
pub const HEADER_SIZE: usize = 12;

/// Upper bound on a single record payload (64 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

fn payload_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_big_endian()
        .with_limit(MAX_PAYLOAD_SIZE as u64)
        .reject_trailing_bytes()
}

/// Parsed frame header.
struct Frame<'a> {
    kind: EntityKind,
    payload: &'a [u8],
}

/// Codec for stored entity records.
pub struct RecordCodec;

impl RecordCodec {
    /// Encode a record into its framed, checksummed form.
    pub fn encode<R: Record>(record: &R) -> CodecResult<Vec<u8>> {
        let payload = payload_options()
            .serialize(record)
            .map_err(|e| CodecError::Serialization(e.to_string()))?;
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(CodecError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(&MAGIC);
        buf.push(FORMAT_VERSION);
        buf.push(R::KIND.tag());
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(&crc32fast::hash(&payload).to_be_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Decode a record of type `R`, rejecting any other kind.
    pub fn decode<R: Record>(data: &[u8]) -> CodecResult<R> {
        let frame = Self::parse_frame(data)?;
        if frame.kind != R::KIND {
            return Err(CodecError::KindMismatch {
                expected: R::KIND,
                found: frame.kind,
            });
        }
        payload_options()
            .deserialize(frame.payload)
            .map_err(|e| CodecError::Deserialization(e.to_string()))
    }

    /// Decode a record whose kind is given at runtime.
    pub fn decode_as(data: &[u8], kind: EntityKind) -> CodecResult<AnyRecord> {
        match kind {
            EntityKind::Donator => Self::decode::<Donator>(data).map(AnyRecord::Donator),
            EntityKind::Receiver => Self::decode::<Receiver>(data).map(AnyRecord::Receiver),
            EntityKind::Project => Self::decode::<Project>(data).map(AnyRecord::Project),
        }
    }

    /// Decode whatever kind the header declares.
    pub fn decode_any(data: &[u8]) -> CodecResult<AnyRecord> {
        let kind = Self::peek_kind(data)?;
        Self::decode_as(data, kind)
    }

    /// Report the kind of a framed buffer after validating its header and
    /// checksum, without deserializing the payload.
    pub fn peek_kind(data: &[u8]) -> CodecResult<EntityKind> {
        Self::parse_frame(data).map(|frame| frame.kind)
    }

    fn parse_frame(data: &[u8]) -> CodecResult<Frame<'_>> {
        if data.len() < HEADER_SIZE {
            return Err(CodecError::TooShort {
                len: data.len(),
                needed: HEADER_SIZE,
            });
        }

        let magic = [data[0], data[1]];
        if magic != MAGIC {
            return Err(CodecError::BadMagic(magic));
        }
        if data[2] != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(data[2]));
        }
        let kind = EntityKind::from_tag(data[3]).ok_or(CodecError::UnknownKind(data[3]))?;

        let declared = u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize;
        let expected_crc = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
        let payload = &data[HEADER_SIZE..];
        if declared > MAX_PAYLOAD_SIZE {
            return Err(CodecError::PayloadTooLarge {
                size: declared,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        if payload.len() != declared {
            return Err(CodecError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        let computed = crc32fast::hash(payload);
        if computed != expected_crc {
            return Err(CodecError::ChecksumMismatch {
                expected: expected_crc,
                computed,
            });
        }
        Ok(Frame { kind, payload })
    }
}
