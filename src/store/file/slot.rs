//! Slot codec
//!
//! Byte-exact encoding of one record slot. All integers are little endian.
//!
//! ```text
//! offset  size  field
//! ------  ----  ---------------------------------------------
//!      0     2  status (i16; bit 2 = soft-deleted)
//!      2     4  id (i32)
//!      6   121  first name: length byte (120) + 120 bytes UTF-8, space padded
//!    127   121  last name:  same layout
//!    248     4  year (i32)
//!    252     4  month (i32)
//!    256     4  day (i32)
//!    260     2  height (i16)
//!    262    16  cash savings: 96-bit decimal as lo, mid, hi, flags (i32 each)
//!    278     1  favorite letter (ASCII)
//! ------
//!    279
//! ```

use bytes::{Buf, BufMut, BytesMut};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{CabinetError, Result};
use crate::record::{Record, RecordParameters};

/// Size of one slot in bytes
pub const SLOT_SIZE: usize = 279;

/// Status bit marking a slot as soft-deleted
pub const DELETED_FLAG: i16 = 1 << 2;

/// Byte width of a name's text area
pub const NAME_WIDTH: usize = 120;

/// Byte width of a name field including its length byte
const NAME_FIELD_SIZE: usize = NAME_WIDTH + 1;

/// Size of the leading status field
pub(crate) const STATUS_SIZE: usize = 2;

/// A decoded slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub status: i16,
    pub record: Record,
}

impl Slot {
    pub fn is_deleted(&self) -> bool {
        is_deleted(self.status)
    }
}

pub fn is_deleted(status: i16) -> bool {
    status & DELETED_FLAG != 0
}

/// Serialize `record` with `status` into a full slot
///
/// Fails if a name needs more than 120 bytes, the id does not fit an i32,
/// or the favorite letter is not ASCII.
pub fn encode(record: &Record, status: i16) -> Result<[u8; SLOT_SIZE]> {
    let id = i32::try_from(record.id()).map_err(|_| {
        CabinetError::Serialization(format!("Id {} does not fit the slot format", record.id()))
    })?;
    if !record.favorite_letter.is_ascii() {
        return Err(CabinetError::Serialization(format!(
            "Favorite letter {:?} is not a single-byte character",
            record.favorite_letter
        )));
    }

    let mut buf = BytesMut::with_capacity(SLOT_SIZE);
    buf.put_i16_le(status);
    buf.put_i32_le(id);
    put_name(&mut buf, &record.first_name)?;
    put_name(&mut buf, &record.last_name)?;
    buf.put_i32_le(record.date_of_birth.year());
    buf.put_i32_le(record.date_of_birth.month() as i32);
    buf.put_i32_le(record.date_of_birth.day() as i32);
    buf.put_i16_le(record.height);
    put_decimal(&mut buf, record.cash_savings);
    buf.put_u8(record.favorite_letter as u8);

    debug_assert_eq!(buf.len(), SLOT_SIZE);
    let mut slot = [0u8; SLOT_SIZE];
    slot.copy_from_slice(&buf);
    Ok(slot)
}

/// Deserialize one slot
///
/// A buffer shorter than `SLOT_SIZE` is corrupt; extra trailing bytes are
/// ignored.
pub fn decode(bytes: &[u8]) -> Result<Slot> {
    if bytes.len() < SLOT_SIZE {
        return Err(CabinetError::CorruptRecord(format!(
            "Slot is {} bytes, expected {}",
            bytes.len(),
            SLOT_SIZE
        )));
    }

    let mut buf = &bytes[..SLOT_SIZE];
    let status = buf.get_i16_le();
    let raw_id = buf.get_i32_le();
    let first_name = get_name(&mut buf)?;
    let last_name = get_name(&mut buf)?;
    let year = buf.get_i32_le();
    let month = buf.get_i32_le();
    let day = buf.get_i32_le();
    let height = buf.get_i16_le();
    let cash_savings = get_decimal(&mut buf);
    let letter = buf.get_u8();

    let id = u32::try_from(raw_id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CabinetError::CorruptRecord(format!("Invalid id {}", raw_id)))?;

    let date_of_birth = u32::try_from(month)
        .ok()
        .zip(u32::try_from(day).ok())
        .and_then(|(m, d)| NaiveDate::from_ymd_opt(year, m, d))
        .ok_or_else(|| {
            CabinetError::CorruptRecord(format!(
                "Record #{} has invalid date {}-{}-{}",
                id, year, month, day
            ))
        })?;

    if !letter.is_ascii() {
        return Err(CabinetError::CorruptRecord(format!(
            "Record #{} has non-ASCII letter byte 0x{:02x}",
            id, letter
        )));
    }

    let params = RecordParameters::new(
        first_name,
        last_name,
        date_of_birth,
        height,
        cash_savings,
        letter as char,
    );
    Ok(Slot {
        status,
        record: Record::new(id, &params),
    })
}

/// Read only the status field from the front of a slot
pub fn decode_status(bytes: &[u8]) -> Result<i16> {
    if bytes.len() < STATUS_SIZE {
        return Err(CabinetError::CorruptRecord("Truncated status field".to_string()));
    }
    Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
}

fn put_name(buf: &mut BytesMut, name: &str) -> Result<()> {
    let text = name.as_bytes();
    if text.len() > NAME_WIDTH {
        return Err(CabinetError::Serialization(format!(
            "Name '{}' needs {} bytes, the slot holds {}",
            name,
            text.len(),
            NAME_WIDTH
        )));
    }
    buf.put_u8(NAME_WIDTH as u8);
    buf.put_slice(text);
    buf.put_bytes(b' ', NAME_WIDTH - text.len());
    Ok(())
}

fn get_name(buf: &mut &[u8]) -> Result<String> {
    // Length byte is fixed by the format; the text area is always full width
    let _len = buf.get_u8();
    let mut text = [0u8; NAME_WIDTH];
    buf.copy_to_slice(&mut text);
    let name = std::str::from_utf8(&text)
        .map_err(|e| CabinetError::CorruptRecord(format!("Name is not UTF-8: {}", e)))?;
    Ok(name.trim_end_matches(' ').to_string())
}

fn put_decimal(buf: &mut BytesMut, value: Decimal) {
    // rust_decimal serializes as flags, lo, mid, hi
    let raw = value.serialize();
    buf.put_slice(&raw[4..8]);
    buf.put_slice(&raw[8..12]);
    buf.put_slice(&raw[12..16]);
    buf.put_slice(&raw[0..4]);
}

fn get_decimal(buf: &mut &[u8]) -> Decimal {
    let mut slot_order = [0u8; 16];
    buf.copy_to_slice(&mut slot_order);

    let mut raw = [0u8; 16];
    raw[0..4].copy_from_slice(&slot_order[12..16]);
    raw[4..16].copy_from_slice(&slot_order[0..12]);
    Decimal::deserialize(raw)
}
