//! Human-readable serial and batch codes, and opaque record ids
//!
//! Serial codes are derived from the length of the target collection at the
//! time of creation: the Nth record of a collection receives `PREFIX-N`,
//! zero-padded to three digits. Batch codes follow the same format but are
//! counted per plan serial number.

use uuid::Uuid;

/// Code prefixes per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialPrefix {
    Material,
    CompositionPlan,
    FuelConsumption,
    Batch,
}

impl SerialPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            SerialPrefix::Material => "ML",
            SerialPrefix::CompositionPlan => "CP",
            SerialPrefix::FuelConsumption => "FC",
            SerialPrefix::Batch => "BHC",
        }
    }

    pub fn parse(prefix: &str) -> Option<Self> {
        match prefix {
            "ML" => Some(SerialPrefix::Material),
            "CP" => Some(SerialPrefix::CompositionPlan),
            "FC" => Some(SerialPrefix::FuelConsumption),
            "BHC" => Some(SerialPrefix::Batch),
            _ => None,
        }
    }
}

/// Format `PREFIX-NNN`
pub fn format_code(prefix: SerialPrefix, sequence: usize) -> String {
    format!("{}-{:03}", prefix.as_str(), sequence)
}

/// Next serial code for a collection that currently holds `existing_len` records
pub fn next_serial_code(prefix: SerialPrefix, existing_len: usize) -> String {
    format_code(prefix, existing_len + 1)
}

/// Next batch code for `serial_no`, given the serial numbers of all existing
/// surge-bunker processes
pub fn next_batch_code<'a, I>(existing_serials: I, serial_no: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let count = existing_serials
        .into_iter()
        .filter(|existing| *existing == serial_no)
        .count();
    format_code(SerialPrefix::Batch, count + 1)
}

/// Opaque, time-ordered record id
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}
