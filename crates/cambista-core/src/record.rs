//! # Operation Records
//!
//! The persisted form of one BRL purchase.
//!
//! ## Record Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ClientIdentity ──┐                                                     │
//! │  MarketInputs ────┤                                                     │
//! │  QuoteResult ─────┼──► assemble() ──► OperationRecord ──► JSON file     │
//! │  TicketCode ──────┤     to_storage() on                                 │
//! │  timestamp ───────┘     every number                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names are English in Rust and keep the historical Spanish keys on
//! the wire (`codigo`, `fecha`, `importe_brl`, ...), in a fixed order.

use std::io;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::error::{CoreResult, ValidationError};
use crate::format::{to_storage, Canonical};
use crate::quote::{MarketInputs, QuoteResult};
use crate::ticket::TicketCode;
use crate::{CURRENCY_TAG, OPERATION_TAG};

/// Longest accepted client name.
pub const MAX_NAME_LEN: usize = 100;

// =============================================================================
// Client Identity
// =============================================================================

/// Who the operation is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub code: i64,
    pub last_name: String,
    pub first_name: String,
}

impl ClientIdentity {
    /// Creates a validated identity; names are capitalized (`pérez` → `Pérez`).
    ///
    /// ## Rules
    /// - Names must not be empty after trimming
    /// - Names are at most [`MAX_NAME_LEN`] characters
    /// - Names must not contain path separators (they end up in file names)
    pub fn new(code: i64, last_name: &str, first_name: &str) -> CoreResult<Self> {
        Ok(ClientIdentity {
            code,
            last_name: normalize_name("last_name", last_name)?,
            first_name: normalize_name("first_name", first_name)?,
        })
    }
}

fn normalize_name(field: &str, raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    if name.chars().any(|c| matches!(c, '/' | '\\') || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain path separators or control characters".to_string(),
        });
    }

    Ok(capitalize(name))
}

/// First character upper case, the rest lower case.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// =============================================================================
// Operation Record
// =============================================================================

/// One persisted purchase. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    #[serde(rename = "codigo")]
    pub client_code: i64,

    #[serde(rename = "fecha", with = "timestamp_format")]
    pub created_at: NaiveDateTime,

    #[serde(rename = "apellido_cliente")]
    pub last_name: String,

    #[serde(rename = "nombre_cliente")]
    pub first_name: String,

    #[serde(rename = "tipo_moneda")]
    pub currency: String,

    #[serde(rename = "cotizacion_brl_usd")]
    pub brl_usd_rate: Canonical,

    #[serde(rename = "cotizacion_usd_ars")]
    pub usd_ars_rate: Canonical,

    #[serde(rename = "cotizacion_brl_ars")]
    pub effective_brl_ars_rate: Canonical,

    #[serde(rename = "importe_brl")]
    pub brl_amount: Canonical,

    #[serde(rename = "importe_usd")]
    pub usd_amount: Canonical,

    #[serde(rename = "total_ars")]
    pub total_ars: Canonical,

    #[serde(rename = "ganancia_por_brl")]
    pub profit_per_usd_in_brl: Canonical,

    #[serde(rename = "ganancia_por_usd")]
    pub profit_per_usd_in_ars: Canonical,

    #[serde(rename = "ganancia_brl_total")]
    pub total_brl_profit: Canonical,

    #[serde(rename = "ganancia_ars_por_usd")]
    pub ars_profit_from_usd_leg: Canonical,

    #[serde(rename = "ganancia_ars_por_brl")]
    pub ars_profit_from_brl_leg: Canonical,

    #[serde(rename = "ganancia_total_ars")]
    pub total_ars_profit: Canonical,

    #[serde(rename = "operacion")]
    pub operation: String,

    pub ticket: String,
}

impl OperationRecord {
    /// Composes a record; every number goes through [`to_storage`].
    pub fn assemble(
        client: &ClientIdentity,
        inputs: &MarketInputs,
        quote: &QuoteResult,
        ticket: &TicketCode,
        created_at: NaiveDateTime,
    ) -> Self {
        OperationRecord {
            client_code: client.code,
            created_at,
            last_name: client.last_name.clone(),
            first_name: client.first_name.clone(),
            currency: CURRENCY_TAG.to_string(),
            brl_usd_rate: to_storage(inputs.brl_usd_rate),
            usd_ars_rate: to_storage(inputs.usd_ars_rate),
            effective_brl_ars_rate: to_storage(quote.effective_brl_ars_rate),
            brl_amount: to_storage(inputs.brl_amount),
            usd_amount: to_storage(quote.usd_amount),
            total_ars: to_storage(quote.total_ars),
            profit_per_usd_in_brl: to_storage(inputs.profit_per_usd_in_brl),
            profit_per_usd_in_ars: to_storage(inputs.profit_per_usd_in_ars),
            total_brl_profit: to_storage(quote.total_brl_profit),
            ars_profit_from_usd_leg: to_storage(quote.ars_profit_from_usd_leg),
            ars_profit_from_brl_leg: to_storage(quote.ars_profit_from_brl_leg),
            total_ars_profit: to_storage(quote.total_ars_profit),
            operation: OPERATION_TAG.to_string(),
            ticket: ticket.to_string(),
        }
    }

    /// File name for this record.
    ///
    /// `2024-05-03_14-22-09_PEREZ_JUAN_COMPRA_1000BRL.json`; the BRL amount
    /// is the stored amount truncated to an integer.
    pub fn file_name(&self) -> String {
        compose_file_name(
            self.created_at,
            &self.last_name,
            &self.first_name,
            &self.operation,
            &self.brl_amount,
            &self.currency,
        )
    }

    /// File name the record for `client` and `inputs` will get, known
    /// before a ticket is issued.
    pub fn file_name_for(
        client: &ClientIdentity,
        inputs: &MarketInputs,
        created_at: NaiveDateTime,
    ) -> String {
        compose_file_name(
            created_at,
            &client.last_name,
            &client.first_name,
            OPERATION_TAG,
            &to_storage(inputs.brl_amount),
            CURRENCY_TAG,
        )
    }

    /// Pretty JSON with four-space indentation.
    ///
    /// Non-ASCII characters are written as `\uXXXX` escapes, so `Pérez`
    /// is stored as `P\u00e9rez` and the file is plain ASCII.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut out = Vec::new();
        let formatter = AsciiFormatter(PrettyFormatter::with_indent(b"    "));
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // every byte is ASCII at this point
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn compose_file_name(
    created_at: NaiveDateTime,
    last_name: &str,
    first_name: &str,
    operation: &str,
    brl_amount: &Canonical,
    currency: &str,
) -> String {
    format!(
        "{}_{}_{}_{}_{}{}.json",
        created_at.format("%Y-%m-%d_%H-%M-%S"),
        last_name.to_uppercase(),
        first_name.to_uppercase(),
        operation,
        brl_amount.as_f64().trunc() as i64,
        currency,
    )
}

// =============================================================================
// ASCII JSON
// =============================================================================

/// [`PrettyFormatter`] that escapes every non-ASCII character.
///
/// Characters outside the BMP become a UTF-16 surrogate pair.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// `fecha` is stored as `YYYY-MM-DD HH:MM:SS` in local time.
mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::compute;
    use crate::ticket::TicketCounter;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_opt(14, 22, 9)
            .unwrap()
    }

    fn sample_record() -> OperationRecord {
        let client = ClientIdentity::new(42, "pérez", "JUAN").unwrap();
        let inputs = MarketInputs::new(5.0, 1000.0, 1000.0, 0.02, 5.0);
        let quote = compute(&inputs).unwrap();
        let ticket = TicketCode::new("TC", TicketCounter::new(1, 1).unwrap());
        OperationRecord::assemble(&client, &inputs, &quote, &ticket, timestamp())
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pérez"), "Pérez");
        assert_eq!(capitalize("JUAN CARLOS"), "Juan carlos");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_identity_validation() {
        assert!(ClientIdentity::new(1, "  ", "Ana").is_err());
        assert!(ClientIdentity::new(1, "Gómez", "").is_err());
        assert!(ClientIdentity::new(1, "../etc", "Ana").is_err());
        assert!(ClientIdentity::new(1, &"x".repeat(101), "Ana").is_err());

        let client = ClientIdentity::new(7, " gómez ", "ana").unwrap();
        assert_eq!(client.last_name, "Gómez");
        assert_eq!(client.first_name, "Ana");
    }

    #[test]
    fn test_assemble_applies_storage_format() {
        let record = sample_record();

        assert_eq!(record.usd_amount, Canonical::Integer(200));
        assert_eq!(record.total_ars, Canonical::Integer(200_000));
        assert_eq!(record.profit_per_usd_in_brl, Canonical::Decimal(0.02));
        assert_eq!(record.total_ars_profit, Canonical::Integer(1800));
        assert_eq!(record.ticket, "TC010001");
        assert_eq!(record.currency, "BRL");
        assert_eq!(record.operation, "COMPRA");
    }

    #[test]
    fn test_file_name() {
        let record = sample_record();
        assert_eq!(
            record.file_name(),
            "2024-05-03_14-22-09_PÉREZ_JUAN_COMPRA_1000BRL.json"
        );
    }

    #[test]
    fn test_file_name_truncates_amount() {
        let mut record = sample_record();
        record.brl_amount = Canonical::Decimal(1500.75);
        assert!(record.file_name().ends_with("_COMPRA_1500BRL.json"));
    }

    #[test]
    fn test_json_keys_and_order() {
        let json = sample_record().to_pretty_json().unwrap();

        let keys = [
            "codigo",
            "fecha",
            "apellido_cliente",
            "nombre_cliente",
            "tipo_moneda",
            "cotizacion_brl_usd",
            "cotizacion_usd_ars",
            "cotizacion_brl_ars",
            "importe_brl",
            "importe_usd",
            "total_ars",
            "ganancia_por_brl",
            "ganancia_por_usd",
            "ganancia_brl_total",
            "ganancia_ars_por_usd",
            "ganancia_ars_por_brl",
            "ganancia_total_ars",
            "operacion",
            "ticket",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|key| json.find(&format!("\"{}\":", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(json.contains("    \"codigo\": 42,"));
        assert!(json.contains("\"fecha\": \"2024-05-03 14:22:09\""));
        assert!(json.contains("\"importe_usd\": 200,"));
        assert!(json.contains("\"ganancia_por_brl\": 0.02,"));
    }

    #[test]
    fn test_file_name_before_ticket_matches_record() {
        let client = ClientIdentity::new(42, "pérez", "JUAN").unwrap();
        let inputs = MarketInputs::new(5.0, 1000.0, 1000.0, 0.02, 5.0);

        assert_eq!(
            OperationRecord::file_name_for(&client, &inputs, timestamp()),
            sample_record().file_name()
        );
    }

    #[test]
    fn test_json_escapes_non_ascii() {
        let json = sample_record().to_pretty_json().unwrap();

        assert!(json.is_ascii());
        assert!(json.contains("\"apellido_cliente\": \"P\\u00e9rez\","));
    }

    #[test]
    fn test_json_escapes_astral_as_surrogate_pair() {
        let mut record = sample_record();
        record.first_name = "Ana 😀".to_string();

        let json = record.to_pretty_json().unwrap();

        assert!(json.contains("\"nombre_cliente\": \"Ana \\ud83d\\ude00\","));
        let parsed: OperationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.first_name, "Ana 😀");
    }

    #[test]
    fn test_json_round_trip_keeps_timestamp() {
        let record = sample_record();
        let parsed: OperationRecord =
            serde_json::from_str(&record.to_pretty_json().unwrap()).unwrap();
        assert_eq!(parsed, record);
    }
}
