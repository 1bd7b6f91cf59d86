//! Regex patterns for invoice and receipt text.
//!
//! Each pattern targets one layout; unrelated layouts are never combined into
//! one expression.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Item table boundaries

    /// Column header row: `QUANTITY  DESCRIPTION  UNIT PRICE  TOTAL`, columns
    /// separated by any whitespace including line breaks.
    pub static ref TABLE_HEADER: Regex = Regex::new(
        r"(?i)QUANTITY\s+DESCRIPTION\s+UNIT\s*PRICE\s+TOTAL"
    ).unwrap();

    /// First `SUBTOTAL` / `SUB TOTAL` marker after the item rows.
    pub static ref TABLE_END: Regex = Regex::new(
        r"(?i)SUB\s*TOTAL"
    ).unwrap();

    // Line shapes inside the table region (lines are already trimmed)

    /// `5 Widget Assembly ...` - quantity, whitespace, remaining text.
    pub static ref ITEM_START: Regex = Regex::new(
        r"^(\d+)\s+(.+)$"
    ).unwrap();

    /// `WID-2024-A ...` - line opening with three or more capitals.
    pub static ref PRODUCT_CODE_LINE: Regex = Regex::new(
        r"^[A-Z]{3,}"
    ).unwrap();

    /// Leading code token of a product code line.
    pub static ref LEADING_CODE: Regex = Regex::new(
        r"^([A-Z0-9\-]+)"
    ).unwrap();

    /// `... 10.00 50.00` - unit price and total closing a line.
    pub static ref TRAILING_PRICE_PAIR: Regex = Regex::new(
        r"(\d+\.?\d*)\s+(\d+\.?\d*)$"
    ).unwrap();

    /// `10.00 50.00` - a line holding nothing but unit price and total.
    pub static ref PRICE_ONLY_LINE: Regex = Regex::new(
        r"^(\d+\.?\d*)\s+(\d+\.?\d*)$"
    ).unwrap();

    // Whole-text item templates (multi-line mode, horizontal whitespace only
    // unless a line break is part of the layout)

    /// `5  Widget Assembly  10.00  50.00` on one line.
    pub static ref ITEM_SINGLE_LINE: Regex = Regex::new(
        r"(?m)^[ \t]*(\d+)[ \t]+([A-Za-z].*?)[ \t]+(\d+\.\d{2})[ \t]+(\d+\.\d{2})[ \t]*$"
    ).unwrap();

    /// `5  Widget Assembly` followed by `WID-2024-A ... 10.00  50.00`.
    pub static ref ITEM_WITH_CODE_LINE: Regex = Regex::new(
        r"(?m)^[ \t]*(\d+)[ \t]+([A-Za-z][^\n]*)\n[ \t]*([A-Z]{3,}[A-Z0-9\-]+)(?:[ \t]+[^\n]*?)?[ \t]+(\d+\.\d{2})[ \t]+(\d+\.\d{2})"
    ).unwrap();

    /// `5  Widget Assembly (WID-2024-A)  10.00  50.00`.
    pub static ref ITEM_PAREN_CODE: Regex = Regex::new(
        r"(?m)^[ \t]*(\d+)[ \t]+(.+?)[ \t]*\(([A-Z0-9\-]+)\)[ \t]+(\d+\.\d{2})[ \t]+(\d+\.\d{2})[ \t]*$"
    ).unwrap();

    /// Product code embedded in a description: `Cable HDMI2M-BLK 2m`.
    pub static ref EMBEDDED_CODE: Regex = Regex::new(
        r"([A-Z]{3,}[A-Z0-9\-]+)"
    ).unwrap();

    // Header fields, layout specific

    /// `INVOICE # 10045`.
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)INVOICE\s*#\s*([A-Z0-9\-]+)"
    ).unwrap();

    /// `P.O. NUMBER 7781-A`.
    pub static ref PO_NUMBER: Regex = Regex::new(
        r"(?i)P\.O\.\s*NUMBER\s*([A-Z0-9\-]+)"
    ).unwrap();

    /// `DATE: 01.15.2024`.
    pub static ref DOCUMENT_DATE: Regex = Regex::new(
        r"(?i)DATE:\s*(\d[0-9./\-]*)"
    ).unwrap();

    /// `SALESPERSON` label with the name on the following line.
    pub static ref SALESPERSON: Regex = Regex::new(
        r"(?i)SALESPERSON[ \t]*\r?\n\s*([^\n]+)"
    ).unwrap();

    // Header fields, generic labels

    /// `Due Date: 2024-02-15` / `Payment due 15 Feb 2024`.
    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)(?:due\s*date|payment\s*due)[ \t]*:?[ \t]*([0-9A-Za-z][0-9A-Za-z/\-., ]*)"
    ).unwrap();

    /// `Terms: Net 30`.
    pub static ref PAYMENT_TERMS: Regex = Regex::new(
        r"(?i)\b(?:payment\s*terms|terms)[ \t]*:[ \t]*([^\n]+)"
    ).unwrap();

    /// `Tax ID: 12-3456789` / `VAT GB123456789`.
    pub static ref TAX_ID: Regex = Regex::new(
        r"(?i)\b(?:tax\s*id|vat|gst|ein)\b[ \t]*(?:no\.?|number|#)?[ \t]*:?[ \t]*([A-Z0-9\-]*\d[A-Z0-9\-]*)"
    ).unwrap();

    /// `Account #: 000-123-456`.
    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:account|acct)[ \t]*(?:no\.?|number|#)?[ \t]*:?[ \t]*(\d[0-9\-]*)"
    ).unwrap();

    // Totals (`1,234.56` with optional `$`)

    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)SUB\s*TOTAL[\s:]+\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref SALES_TAX: Regex = Regex::new(
        r"(?i)(?:SALES\s*)?TAX[\s:]+\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref SHIPPING_HANDLING: Regex = Regex::new(
        r"(?i)SHIPPING\s*&?\s*HANDLING[\s:]+\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref TOTAL_DUE: Regex = Regex::new(
        r"(?i)TOTAL\s*DUE[\s:]+\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    // Contact details

    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    /// `(555) 123-4567`, `555.123.4567`, `+1 555 123 4567`.
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+\d{1,3}[ .\-]?)?\(?\b\d{3}\)?[ .\-]\d{3}[ .\-]\d{4}\b"
    ).unwrap();

    pub static ref URL: Regex = Regex::new(
        r#"https?://[^\s<>"{}|\\^`\[\]]+"#
    ).unwrap();
}
