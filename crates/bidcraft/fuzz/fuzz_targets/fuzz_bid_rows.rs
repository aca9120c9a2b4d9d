//! Fuzz target for reading bid rows.
//!
//! Row parsing should never panic, whatever the delimiter or content.

#![no_main]

use bidcraft::{BidDocument, BidFormat};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for format in [BidFormat::Csv, BidFormat::Tsv] {
        if let Ok(rows) = BidDocument::read_rows(data, format) {
            let mut bid = BidDocument::new("fuzz");
            for row in rows {
                bid.push(row);
            }
            let _ = bid.subtotal();
            let _ = bid.export(Vec::new(), format);
        }
    }
});
