use crate::utils::constants::SNIFF_SAMPLE_SIZE;
use csv::StringRecord;
use encoding_rs::{UTF_8, WINDOWS_1252};

const CANDIDATE_DELIMITERS: [u8; 4] = [b';', b',', b'\t', b'|'];
const DEFAULT_DELIMITER: u8 = b';';

/// Decode file contents as UTF-8, falling back to Windows-1252 which covers
/// the Latin-1 files DWD publishes.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text.into_owned();
    }

    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Pick the delimiter occurring most often on the first non-empty line.
pub fn sniff_delimiter(text: &str) -> u8 {
    let sample: String = text.chars().take(SNIFF_SAMPLE_SIZE).collect();
    let Some(line) = sample.lines().find(|l| !l.trim().is_empty()) else {
        return DEFAULT_DELIMITER;
    };

    CANDIDATE_DELIMITERS
        .iter()
        .map(|&d| (d, line.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(d, _)| d)
        .unwrap_or(DEFAULT_DELIMITER)
}

/// Index of the first header matching one of `aliases`, ignoring case.
pub fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(alias))
    })
}

pub fn csv_reader(text: &str, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}
