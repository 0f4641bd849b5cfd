use crate::elements::ElementSetRecord;

/// Parse multi-satellite three-line element text.
///
/// Blank lines are ignored and every remaining group of three lines becomes
/// a record. A trailing group shorter than three lines is dropped. Content is
/// not validated here; bad element lines fail later, during propagation.
pub fn parse_records(text: &str) -> Vec<ElementSetRecord> {
    let lines: Vec<&str> = text
        .split(['\n', '\r'])
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .chunks_exact(3)
        .enumerate()
        .map(|(index, chunk)| ElementSetRecord {
            name: chunk[0].to_string(),
            line1: chunk[1].to_string(),
            line2: chunk[2].to_string(),
            index,
        })
        .collect()
}

/// Render records back into three-line text, one record after another.
pub fn format_records(records: &[ElementSetRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_tle_text());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    #[test]
    fn groups_lines_into_triples() {
        let text = format!("{ISS}\n{ISS}\n");
        let records = parse_records(&text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[1].index, 1);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert!(records[1].line1.starts_with("1 25544U"));
        assert!(records[1].line2.starts_with("2 25544"));
    }

    #[test]
    fn drops_incomplete_trailing_group() {
        let text = format!("{ISS}\nORPHAN\n1 00000U");
        let records = parse_records(&text);
        assert_eq!(records.len(), 1);

        assert!(parse_records("ONLY A NAME\n").is_empty());
        assert!(parse_records("").is_empty());
    }

    #[test]
    fn ignores_blank_lines_and_mixed_line_endings() {
        let text = "\r\n  SAT A  \r\n\r\nline a1\rline a2\n\n\nSAT B\nline b1\r\nline b2   ";
        let records = parse_records(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "SAT A");
        assert_eq!(records[0].line1, "line a1");
        assert_eq!(records[0].line2, "line a2");
        assert_eq!(records[1].name, "SAT B");
        assert_eq!(records[1].line2, "line b2");
    }

    #[test]
    fn malformed_content_is_not_rejected() {
        let records = parse_records("a\nb\nc\nd\ne\nf\ng");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "d");
    }

    #[test]
    fn reparse_of_formatted_records_round_trips() {
        let text = format!("{ISS}\nCOPY\n1 x\n2 y\n");
        let records = parse_records(&text);
        let reparsed = parse_records(&format_records(&records));
        assert_eq!(records, reparsed);
    }

    #[test]
    fn catalog_number_from_line1() {
        let records = parse_records(ISS);
        assert_eq!(records[0].catalog_number(), Some(25544));

        let junk = parse_records("X\nnot\nelements");
        assert_eq!(junk[0].catalog_number(), None);
    }
}
