//! Cross-checks against the `csv` crate

use csv_dialect::{CsvContext, Dialect, Field, Quoting, Record, text_lines};

fn csv_records(data: &str, delimiter: u8) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(data.as_bytes())
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_quoted_output_parses_with_csv_crate() {
    let ctx = CsvContext::new();
    let rows = vec![
        vec!["id", "comment", "amount"],
        vec!["1", "Smith, J.", "10.5"],
        vec!["2", "said \"hi\"", "-3"],
        vec!["3", "", "0"],
    ];

    let mut out = String::new();
    ctx.writer(&mut out, "excel")
        .unwrap()
        .write_records(rows.clone())
        .unwrap();

    assert_eq!(csv_records(&out, b','), rows);
}

#[test]
fn test_quote_all_semicolon_output_parses_with_csv_crate() {
    let ctx = CsvContext::new();
    let dialect = Dialect::builder()
        .delimiter(';')
        .quoting(Quoting::All)
        .lineterminator("\n")
        .build()
        .unwrap();

    let mut out = String::new();
    ctx.writer(&mut out, &dialect)
        .unwrap()
        .write_records(vec![
            vec![Field::from("a;b"), Field::Int(1), Field::Null],
            vec![Field::from("plain"), Field::Float(2.5), Field::Bool(true)],
        ])
        .unwrap();

    assert_eq!(
        csv_records(&out, b';'),
        vec![vec!["a;b", "1", ""], vec!["plain", "2.5", "True"]]
    );
}

#[test]
fn test_reads_csv_crate_output() {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    let rows = vec![
        vec!["name", "note"],
        vec!["O'Brien", "uses \"quotes\""],
        vec!["Lee", "a, b, c"],
        vec!["", "trailing space "],
    ];
    for row in &rows {
        wtr.write_record(row).unwrap();
    }
    let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

    let ctx = CsvContext::new();
    let back: Vec<Record> = ctx
        .reader(text_lines(&data), "excel")
        .unwrap()
        .collect::<csv_dialect::Result<_>>()
        .unwrap();
    assert_eq!(back, rows);
}

#[test]
fn test_sniffed_dialect_agrees_with_csv_crate() {
    let data = "sku|qty|price\nA-1|4|9.99\nB-2|12|0.50\nC-3|1|120.00\n";
    let ctx = CsvContext::new();
    let dialect = ctx.sniffer().sniff(data, None).unwrap();

    let ours: Vec<Record> = ctx
        .reader(text_lines(data), &dialect)
        .unwrap()
        .collect::<csv_dialect::Result<_>>()
        .unwrap();
    let delimiter = u8::try_from(dialect.delimiter()).unwrap();
    assert_eq!(ours, csv_records(data, delimiter));
}
