use super::*;

const HEADER: &str =
    "district_name,block_name,facility_name,contact_name,contact_phone,contact_email";

fn csv_with_rows(rows: &[&str]) -> Vec<u8> {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    content.into_bytes()
}

// ---------------------------------------------------------------------------
// Record mapping
// ---------------------------------------------------------------------------

#[test]
fn maps_every_named_column() {
    let raw = csv_with_rows(&["Lucknow,Chinhat,CHC Chinhat,Asha Verma,9876543210,asha@example.com"]);
    let result = import_locations(&raw).expect("valid csv");

    assert_eq!(result.locations.len(), 1);
    let loc = &result.locations[0];
    assert_eq!(loc.serial_number, "1");
    assert_eq!(loc.district_name, "Lucknow");
    assert_eq!(loc.block_name, "Chinhat");
    assert_eq!(loc.facility_name, "CHC Chinhat");
    assert_eq!(loc.contact_name, "Asha Verma");
    assert_eq!(loc.contact_phone, "9876543210");
    assert_eq!(loc.contact_email, "asha@example.com");
    assert!(result.warnings.is_none());
    assert_eq!(result.warning_count(), 0);
}

#[test]
fn serial_numbers_follow_row_order() {
    let raw = csv_with_rows(&["A,B,C,,,", "A,B,D,,,", "A,B,E,,,", "A,B,F,,,"]);
    let result = import_locations(&raw).expect("valid csv");

    let serials: Vec<&str> = result
        .locations
        .iter()
        .map(|l| l.serial_number.as_str())
        .collect();
    assert_eq!(serials, vec!["1", "2", "3", "4"]);
    let facilities: Vec<&str> = result
        .locations
        .iter()
        .map(|l| l.facility_name.as_str())
        .collect();
    assert_eq!(facilities, vec!["C", "D", "E", "F"]);
}

#[test]
fn trims_surrounding_whitespace() {
    let raw = csv_with_rows(&["  Ward 5 \t, Block 9 ,\"  PHC North  \",  , 12345 ,"]);
    let result = import_locations(&raw).expect("valid csv");

    let loc = &result.locations[0];
    assert_eq!(loc.district_name, "Ward 5");
    assert_eq!(loc.block_name, "Block 9");
    assert_eq!(loc.facility_name, "PHC North");
    assert_eq!(loc.contact_name, "");
    assert_eq!(loc.contact_phone, "12345");
    assert_eq!(loc.contact_email, "");
}

#[test]
fn header_order_is_not_fixed() {
    let raw = b"facility_name,contact_email,district_name,block_name\n\
                District Hospital,dh@example.com,Agra,Bichpuri\n";
    let result = import_locations(raw).expect("valid csv");

    let loc = &result.locations[0];
    assert_eq!(loc.district_name, "Agra");
    assert_eq!(loc.block_name, "Bichpuri");
    assert_eq!(loc.facility_name, "District Hospital");
    assert_eq!(loc.contact_email, "dh@example.com");
}

#[test]
fn missing_columns_default_to_empty() {
    let raw = b"district_name,facility_name\nKanpur,CHC Bilhaur\n";
    let result = import_locations(raw).expect("valid csv");

    let loc = &result.locations[0];
    assert_eq!(loc.district_name, "Kanpur");
    assert_eq!(loc.block_name, "");
    assert_eq!(loc.facility_name, "CHC Bilhaur");
    assert_eq!(loc.contact_name, "");
    assert_eq!(loc.contact_phone, "");
    assert_eq!(loc.contact_email, "");
}

#[test]
fn required_fields_are_not_enforced() {
    let raw = csv_with_rows(&[",,,Only Contact,,"]);
    let result = import_locations(&raw).expect("valid csv");

    assert_eq!(result.locations.len(), 1);
    assert_eq!(result.locations[0].district_name, "");
    assert_eq!(result.locations[0].contact_name, "Only Contact");
}

#[test]
fn header_names_match_case_insensitively_and_ignore_padding() {
    let raw = b" District_Name , BLOCK_NAME ,facility_name\nMeerut,Sardhana,PHC\n";
    let result = import_locations(raw).expect("valid csv");

    let loc = &result.locations[0];
    assert_eq!(loc.district_name, "Meerut");
    assert_eq!(loc.block_name, "Sardhana");
}

#[test]
fn unknown_columns_are_ignored() {
    let raw = b"district_name,block_name,facility_name,notes\nA,B,C,bring ladder\n";
    let result = import_locations(raw).expect("valid csv");
    assert_eq!(result.locations[0].facility_name, "C");
}

#[test]
fn quoted_fields_may_contain_commas_and_escaped_quotes() {
    let raw = csv_with_rows(&["Agra,\"Fatehabad, East\",\"The \"\"New\"\" PHC\",,,"]);
    let result = import_locations(&raw).expect("valid csv");

    let loc = &result.locations[0];
    assert_eq!(loc.block_name, "Fatehabad, East");
    assert_eq!(loc.facility_name, "The \"New\" PHC");
}

#[test]
fn utf8_byte_order_mark_is_ignored() {
    let mut raw = vec![0xEF, 0xBB, 0xBF];
    raw.extend_from_slice(&csv_with_rows(&["Varanasi,Kashi,CHC,,,"]));
    let result = import_locations(&raw).expect("valid csv");
    assert_eq!(result.locations[0].district_name, "Varanasi");
}

#[test]
fn crlf_line_endings_are_accepted() {
    let raw = b"district_name,block_name,facility_name\r\nA,B,C\r\nA,B,D\r\n";
    let result = import_locations(raw).expect("valid csv");
    assert_eq!(result.locations.len(), 2);
    assert_eq!(result.locations[1].facility_name, "D");
}

#[test]
fn header_only_file_yields_no_locations() {
    let result = import_locations(generate_template()).expect("template parses");
    assert!(result.locations.is_empty());
    assert!(result.warnings.is_none());
}

// ---------------------------------------------------------------------------
// Blank lines
// ---------------------------------------------------------------------------

#[test]
fn blank_lines_are_skipped_and_not_numbered() {
    let raw = format!("{HEADER}\nA,B,C,,,\n\nA,B,D,,,\n").into_bytes();
    let result = import_locations(&raw).expect("valid csv");

    assert_eq!(result.locations.len(), 2);
    assert_eq!(result.locations[0].serial_number, "1");
    assert_eq!(result.locations[1].serial_number, "2");
    assert_eq!(result.locations[1].facility_name, "D");
}

#[test]
fn whitespace_only_lines_count_as_blank() {
    let raw = format!("{HEADER}\nA,B,C,,,\n   \n\t\nA,B,D,,,\n\n").into_bytes();
    let result = import_locations(&raw).expect("valid csv");
    assert_eq!(result.locations.len(), 2);
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

#[test]
fn duplicate_keys_warn_once_per_repeat_and_keep_records() {
    let raw = csv_with_rows(&["A,B,C,,,", "A,B,C,,,", "A,B,D,,,"]);
    let result = import_locations(&raw).expect("valid csv");

    assert_eq!(result.locations.len(), 3);
    assert_eq!(result.warning_count(), 1);
    let warnings = result.warnings.expect("duplicate warning");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("row 2"), "got: {}", warnings[0]);
    assert!(warnings[0].contains("A-B-C"), "got: {}", warnings[0]);
}

#[test]
fn every_repeat_occurrence_is_reported_in_order() {
    let raw = csv_with_rows(&["A,B,C,,,", "X,Y,Z,,,", "A,B,C,,,", "X,Y,Z,,,", "A,B,C,,,"]);
    let result = import_locations(&raw).expect("valid csv");

    let warnings = result.warnings.expect("warnings");
    assert_eq!(warnings.len(), 3);
    assert!(warnings[0].contains("row 3") && warnings[0].contains("A-B-C"));
    assert!(warnings[1].contains("row 4") && warnings[1].contains("X-Y-Z"));
    assert!(warnings[2].contains("row 5") && warnings[2].contains("A-B-C"));
    assert_eq!(result.locations.len(), 5);
}

#[test]
fn duplicate_detection_uses_trimmed_values() {
    let raw = csv_with_rows(&["A,B,C,,,", " A , B , C ,,,"]);
    let result = import_locations(&raw).expect("valid csv");
    assert_eq!(result.warnings.map(|w| w.len()), Some(1));
}

#[test]
fn contact_fields_do_not_affect_the_key() {
    let raw = csv_with_rows(&["A,B,C,One,1,one@example.com", "A,B,C,Two,2,two@example.com"]);
    let result = import_locations(&raw).expect("valid csv");
    assert_eq!(result.warnings.map(|w| w.len()), Some(1));
}

#[test]
fn key_components_are_compared_separately() {
    // Joined with '-' these two look identical; as triples they differ.
    let raw = csv_with_rows(&["A-B,C,D,,,", "A,B-C,D,,,"]);
    let result = import_locations(&raw).expect("valid csv");
    assert!(result.warnings.is_none());
}

#[test]
fn import_is_deterministic() {
    let raw = csv_with_rows(&["A,B,C,,,", "A,B,C,,,", "D,E,F,x,y,z"]);
    let first = import_locations(&raw).expect("first import");
    let second = import_locations(&raw).expect("second import");
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn invalid_utf8_is_a_parse_error() {
    let raw = b"district_name,block_name\n\xff\xfe,B\n";
    let err = import_locations(raw).unwrap_err();
    assert!(matches!(err, ParseError::Encoding(_)), "got: {err:?}");
}

#[test]
fn empty_file_is_a_parse_error() {
    assert!(matches!(import_locations(b""), Err(ParseError::Empty)));
    assert!(matches!(import_locations(b"\n\n"), Err(ParseError::Empty)));
}

#[test]
fn unterminated_quote_is_a_parse_error() {
    let raw = csv_with_rows(&["A,B,C,,,", "A,\"B,C,,,", "A,B,D,,,"]);
    let err = import_locations(&raw).unwrap_err();
    assert!(
        matches!(err, ParseError::UnterminatedQuote { line: 3 }),
        "got: {err:?}"
    );
}

#[test]
fn inconsistent_column_count_is_a_parse_error() {
    let raw = csv_with_rows(&["A,B,C,,,", "A,B,C"]);
    let err = import_locations(&raw).unwrap_err();
    assert!(
        matches!(
            err,
            ParseError::ColumnCount {
                line: 3,
                expected: 6,
                found: 3
            }
        ),
        "got: {err:?}"
    );
}

#[test]
fn extra_fields_are_a_parse_error() {
    let raw = b"district_name,block_name\nA,B,C\n";
    assert!(matches!(
        import_locations(raw),
        Err(ParseError::ColumnCount { .. })
    ));
}

#[test]
fn stray_quote_does_not_hide_a_later_unterminated_quote() {
    let raw = "district_name,block_name,facility_name\n\
               Agra,Bichpuri,12\" X-Ray Room\n\
               Agra,Fatehabad,\"PHC East\n\
               Kanpur,Bilhaur,CHC Bilhaur\n\
               Meerut,Sardhana,PHC Sardhana\n";
    let err = import_locations(raw.as_bytes()).unwrap_err();
    assert!(
        matches!(err, ParseError::UnterminatedQuote { line: 3 }),
        "got: {err:?}"
    );
}

#[test]
fn quote_inside_unquoted_field_is_literal() {
    let raw = b"district_name,block_name,facility_name\nAgra,Bichpuri,12\" X-Ray Room\n";
    let result = import_locations(raw).expect("valid csv");
    assert_eq!(result.locations.len(), 1);
    assert_eq!(result.locations[0].facility_name, "12\" X-Ray Room");
}

#[test]
fn carriage_return_line_endings_report_correct_lines() {
    let raw = b"district_name,block_name,facility_name\rA,B,C\rA,B\r";
    let err = import_locations(raw).unwrap_err();
    assert!(
        matches!(
            err,
            ParseError::ColumnCount {
                line: 3,
                expected: 3,
                found: 2
            }
        ),
        "got: {err:?}"
    );

    let raw = b"district_name,block_name,facility_name\rA,B,C\rA,B,\"C\r";
    let err = import_locations(raw).unwrap_err();
    assert!(
        matches!(err, ParseError::UnterminatedQuote { line: 3 }),
        "got: {err:?}"
    );
}

#[test]
fn find_unterminated_quote_follows_field_rules() {
    assert_eq!(find_unterminated_quote("a,\"b\"\"c\",d\n"), None);
    assert_eq!(find_unterminated_quote("a\n\"b\nc"), Some(2));
    // Quotes that do not start a field are literal.
    assert_eq!(find_unterminated_quote("a,b\"c\n"), None);
    assert_eq!(find_unterminated_quote("a,b\"c\nd,\"e\n"), Some(2));
    // Text after a closing quote stays in the same field.
    assert_eq!(find_unterminated_quote("\"a\"b,c\n"), None);
    assert_eq!(find_unterminated_quote("a,\"b\r\nc\r\n"), Some(1));
    assert_eq!(find_unterminated_quote("a\r\nb\r\n\"c"), Some(3));
}

#[test]
fn line_at_counts_every_line_ending_style() {
    let text = "h\na\r\nb\rc";
    assert_eq!(line_at(text, 0), 1);
    assert_eq!(line_at(text, 2), 2);
    assert_eq!(line_at(text, 5), 3);
    assert_eq!(line_at(text, 7), 4);
}

// ---------------------------------------------------------------------------
// Template and serialization
// ---------------------------------------------------------------------------

#[test]
fn template_is_the_exact_header_line() {
    assert_eq!(
        generate_template(),
        b"district_name,block_name,facility_name,contact_name,contact_phone,contact_email\n"
    );
    assert_eq!(generate_template(), generate_template());
}

#[test]
fn template_lists_every_known_column() {
    let expected: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
    assert_eq!(CONSIGNEE_TEMPLATE.trim_end(), expected.join(","));
    assert_eq!(TEMPLATE_FILENAME, "consignee_template.csv");
}

#[test]
fn import_result_serializes_camel_case_with_null_warnings() {
    let raw = csv_with_rows(&["A,B,C,Name,123,e@x.org"]);
    let result = import_locations(&raw).expect("valid csv");
    let json = serde_json::to_value(&result).expect("serialize");

    assert!(json["warnings"].is_null());
    let loc = &json["locations"][0];
    assert_eq!(loc["serialNumber"], "1");
    assert_eq!(loc["districtName"], "A");
    assert_eq!(loc["contactEmail"], "e@x.org");
}

#[test]
fn location_record_deserializes_with_missing_optional_fields() {
    let loc: LocationRecord = serde_json::from_str(
        r#"{"districtName":"A","blockName":"B","facilityName":"C"}"#,
    )
    .expect("deserialize");
    assert_eq!(loc.serial_number, "");
    assert_eq!(loc.contact_phone, "");
    assert_eq!(loc.key().to_string(), "A-B-C");
}
