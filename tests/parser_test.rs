use gym_log_lib::{extract_set, format_set, parse_set, SetInput};

#[test]
fn test_extract_finds_every_digit_run() {
    assert_eq!(extract_set("80kg x 10 reps"), vec![80, 10]);
    assert_eq!(extract_set("rest day"), Vec::<u64>::new());
    assert_eq!(extract_set("80"), vec![80]);
    assert_eq!(extract_set("80-10-5"), vec![80, 10, 5]);
    assert_eq!(extract_set("007x3"), vec![7, 3]);
}

#[test]
fn test_extract_saturates_huge_numbers() {
    assert_eq!(
        extract_set("99999999999999999999999 x 2"),
        vec![u64::MAX, 2]
    );
}

#[test]
fn test_parse_needs_exactly_two_numbers() {
    assert_eq!(
        parse_set("80kg x 10"),
        Some(SetInput {
            weight: 80,
            reps: 10
        })
    );
    assert_eq!(parse_set("0 12"), Some(SetInput { weight: 0, reps: 12 }));
    assert_eq!(parse_set("80"), None);
    assert_eq!(parse_set("80 10 5"), None);
    assert_eq!(parse_set(""), None);
}

#[test]
fn test_parse_rejects_numbers_that_do_not_fit() {
    assert_eq!(parse_set("4294967296 x 5"), None);
    assert_eq!(
        parse_set("4294967295 x 5"),
        Some(SetInput {
            weight: u32::MAX,
            reps: 5
        })
    );
}

#[test]
fn test_format_set() {
    assert_eq!(format_set(80, 10), "(80kg x 10)");
    assert_eq!(format_set(0, 12), "(0kg x 12)");
}
