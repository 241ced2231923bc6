use countersheet::tabular::{read_rows, sniff_delimiter, Delimiter};
use rstest::rstest;

#[rstest]
#[case("a,b", Delimiter::Comma)]
#[case("a;b;c", Delimiter::Semicolon)]
#[case("a\tb", Delimiter::Tab)]
#[case("a;b,c,d", Delimiter::Comma)]
#[case("a;b\nc,d,e,f", Delimiter::Semicolon)]
#[case("plain", Delimiter::Comma)]
#[case("", Delimiter::Comma)]
fn sniffs_first_line(#[case] source: &str, #[case] delimiter: Delimiter) {
    assert_eq!(sniff_delimiter(source), delimiter);
}

#[rstest]
#[case("a,b\n", vec![vec!["a", "b"]])]
#[case("a,b\r\n\r\nc", vec![vec!["a", "b"], vec![""], vec!["c"]])]
#[case(",x,", vec![vec!["", "x", ""]])]
#[case("\"multi\nline\",x", vec![vec!["multi\nline", "x"]])]
#[case("a;b,c;d\n1;2,3;4", vec![vec!["a", "b,c", "d"], vec!["1", "2,3", "4"]])]
#[case("1,5\" gun\n1,tank", vec![vec!["1", "5\" gun"], vec!["1", "tank"]])]
fn reads_rows(#[case] source: &str, #[case] rows: Vec<Vec<&str>>) {
    assert_eq!(read_rows(source), rows);
}
