use crate::{format_diagnostics, parse_module};

#[test]
fn diagnostics_render_with_line_and_column() {
    let source = "a + ";
    let out = parse_module(source);
    let rendered = format_diagnostics(source, out.diagnostics);

    insta::assert_snapshot!(rendered, @r"
    error: expected expression after Plus
      --> <input>:1:5 [4..4]
    ");
}

#[test]
fn diagnostics_sort_by_position() {
    let source = "( \n'oops";
    let out = parse_module(source);
    let rendered = format_diagnostics(source, out.diagnostics);

    let positions: Vec<usize> = rendered
        .lines()
        .filter(|l| l.contains("-->"))
        .map(|l| l.find('[').unwrap_or(0))
        .collect();
    assert!(positions.len() >= 2);

    let spans: Vec<&str> = rendered
        .lines()
        .filter(|l| l.contains("-->"))
        .collect();
    let starts: Vec<u32> = spans
        .iter()
        .filter_map(|l| {
            let open = l.find('[')?;
            let dots = l.find("..")?;
            l[open + 1..dots].parse().ok()
        })
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}
